//! Interactive chat REPL
//!
//! Provides the main user interaction loop over one conversation thread.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use uuid::Uuid;

use crate::agent::Orchestrator;
use crate::cli::commands::{handle_command, CommandResult};
use crate::core::{Config, Result};
use crate::gateway::ChatGateway;

/// Interactive REPL (Read-Eval-Print Loop)
pub struct Repl {
    orchestrator: Orchestrator,
    gateway: Arc<dyn ChatGateway>,
    config: Config,
    vertical: String,
    conversation_id: String,
}

impl Repl {
    /// Create a REPL over an assembled team
    pub fn new(
        orchestrator: Orchestrator,
        gateway: Arc<dyn ChatGateway>,
        config: Config,
        vertical: impl Into<String>,
    ) -> Self {
        Self {
            orchestrator,
            gateway,
            config,
            vertical: vertical.into(),
            conversation_id: Uuid::new_v4().to_string(),
        }
    }

    /// Run the REPL
    pub async fn run(&mut self) -> Result<()> {
        self.print_banner();

        // Check the gateway and models before accepting input
        print!("Checking models...");
        io::stdout().flush()?;
        match self.preflight().await {
            Ok(()) => println!(" ready.\n"),
            Err(e) => {
                println!("\n\nInitialization error: {}\n", e);
                return Ok(());
            }
        }

        let stdin = io::stdin();
        let mut stdout = io::stdout();

        loop {
            print!("You: ");
            stdout.flush()?;

            let mut input = String::new();
            match stdin.lock().read_line(&mut input) {
                Ok(0) => {
                    // EOF (Ctrl+D)
                    println!("\nGoodbye!");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    eprintln!("Error reading input: {}", e);
                    continue;
                }
            }

            let input = input.trim();
            if input.is_empty() {
                continue;
            }

            match handle_command(
                input,
                &mut self.orchestrator,
                &self.conversation_id,
                &self.gateway,
            )
            .await
            {
                Ok(CommandResult::Exit) => {
                    println!("\nGoodbye!");
                    break;
                }
                Ok(CommandResult::Clear) => {
                    println!("Conversation cleared.\n");
                    continue;
                }
                Ok(CommandResult::Handled(output)) => {
                    println!("{}\n", output);
                    continue;
                }
                Ok(CommandResult::Continue(input)) => {
                    match self
                        .orchestrator
                        .handle_turn(&self.conversation_id, &input)
                        .await
                    {
                        Ok(reply) => {
                            println!("\nAssistant:\n{}\n", reply);
                        }
                        Err(e) => {
                            // Gateway failures abort the turn without
                            // committing it; the user can simply retry.
                            eprintln!("\nError: {}\n", e);
                        }
                    }
                }
                Err(e) => {
                    eprintln!("Command error: {}\n", e);
                }
            }
        }

        Ok(())
    }

    /// Verify the router and worker models are available on the gateway
    async fn preflight(&self) -> Result<()> {
        for model in [&self.config.models.router, &self.config.models.worker] {
            if !self.gateway.is_model_available(model).await? {
                return Err(crate::core::EngineError::ModelNotFound(model.clone()));
            }
        }
        Ok(())
    }

    /// Print the startup banner
    fn print_banner(&self) {
        println!();
        println!("Switchboard - multi-agent conversation engine");
        println!("Vertical:   {}", self.vertical);
        println!("Gateway:    {}", self.config.gateway_url());
        println!("Models:");
        println!("  Router: {}", self.config.models.router);
        println!("  Worker: {}", self.config.models.worker);
        let mut workers = self.orchestrator.worker_names();
        workers.sort_unstable();
        println!("Workers:    {}", workers.join(", "));
        println!();
        println!("Commands: help, status, models, clear, exit");
        println!("-----------------------------------------------------------");
    }
}
