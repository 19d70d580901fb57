//! CLI commands
//!
//! Special commands that can be executed in the chat REPL.

use std::sync::Arc;

use crate::agent::Orchestrator;
use crate::core::Result;
use crate::gateway::ChatGateway;

/// Result of parsing a command
pub enum CommandResult {
    /// Continue processing as normal input
    Continue(String),
    /// Command was handled, show output
    Handled(String),
    /// Exit the REPL
    Exit,
    /// Clear the conversation
    Clear,
}

/// Parse and handle special commands
pub async fn handle_command(
    input: &str,
    orchestrator: &mut Orchestrator,
    conversation_id: &str,
    gateway: &Arc<dyn ChatGateway>,
) -> Result<CommandResult> {
    let input = input.trim();

    match input.to_lowercase().as_str() {
        "exit" | "quit" | "q" => Ok(CommandResult::Exit),

        "clear" | "reset" => {
            orchestrator.clear_conversation(conversation_id);
            Ok(CommandResult::Clear)
        }

        "help" | "?" => Ok(CommandResult::Handled(help_text())),

        "status" => {
            let mut workers = orchestrator.worker_names();
            workers.sort_unstable();
            Ok(CommandResult::Handled(format!(
                "Workers: {}\nConversation messages: {}",
                workers.join(", "),
                orchestrator.conversation_len(conversation_id)
            )))
        }

        "models" => {
            let models = gateway.list_models().await?;
            if models.is_empty() {
                Ok(CommandResult::Handled("No models available".to_string()))
            } else {
                Ok(CommandResult::Handled(models.join("\n")))
            }
        }

        _ => Ok(CommandResult::Continue(input.to_string())),
    }
}

/// Help text for the REPL
fn help_text() -> String {
    "Commands:\n\
     \x20 help    - show this help\n\
     \x20 status  - show workers and conversation length\n\
     \x20 models  - list models available on the gateway\n\
     \x20 clear   - clear the conversation\n\
     \x20 exit    - quit"
        .to_string()
}
