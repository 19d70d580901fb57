//! Switchboard - supervisor-routed multi-agent conversation engine
//!
//! Main entry point for the CLI chat surface.

use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use switchboard::core::Config;
use switchboard::domain::{proptech, retail};
use switchboard::gateway::{ChatGateway, OllamaGateway};
use switchboard::Repl;

/// Which vertical assistant to run
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Vertical {
    /// Property management assistant
    Proptech,
    /// Car store assistant
    Retail,
}

/// Switchboard - supervisor-routed multi-agent conversation engine
#[derive(Parser, Debug)]
#[command(name = "switchboard")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Vertical assistant to run
    #[arg(long, short = 'v', value_enum, default_value = "retail")]
    vertical: Vertical,

    /// Router model (for supervisor classification)
    #[arg(long, short = 'r')]
    router: Option<String>,

    /// Worker model (for tool calling and replies)
    #[arg(long, short = 'w')]
    worker: Option<String>,

    /// Path to a JSON product catalog (retail only; seeded data otherwise)
    #[arg(long, requires = "reviews_file")]
    catalog_file: Option<std::path::PathBuf>,

    /// Path to a JSON reviews file (retail only)
    #[arg(long, requires = "catalog_file")]
    reviews_file: Option<std::path::PathBuf>,

    /// Path to write created orders to (retail only)
    #[arg(long)]
    orders_file: Option<std::path::PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'd')]
    debug: bool,

    /// Single prompt mode (non-interactive)
    #[arg(long, short = 'p')]
    prompt: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Build configuration
    let mut config = Config::load();

    // Apply CLI overrides
    if let Some(ref router) = args.router {
        config.models.router = router.clone();
    }
    if let Some(ref worker) = args.worker {
        config.models.worker = worker.clone();
    }
    if args.debug {
        config.engine.debug = true;
    }

    let default_level = if config.engine.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("switchboard={}", default_level))),
        )
        .with_writer(std::io::stderr)
        .init();

    let gateway: Arc<dyn ChatGateway> = Arc::new(OllamaGateway::from_config(&config));

    let (orchestrator, label) = match args.vertical {
        Vertical::Proptech => {
            let store = Arc::new(proptech::PropertyStore::seeded());
            (
                proptech::team(Arc::clone(&gateway), &config, store),
                "proptech",
            )
        }
        Vertical::Retail => {
            let catalog = Arc::new(match (&args.catalog_file, &args.reviews_file) {
                (Some(catalog_path), Some(reviews_path)) => {
                    retail::CatalogStore::from_files(catalog_path, reviews_path)?
                }
                _ => retail::CatalogStore::seeded(),
            });
            let orders = Arc::new(match args.orders_file {
                Some(path) => retail::OrderStore::with_path(path),
                None => retail::OrderStore::new(),
            });
            (
                retail::team(Arc::clone(&gateway), &config, catalog, orders),
                "retail",
            )
        }
    };

    // Single prompt mode: one turn, print the reply, exit
    if let Some(prompt) = args.prompt {
        let mut orchestrator = orchestrator;
        let reply = orchestrator.handle_turn("cli", &prompt).await?;
        println!("{}", reply);
        return Ok(());
    }

    let mut repl = Repl::new(orchestrator, gateway, config, label);
    repl.run().await?;

    Ok(())
}
