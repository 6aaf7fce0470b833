use std::path::PathBuf;
use std::process::exit;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lumen::cli::Cli;
use lumen::config::{Defaults, ServerConfig};
use lumen::engine::{Availability, CommandEngine, Engine};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lumen=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let defaults = Defaults::from_env();
    let mut server_config = ServerConfig::from_env();
    if let Some(port) = cli.port {
        server_config.port = port;
    }
    if cli.local_only {
        server_config.local_only = true;
    }

    let command = cli
        .engine
        .or_else(|| std::env::var("LUMEN_ENGINE_CMD").ok());
    let model = cli
        .model
        .or_else(|| std::env::var("LUMEN_MODEL").ok().map(PathBuf::from));
    let engine: Arc<dyn Engine> = Arc::new(CommandEngine::new(command, model));

    // One-shot capability gate, before any socket binds.
    match engine.availability() {
        Availability::Ready => {
            println!("Text-generation engine is available! Starting lumen server...");
        }
        Availability::DeviceIneligible => {
            println!(
                "The configured engine command was not found (or is not runnable) \
                 on this machine; it cannot be used as a server with lumen."
            );
            exit(1);
        }
        Availability::FeatureDisabled => {
            println!(
                "No engine command is configured. Set LUMEN_ENGINE_CMD (or pass \
                 --engine) and start lumen again."
            );
            exit(1);
        }
        Availability::ModelDownloading => {
            println!("The model file is not present yet, please wait and try again.");
            exit(0);
        }
        Availability::OtherUnavailable(reason) => {
            println!("The text-generation engine is unavailable: {reason}");
            exit(1);
        }
    }

    lumen::server::start(engine, defaults, server_config).await
}
