use std::sync::Arc;

use clap::Parser;
use dreamsynth_core::{CompletionClient, CompletionConfig, DreamStore, DreamSynthConfig};
use tokio::sync::broadcast;
use tracing_subscriber::{fmt, EnvFilter};

use dreamsynth_server::http::{self, HttpState};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "dreamsynth.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (dev convenience — production uses real env vars)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Init logging
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    // Load config
    let config = match DreamSynthConfig::load(&args.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", args.config, e);
            std::process::exit(1);
        }
    };

    let completion = CompletionClient::new(CompletionConfig::new(
        None,
        config.completion.model.clone(),
        config.completion.timeout_seconds,
    ))?;
    let store = DreamStore::new(&config.storage.path);
    let state = Arc::new(HttpState { store, completion });

    let (tx, _rx) = broadcast::channel(1);
    let shutdown_tx = tx.clone();

    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for Ctrl+C");
        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(());
    });

    http::start_http_server(config, state, tx.subscribe()).await?;

    Ok(())
}
