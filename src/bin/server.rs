//! HTTP server for photo styling analysis.
//!
//! Run with: cargo run --bin percent-style-server -- --config config.toml

use clap::Parser;
use percent_style::{init_tracing, server, Config};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "percent-style-server")]
#[command(author, version, about = "Photo styling analysis server", long_about = None)]
struct Args {
    /// TOML config file (defaults apply when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured bind address
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }

    init_tracing(&config.logging.level);
    tracing::info!(detector = ?config.detector, "starting");

    if let Err(e) = server::serve(config).await {
        tracing::error!(error = %e, "server stopped");
        std::process::exit(1);
    }
}
