use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod error;
mod output;

use commands::Commands;
use config::Context;

#[derive(Parser)]
#[command(name = "custody", version, about = "Offline evidence ingestion and chain-of-custody reconciliation")]
struct Cli {
    /// Store root (defaults to the nearest directory containing .custody)
    #[arg(long, global = true)]
    store: Option<PathBuf>,
    /// Tenant the command acts for
    #[arg(short, long, global = true)]
    tenant: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = Context::new(cli.store, cli.tenant);
    if let Err(err) = cli.command.run(&ctx).await {
        eprintln!("{}", error::format_error(&err));
        std::process::exit(1);
    }
}
