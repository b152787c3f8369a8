use clap::Args;
use std::path::PathBuf;

use custody_store::layout::StoreLayout;
use custody_store::{CustodyStore, StoreConfig};

use crate::config::{absolute, Context};

#[derive(Args)]
pub struct InitArgs {
    /// Path to initialize (defaults to --store, then the current directory)
    path: Option<PathBuf>,
    /// Human-readable store name
    #[arg(long)]
    name: Option<String>,
    /// Write reconcile log rows for every item decision, not only new evidence
    #[arg(long)]
    audit_all_outcomes: bool,
}

pub fn run(args: InitArgs, ctx: &Context) -> anyhow::Result<()> {
    let path = match args.path.as_deref().or(ctx.explicit_store()) {
        Some(path) => absolute(path)?,
        None => std::env::current_dir()?,
    };
    if StoreLayout::new(&path).custody_dir().is_dir() {
        anyhow::bail!("custody store already exists at {}", path.display());
    }

    let mut config = StoreConfig {
        name: args.name,
        ..StoreConfig::default()
    };
    config.ingest.audit_all_outcomes = args.audit_all_outcomes;
    CustodyStore::init_with_config(&path, config)?;
    println!("Initialized custody store at {}", path.display());
    Ok(())
}
