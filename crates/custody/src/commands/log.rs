use clap::Args;

use crate::config::Context;
use crate::output::{opt, print_json};

#[derive(Args)]
pub struct LogArgs {
    /// Only entries written by this batch
    #[arg(long)]
    batch: Option<String>,
    /// Maximum number of entries (most recent)
    #[arg(long, default_value = "50")]
    limit: usize,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: LogArgs, ctx: &Context) -> anyhow::Result<()> {
    let tenant = ctx.tenant()?;
    let engine = ctx.engine()?;
    let entries = match &args.batch {
        Some(batch) => engine.reconcile_log_for_batch(&tenant, batch)?,
        None => engine.reconcile_log(&tenant)?,
    };
    let skip = entries.len().saturating_sub(args.limit);
    let entries = &entries[skip..];

    if args.json {
        return print_json(&entries);
    }
    if entries.is_empty() {
        println!("No reconcile entries.");
        return Ok(());
    }
    for entry in entries {
        let reason = entry.reason.map(|r| r.to_string());
        let object = entry.evidence_object_id.map(|id| id.to_string());
        println!(
            "{} {} {} {:?} {} {}",
            entry.id,
            entry.batch_client_request_id,
            entry.client_request_id,
            entry.result,
            opt(reason.as_deref()),
            opt(object.as_deref()),
        );
    }
    Ok(())
}
