use std::path::PathBuf;

use clap::Args;

use custody_core::types::{IngestBatch, ItemStatus};

use crate::config::Context;
use crate::output::{header, kv, print_json};

#[derive(Args)]
pub struct IngestArgs {
    /// Batch file (JSON); `-` reads stdin
    file: PathBuf,
    /// Individual submitting the batch
    #[arg(long)]
    individual: Option<String>,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: IngestArgs, ctx: &Context) -> anyhow::Result<()> {
    let tenant = ctx.tenant()?;
    let engine = ctx.engine()?;

    let raw = if args.file.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin())?
    } else {
        std::fs::read_to_string(&args.file)?
    };
    let batch: IngestBatch = serde_json::from_str(&raw)?;
    let response = engine.ingest_batch(&tenant, args.individual.as_deref(), &batch)?;

    if args.json {
        return print_json(&response);
    }

    println!("{}", header(&format!("batch {}", batch.batch_client_request_id)));
    println!("{}", kv("from cache", &response.from_cache.to_string()));
    for result in &response.results {
        let status = match result.status {
            ItemStatus::CreatedNew => "created_new".to_string(),
            ItemStatus::AlreadyApplied => "already_applied".to_string(),
            ItemStatus::Rejected => match result.reason {
                Some(reason) => format!("rejected ({reason})"),
                None => "rejected".to_string(),
            },
        };
        let object = result
            .evidence_object_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("{}", kv(&result.client_request_id, &format!("{status} {object}")));
    }
    Ok(())
}
