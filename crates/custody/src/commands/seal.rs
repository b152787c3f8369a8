use clap::Args;

use custody_core::id::EvidenceObjectId;

use crate::config::Context;
use crate::output::{kv, print_json};

#[derive(Args)]
pub struct SealArgs {
    /// Evidence object IDs (ULID)
    #[arg(required = true)]
    ids: Vec<String>,
    /// Seal reason recorded on each object
    #[arg(short, long)]
    reason: Option<String>,
    /// Individual performing the seal
    #[arg(long)]
    individual: Option<String>,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: SealArgs, ctx: &Context) -> anyhow::Result<()> {
    let tenant = ctx.tenant()?;
    let engine = ctx.engine()?;
    let ids = args
        .ids
        .iter()
        .map(|s| EvidenceObjectId::from_string(s))
        .collect::<Result<Vec<_>, _>>()?;

    let results = engine.seal_evidence_objects(
        &tenant,
        args.individual.as_deref(),
        &ids,
        args.reason.as_deref(),
    )?;

    if args.json {
        return print_json(&results);
    }
    for result in &results {
        let outcome = match result.error {
            None => "sealed".to_string(),
            Some(reason) => format!("refused ({reason})"),
        };
        println!("{}", kv(&result.id.to_string(), &outcome));
    }
    Ok(())
}
