use clap::Args;

use crate::config::Context;
use crate::output::{kv, print_json};

#[derive(Args)]
pub struct PendingArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: PendingArgs, ctx: &Context) -> anyhow::Result<()> {
    let tenant = ctx.tenant()?;
    let engine = ctx.engine()?;
    let pending = engine.list_pending(&tenant)?;

    if args.json {
        return print_json(&pending);
    }
    if pending.is_empty() {
        println!("No evidence waiting on bytes.");
        return Ok(());
    }
    for object in &pending {
        println!("{}", kv(&object.id.to_string(), &format!("{} ({})", object.title, object.source_type)));
    }
    Ok(())
}
