use clap::{Args, Subcommand};

use custody_core::id::{EvidenceObjectId, HoldId};
use custody_core::types::HoldStatus;

use crate::config::Context;
use crate::output::{header, kv, print_json};

#[derive(Args)]
pub struct HoldArgs {
    #[command(subcommand)]
    command: HoldCommand,
}

#[derive(Subcommand)]
enum HoldCommand {
    /// Create an active legal hold
    Create {
        /// Hold type (e.g. litigation, investigation)
        #[arg(long)]
        hold_type: String,
        /// Hold title
        #[arg(long, default_value = "")]
        title: String,
    },
    /// Place an evidence object under a hold
    Target {
        /// Hold ID (ULID)
        hold_id: String,
        /// Evidence object ID (ULID)
        evidence_object_id: String,
    },
    /// Release a hold
    Release {
        /// Hold ID (ULID)
        hold_id: String,
    },
    /// List holds
    List {
        /// Only holds targeting this evidence object
        #[arg(long)]
        object: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(args: HoldArgs, ctx: &Context) -> anyhow::Result<()> {
    let tenant = ctx.tenant()?;
    let engine = ctx.engine()?;

    match args.command {
        HoldCommand::Create { hold_type, title } => {
            let hold = engine.create_hold(&tenant, &hold_type, &title)?;
            println!("Created hold: {}", hold.id);
        }
        HoldCommand::Target {
            hold_id,
            evidence_object_id,
        } => {
            let hold_id = HoldId::from_string(&hold_id)?;
            let object_id = EvidenceObjectId::from_string(&evidence_object_id)?;
            if engine.add_hold_target(&tenant, &hold_id, &object_id)? {
                println!("Placed {object_id} under hold {hold_id}");
            } else {
                println!("{object_id} is already under hold {hold_id}");
            }
        }
        HoldCommand::Release { hold_id } => {
            let hold = engine.release_hold(&tenant, &HoldId::from_string(&hold_id)?)?;
            println!("Released hold: {}", hold.id);
        }
        HoldCommand::List { object, json } => {
            let holds = match object {
                Some(id) => engine.holds_for_object(&tenant, &EvidenceObjectId::from_string(&id)?)?,
                None => engine.list_holds(&tenant)?,
            };
            if json {
                return print_json(&holds);
            }
            if holds.is_empty() {
                println!("No holds.");
            }
            for hold in &holds {
                println!("{}", header(&hold.id.to_string()));
                println!("{}", kv("type", &hold.hold_type));
                println!("{}", kv("title", &hold.title));
                let status = match hold.status {
                    HoldStatus::Active => "active",
                    HoldStatus::Released => "released",
                };
                println!("{}", kv("status", status));
            }
        }
    }
    Ok(())
}
