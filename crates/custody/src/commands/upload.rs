use clap::{Args, Subcommand};

use custody_core::id::EvidenceObjectId;

use crate::config::Context;

#[derive(Args)]
pub struct UploadArgs {
    #[command(subcommand)]
    command: UploadCommand,
}

#[derive(Subcommand)]
enum UploadCommand {
    /// Record that an object's bytes reached object storage
    Complete {
        /// Evidence object ID (ULID)
        evidence_object_id: String,
        /// Object-storage reference for the bytes
        #[arg(long)]
        storage_key: String,
        /// Individual reporting the upload
        #[arg(long)]
        individual: Option<String>,
    },
}

pub fn run(args: UploadArgs, ctx: &Context) -> anyhow::Result<()> {
    let tenant = ctx.tenant()?;
    let engine = ctx.engine()?;

    match args.command {
        UploadCommand::Complete {
            evidence_object_id,
            storage_key,
            individual,
        } => {
            let id = EvidenceObjectId::from_string(&evidence_object_id)?;
            let result = engine.complete_upload(&tenant, individual.as_deref(), &id, &storage_key)?;
            match result.error {
                None => println!("Upload recorded for {id}"),
                Some(reason) => anyhow::bail!("upload for {id} refused: {reason}"),
            }
        }
    }
    Ok(())
}
