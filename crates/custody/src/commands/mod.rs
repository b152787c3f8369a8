pub mod hold;
pub mod ingest;
pub mod init;
pub mod log;
pub mod pending;
pub mod seal;
pub mod serve;
pub mod sessions;
pub mod upload;

use clap::Subcommand;

use crate::config::Context;

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new custody store
    Init(init::InitArgs),
    /// Reconcile a batch of offline captures from a JSON file
    Ingest(ingest::IngestArgs),
    /// Seal evidence objects into the immutable custody chain
    Seal(seal::SealArgs),
    /// Manage legal holds
    Hold(hold::HoldArgs),
    /// Track uploads of evidence bytes
    Upload(upload::UploadArgs),
    /// List evidence still waiting on its bytes
    Pending(pending::PendingArgs),
    /// Show the reconcile log
    Log(log::LogArgs),
    /// List device sync sessions
    Sessions(sessions::SessionsArgs),
    /// Serve engine requests as JSON lines
    Serve(serve::ServeArgs),
}

impl Commands {
    pub async fn run(self, ctx: &Context) -> anyhow::Result<()> {
        match self {
            Commands::Init(args) => init::run(args, ctx),
            Commands::Ingest(args) => ingest::run(args, ctx),
            Commands::Seal(args) => seal::run(args, ctx),
            Commands::Hold(args) => hold::run(args, ctx),
            Commands::Upload(args) => upload::run(args, ctx),
            Commands::Pending(args) => pending::run(args, ctx),
            Commands::Log(args) => log::run(args, ctx),
            Commands::Sessions(args) => sessions::run(args, ctx),
            Commands::Serve(args) => serve::run(args, ctx).await,
        }
    }
}
