use clap::Args;

use crate::config::Context;
use crate::output::{header, kv, opt, print_json};

#[derive(Args)]
pub struct SessionsArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: SessionsArgs, ctx: &Context) -> anyhow::Result<()> {
    let tenant = ctx.tenant()?;
    let engine = ctx.engine()?;
    let sessions = engine.list_sync_sessions(&tenant)?;

    if args.json {
        return print_json(&sessions);
    }
    if sessions.is_empty() {
        println!("No devices have synced.");
    }
    for session in &sessions {
        println!("{}", header(&session.device_id));
        println!("{}", kv("session", &session.id.to_string()));
        println!("{}", kv("individual", opt(session.individual_id.as_deref())));
        println!("{}", kv("app version", &session.app_version));
        println!("{}", kv("first contact", &session.first_contact_ms.to_string()));
        println!("{}", kv("last contact", &session.last_contact_ms.to_string()));
    }
    Ok(())
}
