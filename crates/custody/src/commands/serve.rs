use std::sync::Arc;

use clap::Args;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use custody_core::id::{EvidenceObjectId, HoldId, TenantId};
use custody_core::types::IngestBatch;
use custody_sync::{CustodyEngine, SyncError};

use crate::config::Context;

#[derive(Args)]
pub struct ServeArgs {
    /// Read requests from stdin and write responses to stdout, one JSON
    /// document per line
    #[arg(long)]
    stdio: bool,
}

/// One line of the stdio protocol. Every tenant-scoped request names its
/// tenant explicitly.
#[derive(Debug, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
enum Request {
    Hello,
    IngestBatch {
        tenant: TenantId,
        individual_id: Option<String>,
        batch: IngestBatch,
    },
    SealEvidenceObjects {
        tenant: TenantId,
        individual_id: Option<String>,
        ids: Vec<EvidenceObjectId>,
        reason: Option<String>,
    },
    CreateHold {
        tenant: TenantId,
        hold_type: String,
        #[serde(default)]
        title: String,
    },
    AddHoldTarget {
        tenant: TenantId,
        hold_id: HoldId,
        evidence_object_id: EvidenceObjectId,
    },
    ReleaseHold {
        tenant: TenantId,
        hold_id: HoldId,
    },
    ListHolds {
        tenant: TenantId,
        evidence_object_id: Option<EvidenceObjectId>,
    },
    CompleteUpload {
        tenant: TenantId,
        individual_id: Option<String>,
        evidence_object_id: EvidenceObjectId,
        storage_key: String,
    },
    ListPending {
        tenant: TenantId,
    },
    ReconcileLog {
        tenant: TenantId,
        batch_client_request_id: Option<String>,
    },
    UpsertSyncSession {
        tenant: TenantId,
        device_id: String,
        individual_id: Option<String>,
        #[serde(default)]
        app_version: String,
    },
    ListSyncSessions {
        tenant: TenantId,
    },
}

pub async fn run(args: ServeArgs, ctx: &Context) -> anyhow::Result<()> {
    if !args.stdio {
        anyhow::bail!("only --stdio is supported");
    }
    let engine = Arc::new(ctx.engine()?);
    tracing::info!(root = %engine.store().root().display(), "serving custody requests on stdio");

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }
        let engine = engine.clone();
        let response = tokio::task::spawn_blocking(move || handle_line(&engine, &line)).await?;
        let mut out = serde_json::to_vec(&response)?;
        out.push(b'\n');
        stdout.write_all(&out).await?;
        stdout.flush().await?;
    }
    Ok(())
}

/// Parse and execute one request line. Failures become `{"ok": false}`
/// responses so one bad request never ends the session.
fn handle_line(engine: &CustodyEngine, line: &str) -> Value {
    let raw: Value = match serde_json::from_str(line) {
        Ok(raw) => raw,
        Err(e) => return json!({ "ok": false, "error": format!("invalid json: {e}") }),
    };
    let id = raw.get("id").cloned().unwrap_or(Value::Null);
    let outcome = serde_json::from_value::<Request>(raw)
        .map_err(|e| format!("invalid request: {e}"))
        .and_then(|req| dispatch(engine, req).map_err(|e| e.to_string()));
    match outcome {
        Ok(result) => json!({ "id": id, "ok": true, "result": result }),
        Err(error) => {
            tracing::warn!(%error, "request failed");
            json!({ "id": id, "ok": false, "error": error })
        }
    }
}

fn dispatch(engine: &CustodyEngine, req: Request) -> Result<Value, SyncError> {
    let value = match req {
        Request::Hello => json!({
            "server_version": env!("CARGO_PKG_VERSION"),
            "methods": [
                "ingest_batch", "seal_evidence_objects", "create_hold", "add_hold_target",
                "release_hold", "list_holds", "complete_upload", "list_pending",
                "reconcile_log", "upsert_sync_session", "list_sync_sessions",
            ],
        }),
        Request::IngestBatch {
            tenant,
            individual_id,
            batch,
        } => serde_json::to_value(engine.ingest_batch(&tenant, individual_id.as_deref(), &batch)?)?,
        Request::SealEvidenceObjects {
            tenant,
            individual_id,
            ids,
            reason,
        } => serde_json::to_value(engine.seal_evidence_objects(
            &tenant,
            individual_id.as_deref(),
            &ids,
            reason.as_deref(),
        )?)?,
        Request::CreateHold {
            tenant,
            hold_type,
            title,
        } => serde_json::to_value(engine.create_hold(&tenant, &hold_type, &title)?)?,
        Request::AddHoldTarget {
            tenant,
            hold_id,
            evidence_object_id,
        } => json!({ "added": engine.add_hold_target(&tenant, &hold_id, &evidence_object_id)? }),
        Request::ReleaseHold { tenant, hold_id } => {
            serde_json::to_value(engine.release_hold(&tenant, &hold_id)?)?
        }
        Request::ListHolds {
            tenant,
            evidence_object_id,
        } => match evidence_object_id {
            Some(id) => serde_json::to_value(engine.holds_for_object(&tenant, &id)?)?,
            None => serde_json::to_value(engine.list_holds(&tenant)?)?,
        },
        Request::CompleteUpload {
            tenant,
            individual_id,
            evidence_object_id,
            storage_key,
        } => serde_json::to_value(engine.complete_upload(
            &tenant,
            individual_id.as_deref(),
            &evidence_object_id,
            &storage_key,
        )?)?,
        Request::ListPending { tenant } => serde_json::to_value(engine.list_pending(&tenant)?)?,
        Request::ReconcileLog {
            tenant,
            batch_client_request_id,
        } => match batch_client_request_id {
            Some(batch) => serde_json::to_value(engine.reconcile_log_for_batch(&tenant, &batch)?)?,
            None => serde_json::to_value(engine.reconcile_log(&tenant)?)?,
        },
        Request::UpsertSyncSession {
            tenant,
            device_id,
            individual_id,
            app_version,
        } => serde_json::to_value(engine.upsert_sync_session(
            &tenant,
            &device_id,
            individual_id.as_deref(),
            &app_version,
        )?)?,
        Request::ListSyncSessions { tenant } => {
            serde_json::to_value(engine.list_sync_sessions(&tenant)?)?
        }
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use custody_store::StoreConfig;

    fn make_engine() -> (tempfile::TempDir, CustodyEngine) {
        let tmp = tempfile::tempdir().unwrap();
        let engine = CustodyEngine::init(tmp.path(), StoreConfig::default()).unwrap();
        (tmp, engine)
    }

    fn ingest_line(batch_id: &str) -> String {
        json!({
            "id": 7,
            "method": "ingest_batch",
            "tenant": "acme",
            "batch": {
                "device_id": "dev-1",
                "batch_client_request_id": batch_id,
                "items": [{
                    "client_request_id": "r-1",
                    "source_type": "file_r2",
                    "title": "photo.jpg",
                    "payload": {"filename": "photo.jpg"}
                }]
            }
        })
        .to_string()
    }

    #[test]
    fn ingest_over_stdio_protocol() {
        let (_tmp, engine) = make_engine();
        let first = handle_line(&engine, &ingest_line("b-1"));
        assert_eq!(first["id"], 7);
        assert_eq!(first["ok"], true);
        assert_eq!(first["result"]["from_cache"], false);
        assert_eq!(first["result"]["results"][0]["status"], "created_new");

        let replay = handle_line(&engine, &ingest_line("b-1"));
        assert_eq!(replay["result"]["from_cache"], true);

        let pending = handle_line(&engine, r#"{"method":"list_pending","tenant":"acme"}"#);
        assert_eq!(pending["result"].as_array().unwrap().len(), 1);

        let id = first["result"]["results"][0]["evidence_object_id"].as_str().unwrap();
        let seal = handle_line(
            &engine,
            &json!({"method": "seal_evidence_objects", "tenant": "acme", "ids": [id]}).to_string(),
        );
        assert_eq!(seal["result"][0]["sealed"], false);
        assert_eq!(seal["result"][0]["error"], "PENDING_BYTES");
    }

    #[test]
    fn bad_requests_do_not_end_the_session() {
        let (_tmp, engine) = make_engine();
        assert_eq!(handle_line(&engine, "{not json")["ok"], false);
        assert_eq!(handle_line(&engine, r#"{"method":"nope"}"#)["ok"], false);
        let missing_tenant = handle_line(&engine, r#"{"method":"list_pending"}"#);
        assert_eq!(missing_tenant["ok"], false);
        let bad_tenant = handle_line(&engine, r#"{"method":"list_pending","tenant":"a/b"}"#);
        assert_eq!(bad_tenant["ok"], false);
        let unknown_hold = handle_line(
            &engine,
            &json!({"method": "release_hold", "tenant": "acme", "hold_id": HoldId::new()}).to_string(),
        );
        assert_eq!(unknown_hold["ok"], false);
        assert_eq!(handle_line(&engine, r#"{"method":"hello"}"#)["ok"], true);
    }
}
