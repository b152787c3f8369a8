use custody_core::id::{SyncSessionId, TenantId};
use custody_core::types::SyncSession;
use custody_store::{StoreError, TenantWriter};

use crate::engine::{now_ms, CustodyEngine};
use crate::SyncError;

impl CustodyEngine {
    /// Record device contact. The first contact creates the session; later
    /// ones keep its id and first-contact time.
    pub fn upsert_sync_session(
        &self,
        tenant: &TenantId,
        device_id: &str,
        individual_id: Option<&str>,
        app_version: &str,
    ) -> Result<SyncSession, SyncError> {
        if device_id.is_empty() {
            return Err(SyncError::Validation("device_id must not be empty".into()));
        }
        let now = now_ms();
        self.store().write(tenant, |w| {
            touch_session(w, device_id, individual_id, Some(app_version), now).map_err(SyncError::from)
        })
    }

    pub fn get_sync_session(
        &self,
        tenant: &TenantId,
        device_id: &str,
    ) -> Result<Option<SyncSession>, SyncError> {
        Ok(self.store().read(tenant)?.sync_session(device_id)?)
    }

    pub fn list_sync_sessions(&self, tenant: &TenantId) -> Result<Vec<SyncSession>, SyncError> {
        Ok(self.store().read(tenant)?.sync_sessions()?)
    }
}

/// Upsert inside an existing write transaction. A missing app version keeps
/// whatever the device reported last.
pub(crate) fn touch_session(
    w: &TenantWriter<'_>,
    device_id: &str,
    individual_id: Option<&str>,
    app_version: Option<&str>,
    now: u64,
) -> Result<SyncSession, StoreError> {
    let session = match w.sync_session(device_id)? {
        Some(mut session) => {
            if let Some(version) = app_version {
                session.app_version = version.to_string();
            }
            if let Some(individual) = individual_id {
                session.individual_id = Some(individual.to_string());
            }
            session.last_contact_ms = now.max(session.last_contact_ms);
            session
        }
        None => {
            tracing::debug!(tenant = %w.tenant(), device_id, "first contact from device");
            SyncSession {
                id: SyncSessionId::new(),
                tenant_id: w.tenant().clone(),
                device_id: device_id.to_string(),
                individual_id: individual_id.map(str::to_string),
                app_version: app_version.unwrap_or_default().to_string(),
                first_contact_ms: now,
                last_contact_ms: now,
            }
        }
    };
    w.put_sync_session(&session)?;
    Ok(session)
}

#[cfg(test)]
mod tests {
    use crate::engine::testing::*;

    #[test]
    fn upsert_keeps_identity() {
        let (_tmp, engine) = make_engine();
        let t = tenant("acme");
        let first = engine.upsert_sync_session(&t, "dev-1", None, "1.0.0").unwrap();
        let second = engine
            .upsert_sync_session(&t, "dev-1", Some("officer-9"), "1.1.0")
            .unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.first_contact_ms, second.first_contact_ms);
        assert!(second.last_contact_ms >= first.last_contact_ms);
        assert_eq!(second.app_version, "1.1.0");
        assert_eq!(second.individual_id.as_deref(), Some("officer-9"));
        assert_eq!(engine.list_sync_sessions(&t).unwrap().len(), 1);
    }

    #[test]
    fn sessions_are_per_tenant() {
        let (_tmp, engine) = make_engine();
        engine.upsert_sync_session(&tenant("a"), "dev-1", None, "1").unwrap();
        assert!(engine.get_sync_session(&tenant("b"), "dev-1").unwrap().is_none());
        assert!(engine.get_sync_session(&tenant("a"), "dev-1").unwrap().is_some());
    }

    #[test]
    fn empty_device_is_refused() {
        let (_tmp, engine) = make_engine();
        assert!(engine.upsert_sync_session(&tenant("a"), "", None, "1").is_err());
    }
}
