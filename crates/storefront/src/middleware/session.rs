//! Session middleware configuration.
//!
//! Sessions are kept in process memory only. A visitor's cart lives in their
//! session, so carts disappear when the session goes idle or the process
//! restarts. Idle sessions are dropped from memory by a periodic sweep.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::{Duration, OffsetDateTime};
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store::{self, ExpiredDeletion};
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "blockshop_session";

/// How often expired sessions are removed from memory.
pub const EXPIRED_SESSION_SWEEP_INTERVAL: StdDuration = StdDuration::from_secs(60);

/// In-memory session store that can delete expired records.
#[derive(Clone, Debug, Default)]
pub struct SessionMemoryStore {
    records: Arc<Mutex<HashMap<Id, Record>>>,
}

impl SessionMemoryStore {
    /// Number of records held, expired or not.
    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    /// Whether no records are held.
    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

fn is_active(record: &Record, now: OffsetDateTime) -> bool {
    record.expiry_date > now
}

#[async_trait]
impl SessionStore for SessionMemoryStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        let mut records = self.records.lock().await;
        while records.contains_key(&record.id) {
            record.id = Id::default();
        }
        records.insert(record.id, record.clone());
        Ok(())
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.records.lock().await.insert(record.id, record.clone());
        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        let now = OffsetDateTime::now_utc();
        Ok(self
            .records
            .lock()
            .await
            .get(session_id)
            .filter(|record| is_active(record, now))
            .cloned())
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        self.records.lock().await.remove(session_id);
        Ok(())
    }
}

#[async_trait]
impl ExpiredDeletion for SessionMemoryStore {
    async fn delete_expired(&self) -> session_store::Result<()> {
        let now = OffsetDateTime::now_utc();
        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|_, record| is_active(record, now));

        let removed = before - records.len();
        if removed > 0 {
            tracing::debug!(removed, remaining = records.len(), "Deleted expired sessions");
        }
        Ok(())
    }
}

/// Spawn the background task that deletes expired sessions every `period`.
///
/// Must be called from within a tokio runtime.
pub fn spawn_expired_session_deletion(store: SessionMemoryStore, period: StdDuration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // The first tick completes immediately.
        interval.tick().await;
        loop {
            interval.tick().await;
            if let Err(e) = store.delete_expired().await {
                tracing::warn!(error = %e, "Failed to delete expired sessions");
            }
        }
    });
}

/// Create the session layer over `store`.
#[must_use]
pub fn create_session_layer(
    config: &StorefrontConfig,
    store: SessionMemoryStore,
) -> SessionManagerLayer<SessionMemoryStore> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(Duration::minutes(
            config.session_idle_minutes,
        )))
        .with_secure(config.is_secure())
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
