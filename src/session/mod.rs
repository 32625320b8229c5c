//! Per-session state and the registry that owns it.
//!
//! Each browser/client gets its own `Session`; nothing here is shared
//! between sessions except the registry map itself.

pub mod handlers;

use std::{collections::HashMap, sync::Arc};

use time::{Duration, OffsetDateTime};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;
use uuid::Uuid;

use crate::{deck::Deck, import::ImportBatch, state::AppState};

pub fn router() -> axum::Router<AppState> {
    handlers::session_routes()
}

#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub is_admin: bool,
    pub deck: Deck,
    /// Armed by the first delete-all request, consumed by the second.
    pub confirm_delete_all: bool,
    /// Parsed upload waiting for the admin to commit it.
    pub pending_import: Option<ImportBatch>,
    last_seen: OffsetDateTime,
}

impl Session {
    pub(crate) fn new(id: Uuid) -> Self {
        Self {
            id,
            is_admin: false,
            deck: Deck::default(),
            confirm_delete_all: false,
            pending_import: None,
            last_seen: OffsetDateTime::now_utc(),
        }
    }

    pub fn touch(&mut self) {
        self.last_seen = OffsetDateTime::now_utc();
    }
}

pub type SessionHandle = Arc<Mutex<Session>>;

#[derive(Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<RwLock<HashMap<Uuid, SessionHandle>>>,
}

impl SessionRegistry {
    /// Register a new session, dropping ones idle for longer than `idle`.
    pub async fn create(&self, idle: Duration) -> Uuid {
        let id = Uuid::new_v4();
        let cutoff = OffsetDateTime::now_utc() - idle;

        let mut map = self.inner.write().await;
        let before = map.len();
        // A locked session is in use, so it is kept.
        map.retain(|_, s| s.try_lock().map(|s| s.last_seen > cutoff).unwrap_or(true));
        let pruned = before - map.len();
        if pruned > 0 {
            debug!(pruned, "idle sessions dropped");
        }

        map.insert(id, Arc::new(Mutex::new(Session::new(id))));
        id
    }

    pub async fn get(&self, id: Uuid) -> Option<SessionHandle> {
        self.inner.read().await.get(&id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}
