//! Session registry — keeps concurrent conversations isolated.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

use crate::llm::TextGenerator;

use super::session::Session;

/// Shared handle to one session. The mutex serializes its inputs.
pub type SessionHandle = Arc<Mutex<Session>>;

/// All live sessions, keyed by id. Nothing is shared between sessions
/// except the generator.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, SessionHandle>>,
    generator: Arc<TextGenerator>,
    default_country_code: String,
}

impl SessionRegistry {
    pub fn new(generator: Arc<TextGenerator>, default_country_code: impl Into<String>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            generator,
            default_country_code: default_country_code.into(),
        }
    }

    /// Create and start a session (the greeting is generated before this
    /// returns).
    pub async fn create(&self) -> SessionHandle {
        let mut session = Session::new(Arc::clone(&self.generator), &self.default_country_code);
        let id = session.id();
        session.start().await;

        let handle = Arc::new(Mutex::new(session));
        self.sessions.write().await.insert(id, Arc::clone(&handle));
        info!(session_id = %id, "Session created");
        handle
    }

    pub async fn get(&self, id: Uuid) -> Option<SessionHandle> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Drop a session. Returns whether it existed.
    pub async fn remove(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            info!(session_id = %id, "Session removed");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
