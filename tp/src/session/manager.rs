//! SessionManager - owns the per-user session map

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use super::ConversationContext;

/// Keyed map of live sessions
///
/// Each context sits behind its own lock so turns for one user serialize
/// while other users proceed. The map lock is held only long enough to
/// hand out a session handle.
#[derive(Default)]
pub struct SessionManager {
    sessions: Mutex<HashMap<String, Arc<Mutex<ConversationContext>>>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the session for a user, creating it on first sight
    pub async fn open(&self, user_id: &str) -> Arc<Mutex<ConversationContext>> {
        debug!(%user_id, "SessionManager::open: called");
        let mut sessions = self.sessions.lock().await;
        sessions
            .entry(user_id.to_string())
            .or_insert_with(|| {
                debug!(%user_id, "SessionManager::open: creating session");
                Arc::new(Mutex::new(ConversationContext::new(user_id)))
            })
            .clone()
    }

    /// Get an existing session, if the user has one
    pub async fn get(&self, user_id: &str) -> Option<Arc<Mutex<ConversationContext>>> {
        debug!(%user_id, "SessionManager::get: called");
        self.sessions.lock().await.get(user_id).cloned()
    }

    /// Terminate a user's session
    ///
    /// Returns true when a session existed. Turn history and the current
    /// trip reference go with it; stored trip facts are unaffected.
    pub async fn close(&self, user_id: &str) -> bool {
        debug!(%user_id, "SessionManager::close: called");
        self.sessions.lock().await.remove(user_id).is_some()
    }

    /// Number of live sessions
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_creates_once() {
        let manager = SessionManager::new();

        let first = manager.open("amira").await;
        let second = manager.open("amira").await;

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(manager.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_without_open() {
        let manager = SessionManager::new();
        assert!(manager.get("amira").await.is_none());
    }

    #[tokio::test]
    async fn test_sessions_are_per_user() {
        let manager = SessionManager::new();

        let amira = manager.open("amira").await;
        amira.lock().await.append_user_turn("Rome please");

        let noor = manager.open("noor").await;

        assert!(noor.lock().await.history().is_empty());
        assert_eq!(manager.len().await, 2);
    }

    #[tokio::test]
    async fn test_close_removes_session() {
        let manager = SessionManager::new();
        manager.open("amira").await;

        assert!(manager.close("amira").await);
        assert!(!manager.close("amira").await);
        assert!(manager.get("amira").await.is_none());
        assert!(manager.is_empty().await);
    }
}
