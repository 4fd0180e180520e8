// src/session/mod.rs
// Conversation sessions keyed by id, with per-session locking and idle expiry

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{ChatError, Result};
use crate::llm::Conversation;

/// Default idle lifetime of a session
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

/// How often the sweeper looks for expired sessions
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// A single conversation owned by the server
pub struct Session {
    id: String,
    created_at: DateTime<Utc>,
    last_used_ms: AtomicI64,
    conversation: Mutex<Conversation>,
}

impl Session {
    fn new(conversation: Conversation) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: now,
            last_used_ms: AtomicI64::new(now.timestamp_millis()),
            conversation: Mutex::new(conversation),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_used(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.last_used_ms.load(Ordering::Relaxed))
            .unwrap_or(self.created_at)
    }

    pub fn touch(&self) {
        self.last_used_ms
            .store(Utc::now().timestamp_millis(), Ordering::Relaxed);
    }

    /// Lock the conversation; appends to one session are serialized here
    pub async fn lock(&self) -> MutexGuard<'_, Conversation> {
        self.conversation.lock().await
    }

    /// A session whose conversation is locked is in use and never expires
    fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        if self.conversation.try_lock().is_err() {
            return false;
        }
        // Negative idle time (clock moved back) converts to zero
        let idle = (now - self.last_used()).to_std().unwrap_or_default();
        idle > ttl
    }
}

/// In-memory map from session id to conversation
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Arc<Session>>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL)
    }
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up a session by id, or create one.
    ///
    /// Unknown or expired ids are not adopted: a fresh id is issued instead.
    /// `start` is only called when a new session is needed.
    pub async fn get_or_create<F>(&self, id: Option<&str>, start: F) -> Result<Arc<Session>>
    where
        F: FnOnce() -> Result<Conversation>,
    {
        // Fast path: existing session
        if let Some(id) = id {
            let sessions = self.sessions.read().await;
            if let Some(session) = sessions.get(id) {
                if !session.is_expired(Utc::now(), self.ttl) {
                    session.touch();
                    return Ok(session.clone());
                }
            }
        }

        // Slow path: re-check under the write lock so concurrent first
        // requests for the same id share one session
        let mut sessions = self.sessions.write().await;
        if let Some(id) = id {
            if let Some(session) = sessions.get(id) {
                if !session.is_expired(Utc::now(), self.ttl) {
                    session.touch();
                    return Ok(session.clone());
                }
                sessions.remove(id);
                debug!(session_id = %id, "Dropped expired session");
            }
        }

        let session = Arc::new(Session::new(start()?));
        sessions.insert(session.id.clone(), session.clone());
        info!(session_id = %session.id, total = sessions.len(), "Created chat session");
        Ok(session)
    }

    pub async fn get(&self, id: &str) -> Option<Arc<Session>> {
        self.sessions.read().await.get(id).cloned()
    }

    /// End a session explicitly
    pub async fn remove(&self, id: &str) -> Result<()> {
        match self.sessions.write().await.remove(id) {
            Some(_) => {
                info!(session_id = %id, "Ended chat session");
                Ok(())
            }
            None => Err(ChatError::SessionNotFound(id.to_string())),
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Remove sessions idle longer than the TTL, returning how many were removed
    pub async fn sweep_expired(&self) -> usize {
        self.sweep_expired_at(Utc::now()).await
    }

    pub async fn sweep_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now, self.ttl));
        before - sessions.len()
    }

    /// Spawn the background sweeper
    pub fn spawn_sweeper(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let removed = self.sweep_expired().await;
                if removed > 0 {
                    info!(removed, "Expired idle chat sessions");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::GenerationConfig;

    fn start() -> Result<Conversation> {
        Ok(Conversation::new(GenerationConfig::default()))
    }

    #[tokio::test]
    async fn test_create_without_id() {
        let store = SessionStore::default();
        let session = store.get_or_create(None, start).await.unwrap();
        assert!(!session.id().is_empty());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_same_id_returns_same_session() {
        let store = SessionStore::default();
        let first = store.get_or_create(None, start).await.unwrap();
        let second = store
            .get_or_create(Some(first.id()), || panic!("should not start a new chat"))
            .await
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_id_gets_fresh_session() {
        let store = SessionStore::default();
        let session = store.get_or_create(Some("made-up"), start).await.unwrap();
        assert_ne!(session.id(), "made-up");
        assert!(store.get("made-up").await.is_none());
    }

    #[tokio::test]
    async fn test_start_failure_creates_nothing() {
        let store = SessionStore::default();
        let result = store
            .get_or_create(None, || Err(ChatError::Config("no key".into())))
            .await;
        assert!(result.is_err());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = SessionStore::default();
        let a = store.get_or_create(None, start).await.unwrap();
        let b = store.get_or_create(None, start).await.unwrap();

        a.lock().await.record_exchange("secret", "noted");

        assert_eq!(a.lock().await.len(), 2);
        assert!(b.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_remove() {
        let store = SessionStore::default();
        let session = store.get_or_create(None, start).await.unwrap();
        let id = session.id().to_string();

        store.remove(&id).await.unwrap();
        assert!(store.get(&id).await.is_none());
        assert!(matches!(
            store.remove(&id).await,
            Err(ChatError::SessionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_sweep_expired() {
        let store = SessionStore::new(Duration::from_secs(60));
        store.get_or_create(None, start).await.unwrap();
        store.get_or_create(None, start).await.unwrap();

        assert_eq!(store.sweep_expired_at(Utc::now()).await, 0);

        let later = Utc::now() + chrono::Duration::seconds(61);
        assert_eq!(store.sweep_expired_at(later).await, 2);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_expired_id_is_replaced() {
        let store = SessionStore::new(Duration::from_millis(0));
        let first = store.get_or_create(None, start).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;

        let second = store.get_or_create(Some(first.id()), start).await.unwrap();
        assert_ne!(first.id(), second.id());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_session_lock_serializes_appends() {
        let store = Arc::new(SessionStore::default());
        let session = store.get_or_create(None, start).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..8 {
            let session = session.clone();
            handles.push(tokio::spawn(async move {
                let mut conversation = session.lock().await;
                tokio::time::sleep(Duration::from_millis(1)).await;
                conversation.record_exchange(format!("q{}", i), format!("a{}", i));
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let conversation = session.lock().await;
        assert_eq!(conversation.len(), 16);
        // Every user turn is immediately followed by its own reply
        for pair in conversation.history().chunks(2) {
            assert_eq!(pair[0].text.replace('q', ""), pair[1].text.replace('a', ""));
        }
    }

    #[tokio::test]
    async fn test_huge_ttl_never_expires() {
        let store = SessionStore::new(Duration::from_secs(10_000_000_000_000_000));
        let first = store.get_or_create(None, start).await.unwrap();

        let second = store.get_or_create(Some(first.id()), start).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let far_future = Utc::now() + chrono::Duration::days(365 * 100);
        assert_eq!(store.sweep_expired_at(far_future).await, 0);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_locked_session_is_not_swept() {
        let store = SessionStore::new(Duration::from_secs(1));
        let session = store.get_or_create(None, start).await.unwrap();
        let later = Utc::now() + chrono::Duration::seconds(10);

        let conversation = session.lock().await;
        assert_eq!(store.sweep_expired_at(later).await, 0);
        assert!(store.get(session.id()).await.is_some());

        drop(conversation);
        assert_eq!(store.sweep_expired_at(later).await, 1);
        assert!(store.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_removes_idle_sessions() {
        let store = Arc::new(SessionStore::new(Duration::ZERO));
        let sweeper = store.clone().spawn_sweeper(SWEEP_INTERVAL);

        // Let the first tick pass with an empty store
        tokio::time::sleep(Duration::from_secs(1)).await;

        store.get_or_create(None, start).await.unwrap();
        // Expiry is measured on the wall clock, which the paused runtime
        // does not move
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert_eq!(store.len().await, 1);

        tokio::time::advance(SWEEP_INTERVAL).await;
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(store.is_empty().await);

        sweeper.abort();
    }

    #[tokio::test]
    async fn test_touch_updates_last_used() {
        let store = SessionStore::default();
        let session = store.get_or_create(None, start).await.unwrap();
        let before = session.last_used();
        tokio::time::sleep(Duration::from_millis(5)).await;
        session.touch();
        assert!(session.last_used() > before);
        assert!(session.created_at() <= session.last_used());
    }
}
