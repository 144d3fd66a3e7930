//! Server-side Session Storage
//!
//! A session is a bag of named byte values keyed by a [`SessionId`] that the
//! client carries in a cookie (see [`crate::cookie`]). Storage backends
//! implement [`SessionStore`]; [`MemorySessionStore`] keeps everything in
//! process memory.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use kernel::error::app_error::AppError;
use kernel::id::SessionId;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::cookie::CookieConfig;

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session {0} does not exist or has expired")]
    NotFound(SessionId),

    #[error("Session value could not be encoded: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        let message = err.to_string();
        let app_err = match err {
            SessionError::NotFound(_) => {
                AppError::not_found(message).with_code("ERR_SESSION_NOT_FOUND")
            }
            SessionError::Encoding(_) => AppError::invalid_data(message),
        };
        app_err.with_source(err)
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub cookie: CookieConfig,
    /// Idle lifetime; every write pushes the expiry forward
    pub ttl: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie: CookieConfig::default(),
            ttl: Duration::from_secs(60 * 60 * 24),
        }
    }
}

impl SessionConfig {
    pub fn development() -> Self {
        Self {
            cookie: CookieConfig::development(),
            ..Self::default()
        }
    }
}

/// Trait for session storage backends
#[trait_variant::make(SessionStore: Send)]
pub trait LocalSessionStore {
    /// Start an empty session
    async fn new_session(&self) -> SessionResult<SessionId>;

    /// Raw value stored under `key`; `None` when the key was never set
    async fn get(&self, session_id: SessionId, key: &str) -> SessionResult<Option<Vec<u8>>>;

    async fn set(&self, session_id: SessionId, key: &str, value: Vec<u8>) -> SessionResult<()>;

    /// Drop one value. Deleting a missing key is not an error.
    async fn delete(&self, session_id: SessionId, key: &str) -> SessionResult<()>;

    /// Drop the whole session. Removing an unknown session is not an error.
    async fn remove(&self, session_id: SessionId) -> SessionResult<()>;
}

/// Read a JSON-encoded value
pub async fn get_json<S, T>(store: &S, session_id: SessionId, key: &str) -> SessionResult<Option<T>>
where
    S: SessionStore + Sync,
    T: DeserializeOwned,
{
    match SessionStore::get(store, session_id, key).await? {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => Ok(None),
    }
}

/// Store `value` JSON-encoded
pub async fn set_json<S, T>(store: &S, session_id: SessionId, key: &str, value: &T) -> SessionResult<()>
where
    S: SessionStore + Sync,
    T: Serialize + ?Sized,
{
    let bytes = serde_json::to_vec(value)?;
    SessionStore::set(store, session_id, key, bytes).await
}

#[derive(Debug)]
struct SessionEntry {
    values: HashMap<String, Vec<u8>>,
    expires_at: Instant,
}

impl SessionEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// In-process session store
#[derive(Debug)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<SessionId, SessionEntry>>,
    ttl: Duration,
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new(&SessionConfig::default())
    }
}

impl MemorySessionStore {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl: config.ttl,
        }
    }

    /// Number of sessions held, expired ones included
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drop expired sessions, returning how many were removed
    pub async fn cleanup_expired(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| !entry.is_expired(now));
        let removed = before - sessions.len();
        if removed > 0 {
            tracing::debug!(removed, "Cleaned up expired sessions");
        }
        removed
    }

    /// Run [`cleanup_expired`](Self::cleanup_expired) every `period` on the
    /// current runtime.
    ///
    /// The task holds only a weak reference and exits once the last `Arc`
    /// to the store is dropped.
    pub fn spawn_cleanup(self: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        let weak = Arc::downgrade(self);
        let period = period.max(Duration::from_millis(1));
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let Some(store) = weak.upgrade() else {
                    tracing::debug!("Session store dropped; stopping cleanup");
                    break;
                };
                store.cleanup_expired().await;
            }
        })
    }
}

impl SessionStore for MemorySessionStore {
    async fn new_session(&self) -> SessionResult<SessionId> {
        let id = SessionId::new();
        let entry = SessionEntry {
            values: HashMap::new(),
            expires_at: Instant::now() + self.ttl,
        };
        self.sessions.write().await.insert(id, entry);
        tracing::debug!(session_id = %id, "Session created");
        Ok(id)
    }

    async fn get(&self, session_id: SessionId, key: &str) -> SessionResult<Option<Vec<u8>>> {
        let sessions = self.sessions.read().await;
        match sessions.get(&session_id) {
            Some(entry) if !entry.is_expired(Instant::now()) => Ok(entry.values.get(key).cloned()),
            _ => Err(SessionError::NotFound(session_id)),
        }
    }

    async fn set(&self, session_id: SessionId, key: &str, value: Vec<u8>) -> SessionResult<()> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(&session_id) {
            Some(entry) if !entry.is_expired(now) => {
                entry.values.insert(key.to_string(), value);
                entry.expires_at = now + self.ttl;
                Ok(())
            }
            _ => Err(SessionError::NotFound(session_id)),
        }
    }

    async fn delete(&self, session_id: SessionId, key: &str) -> SessionResult<()> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(&session_id) {
            Some(entry) if !entry.is_expired(now) => {
                entry.values.remove(key);
                entry.expires_at = now + self.ttl;
                Ok(())
            }
            _ => Err(SessionError::NotFound(session_id)),
        }
    }

    async fn remove(&self, session_id: SessionId) -> SessionResult<()> {
        if self.sessions.write().await.remove(&session_id).is_some() {
            tracing::debug!(session_id = %session_id, "Session removed");
        }
        Ok(())
    }
}
