//! Session manager for the HTTP transport
//!
//! Tracks the sessions handed out through the session-id header and expires
//! the ones that have been idle longer than the configured timeout.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime};

use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Gets the current time in milliseconds
fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// One client session
#[derive(Debug, Clone)]
pub struct Session {
    pub session_id: String,
    pub created_at: SystemTime,
    /// Last activity timestamp (stored as millis since epoch for atomic updates)
    last_activity: Arc<AtomicU64>,
}

impl Session {
    fn new(session_id: String) -> Self {
        Self {
            session_id,
            created_at: SystemTime::now(),
            last_activity: Arc::new(AtomicU64::new(now_millis())),
        }
    }

    fn touch(&self) {
        self.last_activity.store(now_millis(), Ordering::SeqCst);
    }

    fn idle_millis(&self, now: u64) -> u64 {
        now.saturating_sub(self.last_activity.load(Ordering::SeqCst))
    }
}

#[derive(Clone)]
pub struct SessionManager {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    session_timeout: Duration,
}

impl SessionManager {
    pub fn new(session_timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            session_timeout,
        }
    }

    /// Open a new session and return its id
    pub async fn open(&self) -> String {
        let session_id = uuid::Uuid::new_v4().to_string();
        let mut sessions = self.sessions.write().await;
        sessions.insert(session_id.clone(), Session::new(session_id.clone()));
        tracing::debug!("Opened session {}", session_id);
        session_id
    }

    /// Record activity on a session; false if it does not exist
    pub async fn touch(&self, session_id: &str) -> bool {
        let sessions = self.sessions.read().await;
        match sessions.get(session_id) {
            Some(session) => {
                session.touch();
                true
            }
            None => false,
        }
    }

    pub async fn get(&self, session_id: &str) -> Option<Session> {
        self.sessions.read().await.get(session_id).cloned()
    }

    /// End a session; false if it did not exist
    pub async fn close(&self, session_id: &str) -> bool {
        let removed = self.sessions.write().await.remove(session_id).is_some();
        if removed {
            tracing::debug!("Closed session {}", session_id);
        }
        removed
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drop sessions idle for longer than the timeout, returning how many went
    pub async fn run_maintenance(&self) -> usize {
        let now = now_millis();
        let timeout_millis = self.session_timeout.as_millis() as u64;

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.idle_millis(now) <= timeout_millis);
        let expired = before - sessions.len();

        if expired > 0 {
            tracing::info!("Expired {} idle sessions", expired);
        }
        expired
    }

    /// Run maintenance on a fixed interval until the task is aborted
    pub fn spawn_maintenance(&self, interval: Duration) -> JoinHandle<()> {
        let manager = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                manager.run_maintenance().await;
            }
        })
    }
}
