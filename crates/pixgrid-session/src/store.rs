//! The session map.
//!
//! One `tokio::sync::RwLock` guards the whole map. Lookups share the
//! read lock; inserts and reaper passes take the write lock. The
//! last-used timestamp lives in an atomic inside each session so that
//! `get` can refresh it without upgrading to the write lock.
//!
//! Timestamps are stored as milliseconds since the store was created
//! and only ever move forward (`fetch_max`), so a late-arriving touch
//! with an older reading cannot roll a session's last use back.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use pixgrid_pipeline::RgbaImage;
use tokio::sync::RwLock;

use crate::clock::{Clock, SystemClock};
use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::id::SessionId;

struct Session {
    image: Arc<RgbaImage>,
    created_ms: u64,
    last_used_ms: AtomicU64,
}

impl Session {
    fn touch(&self, now_ms: u64) {
        self.last_used_ms.fetch_max(now_ms, Ordering::AcqRel);
    }

    fn idle_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.last_used_ms.load(Ordering::Acquire))
    }
}

/// Timestamps of a live session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionInfo {
    /// When the session was created.
    pub created_at: Instant,
    /// Most recent successful lookup (or creation).
    pub last_used_at: Instant,
}

/// Concurrent map from [`SessionId`] to an uploaded source image.
pub struct SessionStore<C: Clock = SystemClock> {
    sessions: RwLock<HashMap<SessionId, Session>>,
    config: SessionConfig,
    clock: C,
    epoch: Instant,
}

impl SessionStore<SystemClock> {
    /// Create an empty store on the system clock.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> SessionStore<C> {
    /// Create an empty store reading time from `clock`.
    pub fn with_clock(config: SessionConfig, clock: C) -> Self {
        let epoch = clock.now();
        Self {
            sessions: RwLock::new(HashMap::new()),
            config,
            clock,
            epoch,
        }
    }

    /// The expiry policy this store was built with.
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    fn now_ms(&self) -> u64 {
        let elapsed = self.clock.now().saturating_duration_since(self.epoch);
        u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
    }

    fn instant_at(&self, ms: u64) -> Instant {
        self.epoch + Duration::from_millis(ms)
    }

    /// Admit `image` as a new session and return its id.
    ///
    /// The id is drawn before the lock is taken. On the (astronomically
    /// unlikely) event that it collides with a live session, a new one
    /// is drawn.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Randomness`] if no id can be generated.
    /// Nothing is inserted in that case.
    pub async fn create(&self, image: RgbaImage) -> Result<SessionId, SessionError> {
        let now_ms = self.now_ms();
        let session = Session {
            image: Arc::new(image),
            created_ms: now_ms,
            last_used_ms: AtomicU64::new(now_ms),
        };

        loop {
            let id = SessionId::generate()?;
            let mut sessions = self.sessions.write().await;
            if let Entry::Vacant(slot) = sessions.entry(id.clone()) {
                slot.insert(session);
                return Ok(id);
            }
        }
    }

    /// Look up a session's image, refreshing its last-used time.
    ///
    /// Returns `None` for ids that were never issued or have expired;
    /// the client must upload again.
    pub async fn get(&self, id: &str) -> Option<Arc<RgbaImage>> {
        let now_ms = self.now_ms();
        let sessions = self.sessions.read().await;
        let session = sessions.get(id)?;
        session.touch(now_ms);
        Some(Arc::clone(&session.image))
    }

    /// Timestamps of a session, without refreshing it.
    pub async fn info(&self, id: &str) -> Option<SessionInfo> {
        let sessions = self.sessions.read().await;
        sessions.get(id).map(|s| SessionInfo {
            created_at: self.instant_at(s.created_ms),
            last_used_at: self.instant_at(s.last_used_ms.load(Ordering::Acquire)),
        })
    }

    /// Remove every session idle for longer than the configured
    /// timeout. Returns how many were removed.
    ///
    /// Holds the write lock for the whole scan.
    pub async fn reap_expired(&self) -> usize {
        let idle_limit = u64::try_from(self.config.idle_timeout.as_millis()).unwrap_or(u64::MAX);
        let mut sessions = self.sessions.write().await;
        let now_ms = self.now_ms();
        let before = sessions.len();
        sessions.retain(|_, session| session.idle_ms(now_ms) <= idle_limit);
        before - sessions.len()
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether there are no live sessions.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
