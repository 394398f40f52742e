//! SessionStore - in-memory per-session state
//!
//! Each browser session gets its own [`SessionState`], keyed by [`SessionId`].
//! Nothing is shared between sessions and nothing outlives the process.
//! Sessions idle longer than the store's TTL are dropped on the next access,
//! unless a generation for them is still running.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tracing::debug;
use uuid::Uuid;

use crate::domain::Breakdown;

/// Idle time before a session is forgotten, unless configured otherwise
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(3600);

/// Opaque session identifier (UUID v7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generate a fresh session id
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Parse an id previously handed out by [`SessionId::new`]
    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s.trim()).ok().map(Self)
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// State held for one session
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Example goal picked from the sidebar, pre-fills the form
    pub selected_goal: Option<String>,
    /// Last successful breakdown
    pub breakdown: Option<Breakdown>,
    /// A generation request is currently running
    pub in_flight: bool,
    /// Last time the session was read or written
    pub last_seen: Instant,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            selected_goal: None,
            breakdown: None,
            in_flight: false,
            last_seen: Instant::now(),
        }
    }
}

impl SessionState {
    fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        !self.in_flight && now.saturating_duration_since(self.last_seen) > ttl
    }
}

type SessionMap = HashMap<SessionId, SessionState>;

/// Shared, cloneable session map
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<Mutex<SessionMap>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_SESSION_TTL)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that forgets sessions idle for longer than `ttl`
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Lock the map and drop expired sessions
    fn lock(&self) -> MutexGuard<'_, SessionMap> {
        let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        let before = map.len();
        map.retain(|_, state| !state.is_expired(now, self.ttl));
        if map.len() < before {
            debug!(evicted = before - map.len(), remaining = map.len(), "SessionStore: evicted idle sessions");
        }
        map
    }

    /// Copy of the session's state (default if unknown)
    pub fn snapshot(&self, id: SessionId) -> SessionState {
        debug!(%id, "SessionStore::snapshot: called");
        match self.lock().get_mut(&id) {
            Some(state) => {
                state.last_seen = Instant::now();
                state.clone()
            }
            None => SessionState::default(),
        }
    }

    /// Mutate the session's state, creating it if needed
    pub fn update<R>(&self, id: SessionId, f: impl FnOnce(&mut SessionState) -> R) -> R {
        debug!(%id, "SessionStore::update: called");
        let mut map = self.lock();
        let state = map.entry(id).or_default();
        state.last_seen = Instant::now();
        f(state)
    }

    /// Remember an example goal for the next form render
    pub fn select_goal(&self, id: SessionId, goal: impl Into<String>) {
        let goal = goal.into();
        debug!(%id, %goal, "SessionStore::select_goal: called");
        self.update(id, |state| state.selected_goal = Some(goal));
    }

    /// Replace the session's breakdown
    pub fn store_breakdown(&self, id: SessionId, breakdown: Breakdown) {
        debug!(%id, "SessionStore::store_breakdown: called");
        self.update(id, |state| state.breakdown = Some(breakdown));
    }

    /// Current breakdown, if one was generated
    pub fn breakdown(&self, id: SessionId) -> Option<Breakdown> {
        self.lock().get_mut(&id).and_then(|state| {
            state.last_seen = Instant::now();
            state.breakdown.clone()
        })
    }

    /// Mark a generation as started
    ///
    /// Returns `None` while another generation for the same session is still
    /// running. The flag is cleared when the returned guard drops.
    pub fn try_begin(&self, id: SessionId) -> Option<InFlightGuard> {
        let started = self.update(id, |state| {
            if state.in_flight {
                false
            } else {
                state.in_flight = true;
                true
            }
        });
        debug!(%id, %started, "SessionStore::try_begin: called");
        started.then(|| InFlightGuard {
            store: self.clone(),
            id,
        })
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// Clears the session's in-flight flag on drop
#[derive(Debug)]
pub struct InFlightGuard {
    store: SessionStore,
    id: SessionId,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        debug!(id = %self.id, "InFlightGuard::drop: clearing in-flight flag");
        self.store.update(self.id, |state| state.in_flight = false);
    }
}
