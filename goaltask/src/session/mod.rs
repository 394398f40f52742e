//! Session state
//!
//! Session-scoped values (selected example goal, last breakdown, in-flight
//! flag) live in a [`SessionStore`] keyed by a cookie-carried [`SessionId`].
//! Idle sessions expire after `server.session-ttl-secs`.

mod store;

pub use store::{DEFAULT_SESSION_TTL, InFlightGuard, SessionId, SessionState, SessionStore};
