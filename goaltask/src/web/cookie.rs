//! Session cookie handling

use axum::http::HeaderMap;
use axum::http::header::COOKIE;
use tracing::debug;

use crate::session::SessionId;

/// Name of the cookie carrying the session id
pub const SESSION_COOKIE: &str = "goaltask_session";

/// Session id from the request's `Cookie` headers, if present and valid
pub fn session_from_headers(headers: &HeaderMap) -> Option<SessionId> {
    let id = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| SessionId::parse(value));
    debug!(?id, "session_from_headers: called");
    id
}

/// `Set-Cookie` value for a new session
pub fn session_cookie(id: SessionId) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, id)
}

/// Existing session, or a fresh one plus the cookie that establishes it
pub fn resolve_session(headers: &HeaderMap) -> (SessionId, Option<String>) {
    match session_from_headers(headers) {
        Some(id) => (id, None),
        None => {
            let id = SessionId::new();
            debug!(%id, "resolve_session: starting new session");
            (id, Some(session_cookie(id)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_parse_cookie_among_others() {
        let id = SessionId::new();
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {}={}; lang=en", SESSION_COOKIE, id)).unwrap(),
        );

        assert_eq!(session_from_headers(&headers), Some(id));
        assert_eq!(resolve_session(&headers), (id, None));
    }

    #[test]
    fn test_invalid_cookie_starts_new_session() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("goaltask_session=garbage"));

        assert_eq!(session_from_headers(&headers), None);
        let (id, cookie) = resolve_session(&headers);
        let cookie = cookie.unwrap();
        assert!(cookie.starts_with(&format!("{}={}", SESSION_COOKIE, id)));
        assert!(cookie.contains("HttpOnly"));
    }

    #[test]
    fn test_no_cookie_header() {
        let (_, cookie) = resolve_session(&HeaderMap::new());
        assert!(cookie.is_some());
    }
}
