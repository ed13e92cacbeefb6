//! Session cookie construction and parsing
//!
//! The session id travels in a single `session_id` cookie with
//! `SameSite=Strict; HttpOnly; Secure`. Set on register/login, cleared on
//! logout and on expiry detection.

use axum::http::header::COOKIE;
use axum::http::HeaderMap;

pub const SESSION_COOKIE: &str = "session_id";

const COOKIE_ATTRIBUTES: &str = "Path=/; SameSite=Strict; HttpOnly; Secure";

/// `Set-Cookie` value that installs a session id for `max_age` seconds.
pub fn session_cookie(session_id: &str, max_age: i64) -> String {
    format!("{SESSION_COOKIE}={session_id}; Max-Age={max_age}; {COOKIE_ATTRIBUTES}")
}

/// `Set-Cookie` value that instructs the client to drop the session cookie.
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Max-Age=0; {COOKIE_ATTRIBUTES}")
}

/// Pull the session id out of the request's `Cookie` header, if any.
pub fn extract_session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(COOKIE)
        .and_then(|h| h.to_str().ok())
        .and_then(|cookies| {
            for cookie in cookies.split(';') {
                let cookie = cookie.trim();
                if let Some(value) = cookie.strip_prefix("session_id=") {
                    return Some(value.to_string());
                }
            }
            None
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn set_cookie_carries_required_attributes() {
        let cookie = session_cookie("abc123", 2_592_000);
        assert!(cookie.starts_with("session_id=abc123; "));
        assert!(cookie.contains("Max-Age=2592000"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        let cookie = clear_session_cookie();
        assert!(cookie.starts_with("session_id=; "));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
    }

    #[test]
    fn extracts_session_id_from_single_cookie() {
        let headers = headers_with_cookie("session_id=tok123");
        assert_eq!(extract_session_id(&headers).as_deref(), Some("tok123"));
    }

    #[test]
    fn extracts_session_id_among_other_cookies() {
        let headers = headers_with_cookie("theme=dark; session_id=tok123; lang=en");
        assert_eq!(extract_session_id(&headers).as_deref(), Some("tok123"));
    }

    #[test]
    fn absent_cookie_yields_none() {
        assert_eq!(extract_session_id(&HeaderMap::new()), None);

        let headers = headers_with_cookie("theme=dark");
        assert_eq!(extract_session_id(&headers), None);
    }
}
