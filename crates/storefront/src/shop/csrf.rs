//! CSRF token tracking.
//!
//! The shop API issues its anti-forgery token as a cookie and expects it
//! echoed back in the `X-CSRFToken` header on every mutating request. The
//! token source watches `Set-Cookie` response headers for the configured
//! cookie name and hands out the most recently observed value.

use std::sync::{Arc, RwLock};

use reqwest::header::{HeaderMap, SET_COOKIE};

/// Request header carrying the CSRF token.
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Supplies the CSRF token for mutating requests.
///
/// Before any token has been observed, [`current`](Self::current) returns an
/// empty string; the request is still sent and the server rejects it.
#[derive(Debug, Clone)]
pub struct CsrfTokenSource {
    cookie_name: String,
    token: Arc<RwLock<Option<String>>>,
}

impl CsrfTokenSource {
    /// Create a token source watching for the named cookie.
    #[must_use]
    pub fn new(cookie_name: impl Into<String>) -> Self {
        Self {
            cookie_name: cookie_name.into(),
            token: Arc::new(RwLock::new(None)),
        }
    }

    /// The token to send right now; empty if no cookie has been seen yet.
    #[must_use]
    pub fn current(&self) -> String {
        self.token
            .read()
            .map(|guard| guard.clone().unwrap_or_default())
            .unwrap_or_default()
    }

    /// Scan response headers for the CSRF cookie and remember its value.
    ///
    /// The last observed value wins, matching how a browser's cookie jar
    /// behaves when the server rotates the token.
    pub fn observe(&self, headers: &HeaderMap) {
        for header in headers.get_all(SET_COOKIE) {
            let Ok(raw) = header.to_str() else { continue };
            let Some(value) = parse_cookie_value(raw, &self.cookie_name) else {
                continue;
            };
            if let Ok(mut guard) = self.token.write() {
                *guard = Some(value.to_string());
            }
        }
    }
}

/// Extract a cookie's value from a `Set-Cookie` header line, ignoring
/// attributes like `Path` and `Max-Age`.
fn parse_cookie_value<'a>(set_cookie: &'a str, name: &str) -> Option<&'a str> {
    let pair = set_cookie.split(';').next()?.trim();
    let (cookie_name, value) = pair.split_once('=')?;
    (cookie_name.trim() == name).then(|| value.trim())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers_with(lines: &[&str]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for line in lines {
            headers.append(SET_COOKIE, HeaderValue::from_str(line).unwrap());
        }
        headers
    }

    #[test]
    fn test_empty_before_any_cookie() {
        let source = CsrfTokenSource::new("csrftoken");
        assert_eq!(source.current(), "");
    }

    #[test]
    fn test_observes_named_cookie() {
        let source = CsrfTokenSource::new("csrftoken");
        source.observe(&headers_with(&[
            "sessionid=abc123; Path=/; HttpOnly",
            "csrftoken=tok-1; Path=/; SameSite=Lax",
        ]));
        assert_eq!(source.current(), "tok-1");
    }

    #[test]
    fn test_last_observed_value_wins() {
        let source = CsrfTokenSource::new("csrftoken");
        source.observe(&headers_with(&["csrftoken=old; Path=/"]));
        source.observe(&headers_with(&["csrftoken=new; Path=/"]));
        assert_eq!(source.current(), "new");
    }

    #[test]
    fn test_ignores_other_cookies() {
        let source = CsrfTokenSource::new("csrftoken");
        source.observe(&headers_with(&["sessionid=abc123; Path=/"]));
        assert_eq!(source.current(), "");
    }

    #[test]
    fn test_parse_cookie_value() {
        assert_eq!(
            parse_cookie_value("csrftoken=tok; Path=/", "csrftoken"),
            Some("tok")
        );
        assert_eq!(parse_cookie_value("csrftoken=tok", "csrftoken"), Some("tok"));
        assert_eq!(parse_cookie_value("other=tok", "csrftoken"), None);
        assert_eq!(parse_cookie_value("malformed", "csrftoken"), None);
    }
}
