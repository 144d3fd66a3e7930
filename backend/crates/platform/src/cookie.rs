//! Session Cookie Handling
//!
//! Builds `Set-Cookie` values for the session cookie and reads the session
//! id back from request headers.

use std::fmt;
use std::time::Duration;

use axum::http::{HeaderMap, HeaderValue, header};
use kernel::id::SessionId;

pub const DEFAULT_COOKIE_NAME: &str = "session_id";

/// SameSite policy for cookies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieConfig {
    pub name: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    pub path: String,
    /// `None` makes a browser-session cookie
    pub max_age: Option<Duration>,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_COOKIE_NAME.to_string(),
            secure: true,
            http_only: true,
            same_site: SameSite::Lax,
            path: "/".to_string(),
            max_age: None,
        }
    }
}

impl CookieConfig {
    /// Same as default but without `Secure`, for plain-HTTP local servers
    pub fn development() -> Self {
        Self {
            secure: false,
            ..Self::default()
        }
    }

    /// Build Set-Cookie header value
    pub fn build_set_cookie(&self, value: &str) -> String {
        let mut cookie = format!("{}={}", self.name, value);
        self.push_attributes(&mut cookie);

        if let Some(max_age) = self.max_age {
            cookie.push_str(&format!("; Max-Age={}", max_age.as_secs()));
        }

        cookie
    }

    /// Build Set-Cookie header that expires the cookie immediately
    pub fn build_delete_cookie(&self) -> String {
        let mut cookie = format!("{}=", self.name);
        self.push_attributes(&mut cookie);
        cookie.push_str("; Max-Age=0");
        cookie
    }

    fn push_attributes(&self, cookie: &mut String) {
        if self.http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie.push_str(&format!("; SameSite={}", self.same_site));
        cookie.push_str(&format!("; Path={}", self.path));
    }
}

/// Extract a cookie value from headers
///
/// Every `Cookie` header is searched; the first match wins.
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;

            if key == name {
                Some(value.to_string())
            } else {
                None
            }
        })
}

/// Create a Set-Cookie header value
///
/// Returns `None` when `value` contains bytes that cannot appear in a header.
pub fn set_cookie_header(config: &CookieConfig, value: &str) -> Option<HeaderValue> {
    HeaderValue::from_str(&config.build_set_cookie(value)).ok()
}

/// Session id carried by the request, if present and well formed
pub fn session_id_from_headers(headers: &HeaderMap, config: &CookieConfig) -> Option<SessionId> {
    let raw = extract_cookie(headers, &config.name)?;
    match raw.parse() {
        Ok(id) => Some(id),
        Err(e) => {
            tracing::debug!(error = %e, cookie = %config.name, "Ignoring malformed session cookie");
            None
        }
    }
}

/// Append the cookie for `session_id` to response headers
pub fn issue_session_cookie(headers: &mut HeaderMap, config: &CookieConfig, session_id: SessionId) {
    if let Some(value) = set_cookie_header(config, &session_id.to_string()) {
        headers.append(header::SET_COOKIE, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_config_build() {
        let config = CookieConfig {
            name: "test".to_string(),
            secure: true,
            http_only: true,
            same_site: SameSite::Strict,
            path: "/api".to_string(),
            max_age: Some(Duration::from_secs(3600)),
        };

        assert_eq!(
            config.build_set_cookie("value123"),
            "test=value123; HttpOnly; Secure; SameSite=Strict; Path=/api; Max-Age=3600"
        );
    }

    #[test]
    fn test_development_cookie_is_not_secure() {
        let cookie = CookieConfig::development().build_set_cookie("v");
        assert!(cookie.starts_with("session_id=v"));
        assert!(!cookie.contains("Secure"));
        assert!(!cookie.contains("Max-Age"));
    }

    #[test]
    fn test_delete_cookie_keeps_attributes() {
        let cookie = CookieConfig::default().build_delete_cookie();
        assert_eq!(
            cookie,
            "session_id=; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age=0"
        );
    }

    #[test]
    fn test_extract_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("foo=bar; session=abc123; other=xyz"),
        );

        assert_eq!(
            extract_cookie(&headers, "session"),
            Some("abc123".to_string())
        );
        assert_eq!(extract_cookie(&headers, "foo"), Some("bar".to_string()));
        assert_eq!(extract_cookie(&headers, "missing"), None);
    }

    #[test]
    fn test_extract_cookie_across_headers() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("a=1"));
        headers.append(header::COOKIE, HeaderValue::from_static("b=2"));
        assert_eq!(extract_cookie(&headers, "b"), Some("2".to_string()));
    }

    #[test]
    fn test_session_id_from_headers() {
        let config = CookieConfig::default();
        let id = SessionId::new();

        let mut headers = HeaderMap::new();
        issue_session_cookie(&mut headers, &config, id);
        let set_cookie = headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
        assert!(set_cookie.starts_with(&format!("session_id={id}")));

        let mut request = HeaderMap::new();
        request.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("session_id={id}")).unwrap(),
        );
        assert_eq!(session_id_from_headers(&request, &config), Some(id));
    }

    #[test]
    fn test_session_id_from_headers_rejects_garbage() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("session_id=nope"));
        assert_eq!(session_id_from_headers(&headers, &CookieConfig::default()), None);
        assert_eq!(session_id_from_headers(&HeaderMap::new(), &CookieConfig::default()), None);
    }

    #[test]
    fn test_set_cookie_header_rejects_control_bytes() {
        assert!(set_cookie_header(&CookieConfig::default(), "bad\nvalue").is_none());
    }
}
