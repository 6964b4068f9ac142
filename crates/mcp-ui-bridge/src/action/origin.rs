//! The origin whitelist.
//!
//! `validate_origin` is a strict allowlist, not a blocklist: every string
//! that doesn't match one of the three accepted shapes is rejected,
//! including strings that fail to parse as a URL at all. Adding a new
//! scheme means changing this function, not configuring it — the spec is
//! explicit that this is by design.

use url::Url;

/// Decide whether `origin` (the `event.origin` of an incoming postMessage)
/// is one this host accepts messages from.
///
/// Accepts:
/// - the literal string `"null"` (a sandboxed frame without
///   `allow-same-origin`, or a `srcdoc` frame);
/// - any URL with scheme `https`;
/// - any URL with scheme `http` whose host is `localhost` or `127.0.0.1`,
///   on any port.
///
/// Rejects everything else, including `file:`, `javascript:`, `data:`,
/// non-localhost `http:`, the empty string, and strings that aren't valid
/// URLs.
#[must_use]
pub fn validate_origin(origin: &str) -> bool {
    if origin == "null" {
        return true;
    }

    let Ok(url) = Url::parse(origin) else {
        return false;
    };

    match url.scheme() {
        "https" => true,
        "http" => matches!(url.host_str(), Some("localhost" | "127.0.0.1")),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::validate_origin;

    #[test]
    fn accepts_null() {
        assert!(validate_origin("null"));
    }

    #[test]
    fn accepts_https_any_host_and_port() {
        assert!(validate_origin("https://example.com"));
        assert!(validate_origin("https://example.com:8443"));
    }

    #[test]
    fn accepts_http_localhost_and_loopback() {
        assert!(validate_origin("http://localhost"));
        assert!(validate_origin("http://localhost:3000"));
        assert!(validate_origin("http://127.0.0.1:8080"));
    }

    #[test]
    fn rejects_http_non_localhost() {
        assert!(!validate_origin("http://example.com"));
        assert!(!validate_origin("http://192.168.1.1"));
    }

    #[test]
    fn rejects_dangerous_schemes() {
        assert!(!validate_origin("file:///etc/passwd"));
        assert!(!validate_origin("javascript:alert(1)"));
        assert!(!validate_origin("data:text/html,<script>"));
    }

    #[test]
    fn rejects_unparseable_and_empty() {
        assert!(!validate_origin(""));
        assert!(!validate_origin("://invalid"));
    }
}
