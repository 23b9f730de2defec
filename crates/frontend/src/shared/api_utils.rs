//! API URL construction for frontend-backend communication

/// Port of the axum backend during development (`trunk serve` runs elsewhere)
const BACKEND_PORT: &str = "3000";

/// Base URL for API requests, derived from the current window location.
///
/// Returns an empty string (same-origin relative URLs) when there is no window.
pub fn api_base() -> String {
    let Some(window) = web_sys::window() else {
        return String::new();
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    base_for(&protocol, &hostname)
}

fn base_for(protocol: &str, hostname: &str) -> String {
    format!("{}//{}:{}", protocol, hostname, BACKEND_PORT)
}

/// Full API URL for a path starting with "/api/"
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_for_uses_backend_port() {
        assert_eq!(base_for("http:", "localhost"), "http://localhost:3000");
        assert_eq!(base_for("https:", "example.com"), "https://example.com:3000");
    }
}
