//! Client address extraction from proxy headers.

use axum::http::HeaderMap;

use crate::domain::entities::visitor::UNKNOWN_IP;

/// Proxy headers consulted in order after `X-Forwarded-For`.
const SINGLE_VALUE_HEADERS: &[&str] = &["x-real-ip", "cf-connecting-ip"];

/// Extracts the caller's IP from proxy headers.
///
/// # Precedence
///
/// 1. First non-empty entry of `X-Forwarded-For`
/// 2. `X-Real-IP`
/// 3. `CF-Connecting-IP`
/// 4. The literal `"unknown"`
///
/// Values are trimmed and not validated; a client can spoof these headers
/// unless a trusted proxy overwrites them.
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
/// assert_eq!(client_ip(&headers), "203.0.113.7");
/// ```
pub fn client_ip(headers: &HeaderMap) -> String {
    let forwarded = headers
        .get_all("x-forwarded-for")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .find(|ip| !ip.is_empty());

    if let Some(ip) = forwarded {
        return ip.to_string();
    }

    SINGLE_VALUE_HEADERS
        .iter()
        .filter_map(|name| headers.get(*name))
        .filter_map(|v| v.to_str().ok())
        .map(str::trim)
        .find(|ip| !ip.is_empty())
        .unwrap_or(UNKNOWN_IP)
        .to_string()
}

/// Extracts the `User-Agent` header, if present and valid UTF-8.
pub fn user_agent(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
}
