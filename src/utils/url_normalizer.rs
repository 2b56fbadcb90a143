//! Target URL validation and normalization.
//!
//! Two spellings of the same destination must map to the same affiliate link,
//! so every target URL is reduced to a canonical form before lookup or insert.

use url::Url;

/// Longest accepted target URL, in bytes.
pub const MAX_URL_LEN: u64 = 2048;

/// Errors that can occur during URL normalization.
#[derive(Debug, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL has no host")]
    MissingHost,

    #[error("URL is longer than {MAX_URL_LEN} characters")]
    TooLong,
}

/// Normalizes a target URL to a canonical form.
///
/// # Normalization Rules
///
/// 1. Surrounding whitespace is trimmed
/// 2. Only `http` and `https` with a non-empty host are accepted
/// 3. Hostname is lowercased (the `url` crate does this for special schemes)
/// 4. Default ports (80 / 443) are dropped
/// 5. Fragment is dropped
/// 6. Path and query are preserved as written
///
/// # Errors
///
/// Returns [`UrlNormalizationError::InvalidFormat`] for malformed URLs,
/// [`UrlNormalizationError::UnsupportedProtocol`] for other schemes,
/// [`UrlNormalizationError::MissingHost`] when there is no host and
/// [`UrlNormalizationError::TooLong`] past [`MAX_URL_LEN`].
///
/// # Examples
///
/// ```ignore
/// assert_eq!(
///     normalize_url(" HTTPS://Shop.Example.com:443/deal#reviews ").unwrap(),
///     "https://shop.example.com/deal"
/// );
/// ```
pub fn normalize_url(input: &str) -> Result<String, UrlNormalizationError> {
    let input = input.trim();
    if input.len() as u64 > MAX_URL_LEN {
        return Err(UrlNormalizationError::TooLong);
    }

    let mut url =
        Url::parse(input).map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(UrlNormalizationError::UnsupportedProtocol);
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err(UrlNormalizationError::MissingHost),
    }

    url.set_fragment(None);

    // `Url` already elides a port equal to the scheme default.
    if matches!(
        (url.scheme(), url.port()),
        ("http", Some(80)) | ("https", Some(443))
    ) {
        let _ = url.set_port(None);
    }

    Ok(url.to_string())
}
