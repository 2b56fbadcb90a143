//! Slug derivation and validation for affiliate links.
//!
//! Auto-created links get a readable slug built from the target host and path,
//! e.g. `https://example.com/path` becomes `example.com-path`.

use crate::error::AppError;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;
use url::Url;

/// Maximum slug length in characters.
pub const MAX_SLUG_LEN: usize = 64;

/// Slug used when nothing usable is left after slugifying.
const FALLBACK_SLUG: &str = "link";

/// Shape of an operator-chosen slug.
static SLUG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9](?:[a-z0-9.-]*[a-z0-9])?$").unwrap());

/// Slugs that would shadow service routes.
const RESERVED_SLUGS: &[&str] = &["api", "out", "health"];

/// Turns arbitrary text into a slug.
///
/// # Rules
///
/// 1. Lowercased
/// 2. Every run of characters outside `[a-z0-9.]` becomes a single `-`
/// 3. Leading and trailing `-` / `.` are trimmed
/// 4. Truncated to [`MAX_SLUG_LEN`] characters (and trimmed again)
/// 5. An empty result becomes `"link"`
///
/// # Examples
///
/// ```ignore
/// assert_eq!(slugify("example.com/path"), "example.com-path");
/// assert_eq!(slugify("Shop.Example.com/Sale?id=1"), "shop.example.com-sale-id-1");
/// assert_eq!(slugify("///"), "link");
/// ```
pub fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_dash = false;

    for c in input.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c);
        } else {
            pending_dash = true;
        }
    }

    let trimmed = trim_separators(&out);
    let truncated: String = trimmed.chars().take(MAX_SLUG_LEN).collect();
    let slug = trim_separators(&truncated);

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug.to_string()
    }
}

/// Derives the base slug for a target URL from its host and path.
///
/// Query string and fragment do not contribute. Unparseable input is
/// slugified as plain text.
pub fn slug_for_url(target_url: &str) -> String {
    match Url::parse(target_url) {
        Ok(url) => {
            let host = url.host_str().unwrap_or_default();
            slugify(&format!("{}{}", host, url.path()))
        }
        Err(_) => slugify(target_url),
    }
}

/// Returns the slug to try on the given 1-based attempt.
///
/// Attempt 1 is `base`; attempt `n > 1` is `base-n`, with `base` shortened
/// so the result still fits in [`MAX_SLUG_LEN`].
pub fn slug_candidate(base: &str, attempt: u32) -> String {
    if attempt <= 1 {
        return base.to_string();
    }

    let suffix = format!("-{}", attempt);
    let room = MAX_SLUG_LEN.saturating_sub(suffix.len());
    let head: String = base.chars().take(room).collect();
    let head = trim_separators(&head);
    let head = if head.is_empty() { FALLBACK_SLUG } else { head };

    format!("{}{}", head, suffix)
}

/// Returns true if `slug` collides with a service route.
pub fn is_reserved_slug(slug: &str) -> bool {
    RESERVED_SLUGS.contains(&slug)
}

/// Validates a slug chosen by an operator for a manual link.
///
/// # Rules
///
/// - 1 to [`MAX_SLUG_LEN`] characters
/// - Only lowercase letters, digits, `-` and `.`
/// - Cannot start or end with `-` or `.`
/// - Cannot be a reserved route name
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_slug(slug: &str) -> Result<(), AppError> {
    if slug.is_empty() || slug.len() > MAX_SLUG_LEN {
        return Err(AppError::bad_request(
            format!("Slug must be 1-{} characters", MAX_SLUG_LEN),
            json!({ "provided_length": slug.len() }),
        ));
    }

    if !SLUG_REGEX.is_match(slug) {
        return Err(AppError::bad_request(
            "Slug may only contain lowercase letters, digits, '-' and '.', and must start and end with a letter or digit",
            json!({ "slug": slug }),
        ));
    }

    if is_reserved_slug(slug) {
        return Err(AppError::bad_request(
            "Slug is reserved",
            json!({ "slug": slug }),
        ));
    }

    Ok(())
}

fn trim_separators(s: &str) -> &str {
    s.trim_matches(|c| c == '-' || c == '.')
}
