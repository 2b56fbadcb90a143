//! DTOs for the JSON redirect endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::LinkTarget;
use crate::utils::url_normalizer::MAX_URL_LEN;

/// Query for `GET /api/redirect?u=<url>`.
///
/// `u` is optional at the type level so a missing parameter becomes a JSON
/// 400 instead of a plain-text extractor rejection.
#[derive(Debug, Deserialize, Validate)]
pub struct ResolveQuery {
    #[validate(length(min = 1, max = MAX_URL_LEN, message = "u must be 1-2048 characters"))]
    pub u: Option<String>,
}

/// Destination returned to the client-side interstitial page.
///
/// # Example
///
/// ```json
/// {
///   "targetUrl": "https://example.com/path",
///   "slug": "example.com-path",
///   "linkId": 1
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RedirectResponse {
    pub target_url: String,
    pub slug: String,
    pub link_id: i64,
}

impl From<LinkTarget> for RedirectResponse {
    fn from(target: LinkTarget) -> Self {
        Self {
            target_url: target.target_url,
            slug: target.slug,
            link_id: target.id,
        }
    }
}
