//! External HTTP geolocation service with an in-process result cache.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use serde_json::Value;
use tracing::{debug, trace, warn};
use ureq::Agent;

use super::provider::{GeoLookup, is_public_ip};

const GEOIP_CACHE_MAX_CAPACITY: u64 = 10_000;

/// Geolocation backed by an HTTP JSON API such as ip-api.com.
///
/// Results (including misses) are cached per IP for the configured TTL, and
/// concurrent lookups of the same IP share a single request.
pub struct ExternalApiGeoLookup {
    agent: Agent,
    url_template: String,
    cache: Cache<String, Option<String>>,
}

impl ExternalApiGeoLookup {
    /// Creates the provider.
    ///
    /// `url_template` must contain an `{ip}` placeholder, for example
    /// `http://ip-api.com/json/{ip}?fields=status,countryCode`.
    pub fn new(url_template: &str, timeout: Duration, cache_ttl: Duration) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();

        let cache = Cache::builder()
            .time_to_live(cache_ttl)
            .max_capacity(GEOIP_CACHE_MAX_CAPACITY)
            .build();

        Self {
            agent,
            url_template: url_template.to_string(),
            cache,
        }
    }

    fn fetch_blocking(agent: Agent, url: String) -> Option<String> {
        let resp = match agent.get(&url).call() {
            Ok(r) => r,
            Err(e) => {
                warn!("GeoIP request failed: {}", e);
                return None;
            }
        };

        let json: Value = match resp.into_body().read_json() {
            Ok(j) => j,
            Err(e) => {
                warn!("GeoIP response could not be parsed: {}", e);
                return None;
            }
        };

        parse_country(&json)
    }

    async fn fetch(&self, ip: &str) -> Option<String> {
        let url = self.url_template.replace("{ip}", ip);
        let agent = self.agent.clone();

        let country = tokio::task::spawn_blocking(move || Self::fetch_blocking(agent, url))
            .await
            .unwrap_or_else(|e| {
                warn!("GeoIP lookup task failed: {}", e);
                None
            });

        if country.is_none() {
            metrics::counter!("geoip_lookup_failures_total").increment(1);
        }

        country
    }
}

/// Extracts a country code from a geolocation API response.
///
/// Understands ip-api.com (`countryCode`, `status: "fail"`) as well as the
/// `country_code` / `country` field names used by other services.
pub fn parse_country(json: &Value) -> Option<String> {
    if json["status"].as_str() == Some("fail") {
        trace!("GeoIP service returned fail status");
        return None;
    }

    json["countryCode"]
        .as_str()
        .or_else(|| json["country_code"].as_str())
        .or_else(|| json["country"].as_str())
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(|c| c.to_ascii_uppercase())
}

#[async_trait]
impl GeoLookup for ExternalApiGeoLookup {
    async fn lookup_country(&self, ip: &str) -> Option<String> {
        if !is_public_ip(ip) {
            trace!("Skipping GeoIP lookup for non-public address {}", ip);
            return None;
        }

        self.cache
            .get_with(ip.to_string(), async {
                debug!("GeoIP cache miss for {}", ip);
                self.fetch(ip).await
            })
            .await
    }

    fn name(&self) -> &'static str {
        "external_api"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_ip_api_success() {
        let body = json!({ "status": "success", "countryCode": "DE" });
        assert_eq!(parse_country(&body), Some("DE".to_string()));
    }

    #[test]
    fn test_parse_ip_api_fail_status() {
        let body = json!({ "status": "fail", "message": "private range" });
        assert_eq!(parse_country(&body), None);
    }

    #[test]
    fn test_parse_alternate_field_names() {
        assert_eq!(
            parse_country(&json!({ "country_code": "fr" })),
            Some("FR".to_string())
        );
        assert_eq!(
            parse_country(&json!({ "country": "US" })),
            Some("US".to_string())
        );
    }

    #[test]
    fn test_parse_missing_or_blank() {
        assert_eq!(parse_country(&json!({})), None);
        assert_eq!(parse_country(&json!({ "countryCode": "  " })), None);
        assert_eq!(parse_country(&json!("not an object")), None);
    }

    #[tokio::test]
    async fn test_private_ip_skips_lookup() {
        let provider = ExternalApiGeoLookup::new(
            "http://127.0.0.1:9/{ip}",
            Duration::from_millis(200),
            Duration::from_secs(60),
        );

        assert_eq!(provider.lookup_country("192.168.1.1").await, None);
        assert_eq!(provider.lookup_country("unknown").await, None);
    }

    #[tokio::test]
    async fn test_unreachable_service_yields_none() {
        let provider = ExternalApiGeoLookup::new(
            "http://127.0.0.1:9/json/{ip}",
            Duration::from_millis(500),
            Duration::from_secs(60),
        );

        assert_eq!(provider.lookup_country("8.8.8.8").await, None);
    }

    #[tokio::test]
    async fn test_failed_lookup_is_cached() {
        let provider = ExternalApiGeoLookup::new(
            "http://127.0.0.1:9/json/{ip}",
            Duration::from_millis(500),
            Duration::from_secs(60),
        );

        assert_eq!(provider.lookup_country("8.8.4.4").await, None);
        assert_eq!(provider.cache.get("8.8.4.4").await, Some(None));
    }
}
