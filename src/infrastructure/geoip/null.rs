//! Disabled geolocation.

use super::provider::GeoLookup;
use async_trait::async_trait;

/// Lookup that never resolves a country. Used when `GEOIP_ENABLED=false`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullGeoLookup;

#[async_trait]
impl GeoLookup for NullGeoLookup {
    async fn lookup_country(&self, _ip: &str) -> Option<String> {
        None
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}
