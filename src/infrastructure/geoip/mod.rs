//! IP geolocation used to enrich clicks with a country.
//!
//! - [`ExternalApiGeoLookup`] - HTTP JSON service with a moka result cache
//! - [`NullGeoLookup`] - Disabled lookup

mod external_api;
mod null;
mod provider;

pub use external_api::{ExternalApiGeoLookup, parse_country};
pub use null::NullGeoLookup;
pub use provider::{GeoLookup, is_public_ip};
