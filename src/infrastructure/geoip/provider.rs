//! Geolocation lookup abstraction.

use async_trait::async_trait;
use std::net::IpAddr;

/// Best-effort IP to country resolution.
///
/// Implementations never fail: any problem resolves to `None` so that a
/// redirect is never blocked on geolocation.
#[async_trait]
pub trait GeoLookup: Send + Sync {
    /// Returns the ISO 3166-1 alpha-2 country code for `ip`, if known.
    async fn lookup_country(&self, ip: &str) -> Option<String>;

    /// Provider name for logs and health reporting.
    fn name(&self) -> &'static str;
}

/// Returns true if `ip` is a public address worth sending to a lookup service.
///
/// The `"unknown"` placeholder, unparseable strings, loopback, private,
/// link-local and unspecified addresses are skipped.
pub fn is_public_ip(ip: &str) -> bool {
    let Ok(addr) = ip.trim().parse::<IpAddr>() else {
        return false;
    };

    match addr {
        IpAddr::V4(v4) => {
            !(v4.is_loopback()
                || v4.is_private()
                || v4.is_link_local()
                || v4.is_unspecified()
                || v4.is_broadcast()
                || v4.is_documentation())
        }
        IpAddr::V6(v6) => {
            !(v6.is_loopback()
                || v6.is_unspecified()
                || v6.is_unique_local()
                || v6.is_unicast_link_local())
        }
    }
}
