//! Per-peer token bucket in front of the whole router.

use axum::Router;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// Interval at which one request is refilled per client (20 requests/s).
const REPLENISH_MS: u64 = 50;

/// Burst allowance per client.
const BURST_SIZE: u32 = 200;

/// Wraps `router` in a governor token bucket keyed by client IP.
///
/// Redirects are hit by real visitors behind shared NATs, so the bucket is
/// generous; the strict limit on link creation lives in
/// [`super::create_limit`].
///
/// # Key Extraction
///
/// - `behind_proxy = false`: the socket peer address
/// - `behind_proxy = true`: `X-Forwarded-For` / `X-Real-IP` / `Forwarded`,
///   falling back to the peer address. Enable only behind a trusted proxy.
///
/// The router must be served with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn apply<S>(router: Router<S>, behind_proxy: bool) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    if behind_proxy {
        let config = GovernorConfigBuilder::default()
            .key_extractor(SmartIpKeyExtractor)
            .per_millisecond(REPLENISH_MS)
            .burst_size(BURST_SIZE)
            .finish();

        match config {
            Some(config) => router.layer(GovernorLayer::new(Arc::new(config))),
            None => router,
        }
    } else {
        let config = GovernorConfigBuilder::default()
            .key_extractor(PeerIpKeyExtractor)
            .per_millisecond(REPLENISH_MS)
            .burst_size(BURST_SIZE)
            .finish();

        match config {
            Some(config) => router.layer(GovernorLayer::new(Arc::new(config))),
            None => router,
        }
    }
}
