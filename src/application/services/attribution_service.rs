//! Click attribution: geolocation plus the deduplicating counter update.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

use crate::domain::entities::{ClickOutcome, NewAffiliateClick, Visitor};
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;
use crate::infrastructure::geoip::GeoLookup;
use tracing::debug;

/// Service recording one click per visit and counting at most one per
/// (visitor IP, link) within the dedupe window.
pub struct AttributionService<C: ClickRepository + ?Sized> {
    click_repository: Arc<C>,
    geo: Arc<dyn GeoLookup>,
    dedupe_window: Duration,
}

impl<C: ClickRepository + ?Sized> AttributionService<C> {
    /// Creates a new attribution service.
    ///
    /// # Arguments
    ///
    /// - `click_repository` - click storage with the transactional counter update
    /// - `geo` - country lookup; failures resolve to no country
    /// - `dedupe_window` - repeat clicks from one IP inside this window are not counted
    pub fn new(
        click_repository: Arc<C>,
        geo: Arc<dyn GeoLookup>,
        dedupe_window: Duration,
    ) -> Self {
        Self {
            click_repository,
            geo,
            dedupe_window,
        }
    }

    /// The configured dedupe window.
    pub fn dedupe_window(&self) -> Duration {
        self.dedupe_window
    }

    /// Records a click for `link_id` at `now`.
    ///
    /// Always inserts a click row. The link's counter is incremented only if
    /// no counted click from the same IP exists within the window.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link disappeared.
    /// Returns [`AppError::Internal`] on database errors; the redirect fails
    /// rather than going untracked.
    pub async fn record(
        &self,
        link_id: i64,
        visitor: &Visitor,
        now: DateTime<Utc>,
    ) -> Result<ClickOutcome, AppError> {
        let country = if visitor.is_unknown() {
            None
        } else {
            self.geo.lookup_country(&visitor.ip).await
        };

        let outcome = self
            .click_repository
            .record_click(
                NewAffiliateClick {
                    link_id,
                    ip: visitor.ip.clone(),
                    country,
                    user_agent: visitor.user_agent.clone(),
                    created_at: now,
                },
                self.dedupe_window,
            )
            .await?;

        if outcome.counted {
            metrics::counter!("affiliate_clicks_counted_total").increment(1);
        } else {
            metrics::counter!("affiliate_clicks_deduped_total").increment(1);
        }

        debug!(
            link_id,
            ip = %visitor.ip,
            counted = outcome.counted,
            "Click recorded"
        );

        Ok(outcome)
    }
}
