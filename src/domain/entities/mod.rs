//! Core domain entities representing the affiliate data model.
//!
//! Entities are plain data structures without persistence logic.
//!
//! # Entity Types
//!
//! - [`AffiliateLink`] - A slug mapped to a destination URL with an aggregate counter
//! - [`AffiliateClick`] - A single recorded visit through a link
//! - [`AffiliateDailyStat`] - A per-day rollup of raw clicks
//!
//! Creation inputs live in separate `New*` structs; [`LinkTarget`] is the
//! cacheable subset of a link used on the redirect path.

pub mod click;
pub mod link;
pub mod stats;
pub mod visitor;

pub use click::{AffiliateClick, ClickOutcome, NewAffiliateClick};
pub use link::{AffiliateLink, LinkTarget, NewAffiliateLink};
pub use stats::{AffiliateDailyStat, CountryClicks, DailyClicks, fill_daily_series};
pub use visitor::Visitor;
