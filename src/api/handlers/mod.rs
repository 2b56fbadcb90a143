//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod analytics;
pub mod health;
pub mod maintenance;
pub mod redirect;

pub use analytics::link_analytics_handler;
pub use health::health_handler;
pub use maintenance::run_maintenance_handler;
pub use redirect::{redirect_handler, resolve_slug_handler, resolve_url_handler};
