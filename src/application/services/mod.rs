//! Business logic services for the application layer.

pub mod analytics_service;
pub mod attribution_service;
pub mod auth_service;
pub mod maintenance_service;
pub mod rate_limiter;
pub mod resolver_service;

pub use analytics_service::{AnalyticsService, LinkAnalytics};
pub use attribution_service::AttributionService;
pub use auth_service::AuthService;
pub use maintenance_service::{MaintenanceReport, MaintenanceService};
pub use rate_limiter::RateLimiter;
pub use resolver_service::ResolverService;
