//! HTTP surface: the redirect endpoints, the JSON redirect contract and the
//! token-protected operator API.
//!
//! - [`dto`] - camelCase request and response bodies
//! - [`handlers`] - one module per endpoint group
//! - [`middleware`] - bearer auth, creation limit, token bucket, request tracing
//! - [`routes`] - `/api` sub-routers

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
