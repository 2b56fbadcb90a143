//! Data Transfer Objects for API requests and responses.
//!
//! Public JSON contracts use camelCase field names.

pub mod analytics;
pub mod health;
pub mod maintenance;
pub mod redirect;
