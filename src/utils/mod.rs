//! Utility functions for slug derivation, URL processing, and request handling.
//!
//! - [`slug`] - Slug derivation and validation
//! - [`url_normalizer`] - URL normalization and sanitization
//! - [`client_ip`] - Client address extraction from proxy headers

pub mod client_ip;
pub mod slug;
pub mod url_normalizer;
