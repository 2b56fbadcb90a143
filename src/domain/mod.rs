//! Domain layer containing business entities and repository contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//!
//! The domain layer has no dependencies on infrastructure or presentation
//! layers. Business logic lives in [`crate::application::services`].
//!
//! # Redirect Flow
//!
//! 1. HTTP handler resolves the slug via [`repositories::LinkRepository`]
//! 2. The attribution service builds a [`entities::NewAffiliateClick`]
//! 3. [`repositories::ClickRepository::record_click`] inserts the click and
//!    bumps the aggregate counter in one transaction
//! 4. The handler answers with a redirect

pub mod entities;
pub mod repositories;
