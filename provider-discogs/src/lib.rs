//! # Discogs Provider
//!
//! Connector for the Discogs user-collection API.
//!
//! ## Overview
//!
//! This module provides:
//! - Pre-flight verification that the target user exists
//! - Pre-flight verification that a configured personal token is valid
//! - Paginated fetching of collection releases (fixed page size)
//! - Optional `Authorization: Discogs token=...` authentication, which also
//!   selects the larger rate-limit budget upstream
//! - Bounded retry with exponential backoff on 429/5xx and transport errors

pub mod connector;
pub mod error;
pub mod types;

pub use connector::{CollectionSource, DiscogsConnector};
pub use error::{DiscogsError, Result};
pub use types::{CollectionItem, CollectionPage, Pagination};
