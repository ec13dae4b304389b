//! # Elasticsearch Index Client
//!
//! Per-user document store for mirrored collection entries.
//!
//! ## Overview
//!
//! Each synced user owns one logical index (`discogs_{user}`) holding one
//! document per collection item, keyed by the item's natural id. This crate
//! provides:
//!
//! - **`DocumentIndex`** : the seam the reconciler programs against
//! - **`ElasticIndex`**: the Elasticsearch REST implementation with
//!   basic-auth, scroll-based full scans, and lazy index creation
//!
//! A full-scan against a missing index is treated as "empty" and provisions
//! the index, never as an error. Upserts and deletes are idempotent.

pub mod client;
pub mod error;
pub mod types;

pub use client::{DocumentIndex, ElasticConfig, ElasticIndex};
pub use error::{IndexError, Result};
