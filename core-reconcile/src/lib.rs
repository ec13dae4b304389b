//! # Reconciliation Core
//!
//! One-way reconciliation between a remote collection and its search index.
//!
//! ## Overview
//!
//! The reconciler makes the indexed document set exactly mirror the remote
//! collection's id set:
//!
//! 1. Scan the ids currently indexed for the user
//! 2. Pre-flight: verify the user exists (and the token, when configured)
//! 3. Stream the collection page by page, upserting items whose natural id
//!    is not yet indexed, pacing each item against the rate-limit budget
//! 4. Delete indexed documents whose id no longer appears upstream
//!
//! The diff is id-presence-only: an item already indexed is never
//! re-upserted, even if its upstream payload changed. Every operation is
//! idempotent, so an interrupted run is recovered by running again.

pub mod error;
pub mod reconciler;
pub mod report;

pub use error::{Result, SyncError};
pub use reconciler::{Reconciler, SyncConfig};
pub use report::SyncReport;
