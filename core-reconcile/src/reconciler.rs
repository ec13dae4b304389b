//! # Reconciler
//!
//! Orchestrates one reconciliation run: scan, pre-flight, page streaming
//! with rate-limit pacing, and cleanup of vanished ids.
//!
//! ## Workflow
//!
//! 1. Scan indexed ids for the user (missing index counts as empty)
//! 2. Verify the user exists upstream; verify the token when configured
//! 3. Stream collection pages; upsert items not yet indexed, accumulate the
//!    remote id set, sleep the per-item rate-limit delay
//! 4. Delete every indexed id absent from the remote set, logging the
//!    title/artist of each removed document on a best-effort basis
//!
//! ## Usage
//!
//! ```rust,ignore
//! use core_reconcile::{Reconciler, SyncConfig};
//!
//! let reconciler = Reconciler::new(source, index).with_config(SyncConfig::default());
//! let report = reconciler.sync("rodneyfool").await?;
//! println!("added {}, deleted {}", report.items_added, report.items_deleted);
//! ```

use index_elastic::DocumentIndex;
use provider_discogs::CollectionSource;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::error::Result;
use crate::report::SyncReport;

/// Reconciler configuration
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Per-item delay when requests carry a token (larger upstream budget)
    pub authenticated_delay: Duration,

    /// Per-item delay for anonymous requests
    pub anonymous_delay: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            // Anonymous requests get a fraction of the authenticated
            // rate-limit budget upstream, hence the longer pause.
            authenticated_delay: Duration::from_secs(1),
            anonymous_delay: Duration::from_secs(3),
        }
    }
}

/// One-way reconciliation between a collection source and a document index
pub struct Reconciler {
    source: Arc<dyn CollectionSource>,
    index: Arc<dyn DocumentIndex>,
    config: SyncConfig,
}

impl Reconciler {
    /// Create a reconciler with the default rate-limit pacing
    pub fn new(source: Arc<dyn CollectionSource>, index: Arc<dyn DocumentIndex>) -> Self {
        Self {
            source,
            index,
            config: SyncConfig::default(),
        }
    }

    /// Override the configuration
    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    /// Run one reconciliation for the given user.
    ///
    /// # Errors
    ///
    /// Fails fast on an unknown user or invalid token; otherwise any
    /// source or index error that survives the clients' bounded retries is
    /// propagated and the run stops where it was. Re-running converges.
    #[instrument(skip(self), fields(user = %user))]
    pub async fn sync(&self, user: &str) -> Result<SyncReport> {
        info!("Phase 1: Scanning indexed ids");
        let existing = self.index.list_ids(user).await?;
        debug!(indexed = existing.len(), "Current index state");

        info!("Phase 2: Verifying user and token");
        let total_upstream = self.source.verify_user(user).await?;
        self.source.verify_token(user).await?;

        let delay = if self.source.is_authenticated() {
            self.config.authenticated_delay
        } else {
            self.config.anonymous_delay
        };

        info!(total = total_upstream, "Phase 3: Streaming collection");
        let mut remote_ids: HashSet<String> = HashSet::new();
        let mut report = SyncReport {
            total_upstream,
            ..Default::default()
        };

        // An empty collection has nothing to page through; the pre-flight
        // count is the only upstream call made.
        if total_upstream > 0 {
            let mut page = 1;
            loop {
                let fetched = self.source.fetch_page(user, page).await?;
                report.pages_fetched += 1;

                for item in fetched.items {
                    report.items_seen += 1;

                    if existing.contains(&item.id) {
                        debug!(id = %item.id, title = %item.title, artist = %item.artist, "Already indexed");
                    } else {
                        info!(id = %item.id, title = %item.title, artist = %item.artist, "New item");
                        self.index.upsert(user, &item.id, &item.body).await?;
                        report.items_added += 1;
                    }
                    remote_ids.insert(item.id);

                    // Client-side rate-limit compliance, applied per item
                    // regardless of whether an upsert happened.
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }

                if page >= fetched.pagination.pages {
                    break;
                }
                page += 1;
            }
        }

        info!("Phase 4: Cleaning up vanished ids");
        for id in &existing {
            if remote_ids.contains(id) {
                continue;
            }

            self.log_pending_delete(user, id).await;
            self.index.delete(user, id).await?;
            report.items_deleted += 1;
        }

        if report.had_cleanup() {
            info!(deleted = report.items_deleted, "Cleanup removed stale documents");
        } else {
            info!("No records to cleanup, index is up to date");
        }

        info!(
            pages = report.pages_fetched,
            seen = report.items_seen,
            added = report.items_added,
            deleted = report.items_deleted,
            "Sync complete"
        );

        Ok(report)
    }

    /// Fetch the doomed document so the log line can say what it was.
    /// Diagnostic only; a failed fetch never blocks the delete.
    async fn log_pending_delete(&self, user: &str, id: &str) {
        match self.index.get(user, id).await {
            Ok(Some(doc)) => {
                let title = doc
                    .get("basic_information")
                    .and_then(|b| b.get("title"))
                    .and_then(Value::as_str)
                    .unwrap_or("(untitled)");
                let artist = doc
                    .get("basic_information")
                    .and_then(|b| b.get("artists"))
                    .and_then(|a| a.get(0))
                    .and_then(|a| a.get("name"))
                    .and_then(Value::as_str)
                    .unwrap_or("(unknown artist)");
                info!(id = %id, title = %title, artist = %artist, "Deleting stale document");
            }
            Ok(None) => info!(id = %id, "Deleting stale document"),
            Err(e) => warn!(id = %id, error = %e, "Could not fetch document before delete"),
        }
    }
}
