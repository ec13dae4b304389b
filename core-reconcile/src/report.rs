//! Sync run outcome reporting.

use serde::{Deserialize, Serialize};

/// Summary of one reconciliation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Item count reported by the upstream pre-flight check
    pub total_upstream: u64,

    /// Pages fetched from the catalog
    pub pages_fetched: u32,

    /// Items observed across all pages
    pub items_seen: u64,

    /// Documents newly added to the index
    pub items_added: u64,

    /// Documents removed because their id vanished upstream
    pub items_deleted: u64,
}

impl SyncReport {
    /// Whether the run changed the index at all
    pub fn is_noop(&self) -> bool {
        self.items_added == 0 && self.items_deleted == 0
    }

    /// Whether the cleanup phase removed anything
    pub fn had_cleanup(&self) -> bool {
        self.items_deleted > 0
    }
}
