//! Injected diagnostics for semantic events
//!
//! The core never writes semantic diagnostics to a global logger; callers
//! inject a [`DiagnosticObserver`]. [`TracingObserver`] is the production
//! default and forwards events to `tracing`.

use crate::elem_id::ElemId;

/// Why an index decided to rebuild from scratch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RebuildReason {
    /// Persisted schema version differs from the current derivation logic
    VersionMismatch { stored: Option<u32>, current: u32 },
    /// The caller reported the persisted store as not trustworthy
    CacheInvalid,
}

/// Callback surface for diagnostic events raised by the core
///
/// All methods default to no-ops so observers implement only what they need.
pub trait DiagnosticObserver {
    /// An index is discarding its persisted state and rebuilding
    fn index_rebuild(&mut self, index_name: &str, reason: &RebuildReason) {
        let _ = (index_name, reason);
    }

    /// A registry merge tolerated a structurally-unequal collision
    fn merge_conflict(&mut self, elem_id: &ElemId) {
        let _ = elem_id;
    }
}

/// Observer that forwards events to the `tracing` facility
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl DiagnosticObserver for TracingObserver {
    fn index_rebuild(&mut self, index_name: &str, reason: &RebuildReason) {
        match reason {
            RebuildReason::VersionMismatch { stored, current } => tracing::info!(
                index = index_name,
                stored = ?stored,
                current = *current,
                "index map is out of date, re-indexing"
            ),
            RebuildReason::CacheInvalid => {
                tracing::info!(index = index_name, "cache is invalid, re-indexing")
            }
        }
    }

    fn merge_conflict(&mut self, elem_id: &ElemId) {
        tracing::warn!(elem_id = %elem_id, "merge kept one side of a conflicting element");
    }
}

/// Observer that drops every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl DiagnosticObserver for NullObserver {}

/// Observer that records events for test assertions
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    pub rebuilds: Vec<(String, RebuildReason)>,
    pub conflicts: Vec<ElemId>,
}

impl DiagnosticObserver for RecordingObserver {
    fn index_rebuild(&mut self, index_name: &str, reason: &RebuildReason) {
        self.rebuilds.push((index_name.to_string(), reason.clone()));
    }

    fn merge_conflict(&mut self, elem_id: &ElemId) {
        self.conflicts.push(elem_id.clone());
    }
}
