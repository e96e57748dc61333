//! Lattica Index - incremental index maintenance
//!
//! Maintains persisted reverse indexes over the live element set from a
//! stream of element changes:
//! - A generic versioned update protocol with safe fallback to full
//!   re-indexing when the schema version or the underlying cache is stale
//! - The changed-by index (author attribution per environment)
//! - The static-file reference index
//!
//! Callers serialize update calls per index; the protocol tolerates
//! interruption by rebuilding on the next call.

pub mod changed_by;
pub mod errors;
pub mod runner;
pub mod static_files;

// Re-export key types
pub use changed_by::{update_changed_by_index, CHANGED_BY_INDEX_KEY, CHANGED_BY_INDEX_VERSION};
pub use errors::{IndexError, Result};
pub use runner::refresh_changes;
pub use static_files::{
    static_file_paths, update_static_files_index, STATIC_FILES_INDEX_KEY,
    STATIC_FILES_INDEX_VERSION,
};
