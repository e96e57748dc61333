//! Error handling for lattica-index
//!
//! Index maintenance surfaces backing-store failures unchanged; a failed
//! update leaves the version bookkeeping so the next invocation retries a
//! full rebuild rather than trusting a partial one.

use lattica_core::LatticaError;
use lattica_store::StoreError;
use thiserror::Error;

/// Result type alias using IndexError
pub type Result<T> = std::result::Result<T, IndexError>;

/// Failures raised while maintaining an index
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndexError {
    /// Backing store or element source failure, propagated not retried
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Element model failure while interpreting a change
    #[error(transparent)]
    Core(#[from] LatticaError),
}
