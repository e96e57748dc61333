//! Lattica Store - persistence boundary
//!
//! Provides:
//! - The `RemoteMap` key-value abstraction that indexes are maintained
//!   against, with in-memory and SQLite implementations
//! - The `ElementSource` abstraction for scanning the full element set
//! - SQLite connection management and error mapping

pub mod db;
pub mod element_source;
pub mod errors;
pub mod remote_map;
pub mod sqlite;

// Re-export key types
pub use element_source::{ElementSource, InMemoryElementSource};
pub use errors::{Result, StoreError};
pub use remote_map::{InMemoryRemoteMap, RemoteMap};
pub use sqlite::SqliteRemoteMap;
