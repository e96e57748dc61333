use thiserror::Error;

/// Result type alias using LatticaError
pub type Result<T> = std::result::Result<T, LatticaError>;

/// Error taxonomy for the element model
///
/// Parse and nesting errors are local-recoverable: callers are expected to
/// validate input before constructing identifiers in hot paths. Registration
/// and merge conflicts are hard failures - this layer never silently drops or
/// overwrites a colliding element.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LatticaError {
    /// Full-name string does not follow the identifier grammar
    #[error("Malformed element id '{input}': {reason}")]
    Parse { input: String, reason: String },

    /// Requested id kind cannot be nested under the current identifier
    #[error("Cannot nest a '{requested}' id under '{parent}'")]
    InvalidNesting { parent: String, requested: String },

    /// An element with this id is already registered
    #[error("Element already registered: {elem_id}")]
    DuplicateRegistration { elem_id: String },

    /// Both registries define structurally different elements for the same id
    #[error("Merge conflict on element: {elem_id}")]
    MergeConflict { elem_id: String },

    /// A change pair carried neither a before nor an after state
    #[error("Change must have a before state, an after state, or both")]
    EmptyChange,

    /// Serialization error (JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl From<serde_json::Error> for LatticaError {
    fn from(err: serde_json::Error) -> Self {
        LatticaError::Serialization {
            message: err.to_string(),
        }
    }
}
