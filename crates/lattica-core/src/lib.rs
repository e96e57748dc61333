//! Lattica Core - element data model
//!
//! This crate provides the foundational data structures and operations of
//! the Lattica configuration-state platform:
//! - Hierarchical element identifiers with a lossless dotted text form
//! - Typed elements (primitive/object types, fields, instances) over
//!   JSON-like value trees with reference and static-file placeholders
//! - An identity-preserving element registry with conflict-aware merging
//! - Structural comparison, deep cloning, and incremental value diffing
//! - A change stream adapter classifying before/after element pairs

pub mod changes;
pub mod compare;
pub mod diff;
pub mod elem_id;
pub mod element;
pub mod errors;
pub mod logging;
pub mod observe;
pub mod registry;
pub mod schema;
pub mod values;

// Re-export commonly used types
pub use changes::{changes_from_pairs, instance_changes, Change};
pub use compare::is_equal_elements;
pub use diff::changed_values;
pub use elem_id::{ElemId, ElemIdKind, CONFIG_NAME};
pub use element::{
    Annotations, AnnotationTypes, Element, Field, InstanceElement, ObjectType, PrimitiveKind,
    PrimitiveType,
};
pub use errors::{LatticaError, Result};
pub use observe::{DiagnosticObserver, NullObserver, RebuildReason, RecordingObserver, TracingObserver};
pub use registry::{ElementHandle, ElementHint, ElementRegistry, MergePolicy};
pub use values::{walk_value, StaticFileRef, Value, WalkStep};
