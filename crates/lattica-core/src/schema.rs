//! Canonical schema constants shared across the element model and indexes
//!
//! These constants ensure consistency across annotation access, index key
//! construction, and structured logging.

// Core annotation keys (underscore prefix marks platform-owned annotations)
pub const CHANGED_BY: &str = "_changed_by";
pub const CHANGED_AT: &str = "_changed_at";
pub const CREATED_BY: &str = "_created_by";
pub const SERVICE_URL: &str = "_service_url";

// Author attribution
pub const UNKNOWN_AUTHOR: &str = "Unknown";
pub const AUTHOR_KEY_SEPARATOR: &str = "@@";

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_INDEX: &str = "index";
pub const FIELD_ELEM_COUNT: &str = "elem_count";
