//! Structural element comparison
//!
//! Equality covers the identifier, annotation values, and (for types) field
//! definitions, all deeply. Absent elements never compare equal: an element
//! against nothing is unequal in both directions, and so is nothing against
//! nothing - presence is part of the contract, not a wildcard.

use crate::element::Element;

/// Variant-aware deep structural equality over optional elements
///
/// Returns false whenever either side is absent, including when both are.
pub fn is_equal_elements(first: Option<&Element>, second: Option<&Element>) -> bool {
    match (first, second) {
        (Some(first), Some(second)) => first == second,
        _ => false,
    }
}
