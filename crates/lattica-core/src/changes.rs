//! Change stream adapter
//!
//! Normalizes batches of before/after element pairs into addition, removal,
//! and modification events. Classification is purely positional: a pair with
//! both sides is a modification even when the sides are structurally equal -
//! filtering no-ops is the caller's decision.

use crate::element::Element;
use crate::errors::{LatticaError, Result};

/// A classified element change
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    Addition { after: Element },
    Removal { before: Element },
    Modification { before: Element, after: Element },
}

impl Change {
    /// Classify a before/after pair
    ///
    /// # Errors
    ///
    /// Returns `EmptyChange` when neither side is present.
    pub fn from_parts(before: Option<Element>, after: Option<Element>) -> Result<Change> {
        match (before, after) {
            (None, Some(after)) => Ok(Change::Addition { after }),
            (Some(before), None) => Ok(Change::Removal { before }),
            (Some(before), Some(after)) => Ok(Change::Modification { before, after }),
            (None, None) => Err(LatticaError::EmptyChange),
        }
    }

    /// The element this change is about: the after state where one exists
    pub fn data(&self) -> &Element {
        match self {
            Change::Addition { after } => after,
            Change::Removal { before } => before,
            Change::Modification { after, .. } => after,
        }
    }

    pub fn before(&self) -> Option<&Element> {
        match self {
            Change::Addition { .. } => None,
            Change::Removal { before } => Some(before),
            Change::Modification { before, .. } => Some(before),
        }
    }

    pub fn after(&self) -> Option<&Element> {
        match self {
            Change::Addition { after } => Some(after),
            Change::Removal { .. } => None,
            Change::Modification { after, .. } => Some(after),
        }
    }

    pub fn is_addition(&self) -> bool {
        matches!(self, Change::Addition { .. })
    }

    pub fn is_removal(&self) -> bool {
        matches!(self, Change::Removal { .. })
    }

    pub fn is_modification(&self) -> bool {
        matches!(self, Change::Modification { .. })
    }

    pub fn is_addition_or_modification(&self) -> bool {
        !self.is_removal()
    }
}

/// Classify an ordered batch of before/after pairs
///
/// # Errors
///
/// Returns `EmptyChange` if any pair has neither side.
pub fn changes_from_pairs(
    pairs: impl IntoIterator<Item = (Option<Element>, Option<Element>)>,
) -> Result<Vec<Change>> {
    pairs
        .into_iter()
        .map(|(before, after)| Change::from_parts(before, after))
        .collect()
}

/// Changes whose subject is an instance element
///
/// Most index consumers only track instance data; this keeps type and field
/// churn out of their input.
pub fn instance_changes<'a>(
    changes: impl IntoIterator<Item = &'a Change>,
) -> impl Iterator<Item = &'a Change> {
    changes
        .into_iter()
        .filter(|change| change.data().is_instance())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elem_id::ElemId;
    use crate::element::{InstanceElement, ObjectType, PrimitiveKind, PrimitiveType};
    use crate::values::Value;

    fn instance(name: &str) -> Element {
        Element::from(
            InstanceElement::new(name, &ElemId::new("test", "obj"), Value::empty_map()).unwrap(),
        )
    }

    #[test]
    fn test_pair_classification() {
        let added = Change::from_parts(None, Some(instance("a"))).unwrap();
        assert!(added.is_addition());
        assert!(added.before().is_none());

        let removed = Change::from_parts(Some(instance("a")), None).unwrap();
        assert!(removed.is_removal());
        assert!(removed.after().is_none());

        let modified =
            Change::from_parts(Some(instance("a")), Some(instance("a"))).unwrap();
        assert!(modified.is_modification());
        assert!(modified.is_addition_or_modification());
    }

    #[test]
    fn test_equal_sides_still_classify_as_modification() {
        let same = instance("same");
        let change = Change::from_parts(Some(same.clone()), Some(same)).unwrap();
        assert!(change.is_modification());
    }

    #[test]
    fn test_empty_pair_is_an_error() {
        assert!(matches!(
            Change::from_parts(None, None),
            Err(LatticaError::EmptyChange)
        ));
    }

    #[test]
    fn test_data_prefers_after_state() {
        let before = instance("before");
        let after = instance("after");
        let change = Change::from_parts(Some(before.clone()), Some(after.clone())).unwrap();
        assert_eq!(change.data(), &after);

        let removal = Change::from_parts(Some(before.clone()), None).unwrap();
        assert_eq!(removal.data(), &before);
    }

    #[test]
    fn test_changes_from_pairs_keeps_order() {
        let changes = changes_from_pairs([
            (None, Some(instance("a"))),
            (Some(instance("b")), None),
            (Some(instance("c")), Some(instance("c"))),
        ])
        .unwrap();
        assert_eq!(changes.len(), 3);
        assert!(changes[0].is_addition());
        assert!(changes[1].is_removal());
        assert!(changes[2].is_modification());
    }

    #[test]
    fn test_instance_changes_filters_out_types() {
        let type_change = Change::from_parts(
            None,
            Some(Element::from(ObjectType::new(ElemId::new("test", "obj")))),
        )
        .unwrap();
        let prim_change = Change::from_parts(
            Some(Element::from(PrimitiveType::new(
                ElemId::new("test", "string"),
                PrimitiveKind::String,
            ))),
            None,
        )
        .unwrap();
        let inst_change = Change::from_parts(None, Some(instance("a"))).unwrap();

        let changes = vec![type_change, prim_change, inst_change.clone()];
        let filtered: Vec<&Change> = instance_changes(&changes).collect();
        assert_eq!(filtered, vec![&inst_change]);
    }
}
