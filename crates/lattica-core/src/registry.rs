//! Identity-preserving element registry
//!
//! The registry owns its elements in an arena and hands out copyable
//! [`ElementHandle`]s; "the same instance" means the same arena slot, so
//! repeated lookups of one id always resolve to the identical element.
//! Registration is single-writer by design - build or merge first, then
//! share read-only.

use std::collections::HashMap;

use crate::elem_id::ElemId;
use crate::element::{
    Element, InstanceElement, ObjectType, PrimitiveKind, PrimitiveType,
};
use crate::errors::{LatticaError, Result};
use crate::observe::{DiagnosticObserver, TracingObserver};
use crate::values::Value;

/// Stable handle to an element slot inside one registry
///
/// Handles are only meaningful against the registry that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementHandle(usize);

/// What to construct when [`ElementRegistry::get_element`] misses
#[derive(Debug, Clone, PartialEq)]
pub enum ElementHint {
    /// Primitive type of the given kind
    Primitive(PrimitiveKind),
    /// Instance of the type identified by the given id
    InstanceOf(ElemId),
}

/// How [`ElementRegistry::merge_with`] treats structurally-unequal collisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// Fail the merge with `MergeConflict`
    #[default]
    Fail,
    /// Keep this registry's element, report the conflict to the observer
    KeepOwn,
    /// Take the other registry's element, report the conflict to the observer
    KeepOther,
}

/// Deduplicating factory and store for elements
#[derive(Debug, Clone, Default)]
pub struct ElementRegistry {
    arena: Vec<Element>,
    by_name: HashMap<String, ElementHandle>,
}

impl ElementRegistry {
    /// Create a new empty registry
    pub fn new() -> ElementRegistry {
        ElementRegistry::default()
    }

    /// Create a registry pre-populated with the given elements
    ///
    /// # Errors
    ///
    /// Returns `DuplicateRegistration` if two elements share an id.
    pub fn with_elements(elements: impl IntoIterator<Item = Element>) -> Result<ElementRegistry> {
        let mut registry = ElementRegistry::new();
        for element in elements {
            registry.register_element(element)?;
        }
        Ok(registry)
    }

    /// Get the element at `id`, constructing and registering it on a miss
    ///
    /// A missing id builds an `ObjectType` by default, a `PrimitiveType`
    /// when a primitive hint is given, or an `InstanceElement` when an
    /// instance hint names the type. Repeated calls with the same id return
    /// the identical handle regardless of hint.
    pub fn get_element(&mut self, id: &ElemId, hint: Option<ElementHint>) -> ElementHandle {
        if let Some(handle) = self.lookup(id) {
            return handle;
        }
        let element = match hint {
            None => Element::Object(ObjectType::new(id.clone())),
            Some(ElementHint::Primitive(kind)) => {
                Element::Primitive(PrimitiveType::new(id.clone(), kind))
            }
            Some(ElementHint::InstanceOf(type_id)) => Element::Instance(
                InstanceElement::with_id(id.clone(), type_id, Value::empty_map()),
            ),
        };
        self.insert(element)
    }

    /// Register an element explicitly
    ///
    /// # Errors
    ///
    /// Returns `DuplicateRegistration` if the element's id is already
    /// present.
    pub fn register_element(&mut self, element: Element) -> Result<ElementHandle> {
        let full_name = element.elem_id().full_name();
        if self.by_name.contains_key(&full_name) {
            return Err(LatticaError::DuplicateRegistration { elem_id: full_name });
        }
        Ok(self.insert(element))
    }

    fn insert(&mut self, element: Element) -> ElementHandle {
        let handle = ElementHandle(self.arena.len());
        self.by_name
            .insert(element.elem_id().full_name(), handle);
        self.arena.push(element);
        handle
    }

    /// Handle of the element at `id`, if registered
    pub fn lookup(&self, id: &ElemId) -> Option<ElementHandle> {
        self.by_name.get(&id.full_name()).copied()
    }

    pub fn has_element(&self, id: &ElemId) -> bool {
        self.by_name.contains_key(&id.full_name())
    }

    /// Resolve a handle issued by this registry
    pub fn element(&self, handle: ElementHandle) -> &Element {
        &self.arena[handle.0]
    }

    pub fn element_mut(&mut self, handle: ElementHandle) -> &mut Element {
        &mut self.arena[handle.0]
    }

    /// All registered elements, in registration order
    pub fn all_elements(&self) -> impl Iterator<Item = &Element> {
        self.arena.iter()
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Merge two registries with the default fail-on-conflict policy
    ///
    /// # Errors
    ///
    /// Returns `MergeConflict` on the first id both sides define with
    /// structurally different elements.
    pub fn merge(&self, other: &ElementRegistry) -> Result<ElementRegistry> {
        self.merge_with(other, MergePolicy::Fail, &mut TracingObserver)
    }

    /// Merge two registries into a new one whose id set is the union
    ///
    /// Collisions that are structurally equal keep this registry's element.
    /// Structurally-unequal collisions follow the policy; the tolerant
    /// policies report each conflict to the observer.
    ///
    /// # Errors
    ///
    /// Returns `MergeConflict` under `MergePolicy::Fail`.
    pub fn merge_with(
        &self,
        other: &ElementRegistry,
        policy: MergePolicy,
        observer: &mut dyn DiagnosticObserver,
    ) -> Result<ElementRegistry> {
        let mut merged = self.clone();
        for element in other.all_elements() {
            let id = element.elem_id();
            match merged.lookup(id) {
                None => {
                    merged.insert(element.clone());
                }
                Some(handle) if merged.element(handle) == element => {}
                Some(handle) => match policy {
                    MergePolicy::Fail => {
                        return Err(LatticaError::MergeConflict {
                            elem_id: id.full_name(),
                        })
                    }
                    MergePolicy::KeepOwn => observer.merge_conflict(id),
                    MergePolicy::KeepOther => {
                        observer.merge_conflict(id);
                        merged.arena[handle.0] = element.clone();
                    }
                },
            }
        }
        Ok(merged)
    }
}
