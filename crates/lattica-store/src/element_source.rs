//! Read access to the full known element set
//!
//! Indexes only scan the source on a full rebuild; the scan is lazy,
//! restartable, and may fail per item, so the iterator yields `Result`s.

use lattica_core::{ElemId, Element};

use crate::errors::Result;

/// Source of all known elements
pub trait ElementSource {
    /// Lazy sequence of every known element
    ///
    /// Each call starts a fresh scan; the sequence is finite.
    fn get_all(&self) -> Result<Box<dyn Iterator<Item = Result<Element>> + '_>>;

    /// Element at `id`, or `None` if unknown
    fn get(&self, id: &ElemId) -> Result<Option<Element>>;
}

/// Vec-backed element source for tests and small element sets
#[derive(Debug, Clone, Default)]
pub struct InMemoryElementSource {
    elements: Vec<Element>,
}

impl InMemoryElementSource {
    pub fn new(elements: Vec<Element>) -> InMemoryElementSource {
        InMemoryElementSource { elements }
    }

    pub fn insert(&mut self, element: Element) {
        self.elements.push(element);
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl ElementSource for InMemoryElementSource {
    fn get_all(&self) -> Result<Box<dyn Iterator<Item = Result<Element>> + '_>> {
        Ok(Box::new(self.elements.iter().cloned().map(Ok)))
    }

    fn get(&self, id: &ElemId) -> Result<Option<Element>> {
        Ok(self
            .elements
            .iter()
            .find(|element| element.elem_id() == id)
            .cloned())
    }
}
