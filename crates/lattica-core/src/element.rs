//! Element model - typed and data nodes of the configuration state graph
//!
//! Four variants share a common surface: primitive types, object types,
//! fields, and instances. All carry an identifier and annotations; types also
//! declare the types of their annotations. Relations between elements
//! (field -> owning type, instance -> type) are held as [`ElemId`] lookup
//! keys resolved through a registry, never as owning pointers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::elem_id::{ElemId, ElemIdKind};
use crate::errors::Result;
use crate::values::{walk_value, Value, WalkStep};

/// Annotation name -> value mapping carried by every element
pub type Annotations = BTreeMap<String, Value>;

/// Annotation name -> declared type mapping carried by type elements
pub type AnnotationTypes = BTreeMap<String, ElemId>;

/// Kind of a primitive type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrimitiveKind {
    String,
    Number,
    Boolean,
}

/// A primitive (scalar) type definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimitiveType {
    pub elem_id: ElemId,
    pub primitive: PrimitiveKind,
    pub annotation_types: AnnotationTypes,
    pub annotations: Annotations,
}

impl PrimitiveType {
    pub fn new(elem_id: ElemId, primitive: PrimitiveKind) -> PrimitiveType {
        PrimitiveType {
            elem_id,
            primitive,
            annotation_types: AnnotationTypes::new(),
            annotations: Annotations::new(),
        }
    }
}

/// A field of an object type
///
/// `parent_type` is a back-reference to the owning type, kept as a lookup
/// key only - resolving it goes through the registry that owns the type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub elem_id: ElemId,
    pub parent_type: ElemId,
    pub name: String,
    pub type_id: ElemId,
    pub annotations: Annotations,
}

impl Field {
    /// Create a field of `parent_type` named `name` with value type `type_id`
    ///
    /// # Errors
    ///
    /// Returns `InvalidNesting` if `parent_type` is not a type identifier.
    pub fn new(parent_type: &ElemId, name: &str, type_id: ElemId) -> Result<Field> {
        let elem_id = parent_type.create_nested_id(ElemIdKind::Field, &[name])?;
        Ok(Field {
            elem_id,
            parent_type: parent_type.clone(),
            name: name.to_string(),
            type_id,
            annotations: Annotations::new(),
        })
    }
}

/// An object type definition: named fields plus annotations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectType {
    pub elem_id: ElemId,
    pub fields: BTreeMap<String, Field>,
    pub annotation_types: AnnotationTypes,
    pub annotations: Annotations,
    /// Settings types have a single, unnamed config instance
    pub is_settings: bool,
}

impl ObjectType {
    pub fn new(elem_id: ElemId) -> ObjectType {
        ObjectType {
            elem_id,
            fields: BTreeMap::new(),
            annotation_types: AnnotationTypes::new(),
            annotations: Annotations::new(),
            is_settings: false,
        }
    }

    /// Add a field named `name` with value type `type_id`
    ///
    /// Replaces any existing field with the same name.
    ///
    /// # Errors
    ///
    /// Returns `InvalidNesting` if this type's id is not a type identifier.
    pub fn add_field(&mut self, name: &str, type_id: ElemId) -> Result<()> {
        let field = Field::new(&self.elem_id, name, type_id)?;
        self.fields.insert(name.to_string(), field);
        Ok(())
    }
}

/// A concrete data instance of a type, holding a nested value tree
///
/// The type is referenced by id; its lifetime is independent of the
/// instance's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceElement {
    pub elem_id: ElemId,
    pub type_id: ElemId,
    pub value: Value,
    pub annotations: Annotations,
}

impl InstanceElement {
    /// Create an instance of `type_id` named `name`
    ///
    /// # Errors
    ///
    /// Returns `InvalidNesting` if `type_id` is not a type identifier.
    pub fn new(name: &str, type_id: &ElemId, value: Value) -> Result<InstanceElement> {
        let elem_id = type_id.create_nested_id(ElemIdKind::Instance, &[name])?;
        Ok(InstanceElement::with_id(elem_id, type_id.clone(), value))
    }

    /// Create an instance with an explicit identifier
    pub fn with_id(elem_id: ElemId, type_id: ElemId, value: Value) -> InstanceElement {
        InstanceElement {
            elem_id,
            type_id,
            value,
            annotations: Annotations::new(),
        }
    }
}

/// Any node of the configuration state graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Element {
    Primitive(PrimitiveType),
    Object(ObjectType),
    Field(Field),
    Instance(InstanceElement),
}

impl Element {
    pub fn elem_id(&self) -> &ElemId {
        match self {
            Element::Primitive(prim) => &prim.elem_id,
            Element::Object(obj) => &obj.elem_id,
            Element::Field(field) => &field.elem_id,
            Element::Instance(inst) => &inst.elem_id,
        }
    }

    pub fn annotations(&self) -> &Annotations {
        match self {
            Element::Primitive(prim) => &prim.annotations,
            Element::Object(obj) => &obj.annotations,
            Element::Field(field) => &field.annotations,
            Element::Instance(inst) => &inst.annotations,
        }
    }

    pub fn annotations_mut(&mut self) -> &mut Annotations {
        match self {
            Element::Primitive(prim) => &mut prim.annotations,
            Element::Object(obj) => &mut obj.annotations,
            Element::Field(field) => &mut field.annotations,
            Element::Instance(inst) => &mut inst.annotations,
        }
    }

    /// Whether this element is a type definition (primitive or object)
    pub fn is_type(&self) -> bool {
        matches!(self, Element::Primitive(_) | Element::Object(_))
    }

    pub fn is_object_type(&self) -> bool {
        matches!(self, Element::Object(_))
    }

    pub fn is_primitive_type(&self) -> bool {
        matches!(self, Element::Primitive(_))
    }

    pub fn is_field(&self) -> bool {
        matches!(self, Element::Field(_))
    }

    pub fn is_instance(&self) -> bool {
        matches!(self, Element::Instance(_))
    }

    pub fn as_object_type(&self) -> Option<&ObjectType> {
        match self {
            Element::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_instance(&self) -> Option<&InstanceElement> {
        match self {
            Element::Instance(inst) => Some(inst),
            _ => None,
        }
    }

    /// Deep copy with an annotation-override map merged on top
    ///
    /// The copy shares no mutable substructure with the original. Overrides
    /// are merged key by key after the copy; an override key always wins.
    pub fn clone_with_annotations(&self, overrides: Annotations) -> Element {
        let mut cloned = self.clone();
        cloned.annotations_mut().extend(overrides);
        cloned
    }

    /// Walk every value reachable from this element
    ///
    /// Covers the element's annotations, each field's annotations for object
    /// types, and the full value tree for instances. The visitor's
    /// [`WalkStep`] controls descent per node.
    pub fn walk_values<F>(&self, visit: &mut F)
    where
        F: FnMut(&Value) -> WalkStep,
    {
        for annotation in self.annotations().values() {
            walk_value(annotation, visit);
        }
        match self {
            Element::Object(obj) => {
                for field in obj.fields.values() {
                    for annotation in field.annotations.values() {
                        walk_value(annotation, visit);
                    }
                }
            }
            Element::Instance(inst) => walk_value(&inst.value, visit),
            _ => {}
        }
    }
}

impl From<PrimitiveType> for Element {
    fn from(prim: PrimitiveType) -> Element {
        Element::Primitive(prim)
    }
}

impl From<ObjectType> for Element {
    fn from(obj: ObjectType) -> Element {
        Element::Object(obj)
    }
}

impl From<Field> for Element {
    fn from(field: Field) -> Element {
        Element::Field(field)
    }
}

impl From<InstanceElement> for Element {
    fn from(inst: InstanceElement) -> Element {
        Element::Instance(inst)
    }
}

/// All elements in `elements` whose id equals `id`
pub fn find_elements<'a>(
    elements: &'a [Element],
    id: &'a ElemId,
) -> impl Iterator<Item = &'a Element> {
    elements.iter().filter(move |element| element.elem_id() == id)
}

/// First element in `elements` whose id equals `id`
pub fn find_element<'a>(elements: &'a [Element], id: &ElemId) -> Option<&'a Element> {
    elements.iter().find(|element| element.elem_id() == id)
}

/// Object type with the given id, if present
pub fn find_object_type<'a>(elements: &'a [Element], id: &ElemId) -> Option<&'a ObjectType> {
    elements
        .iter()
        .find(|element| element.elem_id() == id)
        .and_then(Element::as_object_type)
}

/// All instances of the type identified by `type_id`
pub fn find_instances<'a>(
    elements: &'a [Element],
    type_id: &'a ElemId,
) -> impl Iterator<Item = &'a InstanceElement> {
    elements
        .iter()
        .filter_map(Element::as_instance)
        .filter(move |inst| &inst.type_id == type_id)
}
