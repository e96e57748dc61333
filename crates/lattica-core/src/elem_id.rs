//! Hierarchical element identifiers
//!
//! An [`ElemId`] addresses an element - or a value nested inside one - by an
//! ordered tuple of namespace, type name, id kind, and name parts. The dotted
//! full-name string is the only persisted representation; parsing it back is
//! a strict inverse of rendering it.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{LatticaError, Result};

/// Separator between full-name segments
pub const NAMESPACE_SEPARATOR: &str = ".";

/// Reserved name for a namespace's settings/config type and instance
pub const CONFIG_NAME: &str = "_config";

/// Kind discriminator for an [`ElemId`]
///
/// `Type` ids carry no name parts. `Field` and `Instance` ids name a field or
/// data instance of a type, with further parts addressing nested values.
/// `Attr` ids address values nested inside a type's own annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElemIdKind {
    Type,
    Field,
    Instance,
    Attr,
}

impl ElemIdKind {
    /// Serialized token for this kind, as it appears in full names
    ///
    /// `Type` ids have no kind segment in their full name.
    pub fn token(self) -> Option<&'static str> {
        match self {
            ElemIdKind::Type => None,
            ElemIdKind::Field => Some("field"),
            ElemIdKind::Instance => Some("instance"),
            ElemIdKind::Attr => Some("attr"),
        }
    }

    fn from_token(token: &str) -> Option<ElemIdKind> {
        match token {
            "field" => Some(ElemIdKind::Field),
            "instance" => Some(ElemIdKind::Instance),
            "attr" => Some(ElemIdKind::Attr),
            _ => None,
        }
    }
}

impl fmt::Display for ElemIdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token().unwrap_or("type"))
    }
}

/// Immutable hierarchical address of an element or a nested value
///
/// Invariants:
/// - a namespace alone denotes the namespace's settings/config identifier
///   (the type name defaults to [`CONFIG_NAME`])
/// - `Type` kind with both namespace and type name set denotes a type
///   identifier and carries zero name parts
/// - `Instance` ids name a concrete data instance; parts beyond the first
///   address values nested inside it
/// - `Field` ids name a field of a type; parts beyond the first address
///   values nested inside the field's annotations
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElemId {
    namespace: String,
    type_name: String,
    id_kind: ElemIdKind,
    name_parts: Vec<String>,
}

impl ElemId {
    /// Create a type identifier
    ///
    /// An empty type name yields the namespace's config identifier.
    pub fn new(namespace: &str, type_name: &str) -> ElemId {
        ElemId {
            namespace: namespace.to_string(),
            type_name: if type_name.is_empty() {
                CONFIG_NAME.to_string()
            } else {
                type_name.to_string()
            },
            id_kind: ElemIdKind::Type,
            name_parts: Vec::new(),
        }
    }

    /// Create the settings/config identifier for a namespace
    pub fn config(namespace: &str) -> ElemId {
        ElemId::new(namespace, "")
    }

    /// Create an identifier from its raw tuple parts
    pub fn from_parts<S: Into<String>>(
        namespace: &str,
        type_name: &str,
        id_kind: ElemIdKind,
        name_parts: impl IntoIterator<Item = S>,
    ) -> ElemId {
        ElemId {
            name_parts: name_parts.into_iter().map(Into::into).collect(),
            id_kind,
            ..ElemId::new(namespace, type_name)
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn id_kind(&self) -> ElemIdKind {
        self.id_kind
    }

    pub fn name_parts(&self) -> &[String] {
        &self.name_parts
    }

    /// Most specific segment of the full name
    pub fn name(&self) -> &str {
        self.name_parts
            .last()
            .map(String::as_str)
            .unwrap_or(&self.type_name)
    }

    /// Whether this id addresses the namespace settings type or its instance
    pub fn is_config(&self) -> bool {
        self.type_name == CONFIG_NAME
    }

    /// Whether this id addresses a whole element rather than a nested value
    ///
    /// Type ids, config ids, and single-name instance ids are top level.
    /// Field ids are not: a field is addressed within its owning type.
    pub fn is_top_level(&self) -> bool {
        match self.id_kind {
            ElemIdKind::Type => true,
            ElemIdKind::Instance => self.name_parts.len() == 1,
            _ => false,
        }
    }

    /// Count of name segments beyond the nearest top-level identifier
    pub fn nesting_level(&self) -> usize {
        if self.is_top_level() {
            return 0;
        }
        match self.id_kind {
            // First part is the instance name, which is itself top level
            ElemIdKind::Instance => self.name_parts.len().saturating_sub(1),
            _ => self.name_parts.len(),
        }
    }

    fn full_name_parts(&self) -> Vec<&str> {
        let mut parts = vec![self.namespace.as_str(), self.type_name.as_str()];
        if let Some(token) = self.id_kind.token() {
            parts.push(token);
            parts.extend(self.name_parts.iter().map(String::as_str));
        }
        parts.retain(|part| !part.is_empty());
        parts
    }

    /// Canonical dotted textual form, stable across process restarts
    ///
    /// A trailing [`CONFIG_NAME`] segment is elided, so the config type of
    /// namespace `ns` renders as `ns` and its config instance as
    /// `ns._config.instance`.
    pub fn full_name(&self) -> String {
        let parts = self.full_name_parts();
        let visible = match parts.last() {
            Some(&last) if last == CONFIG_NAME => &parts[..parts.len() - 1],
            _ => &parts[..],
        };
        visible.join(NAMESPACE_SEPARATOR)
    }

    /// Parse an identifier from its canonical full name
    ///
    /// Strict inverse of [`ElemId::full_name`] for every identifier with a
    /// non-empty namespace.
    ///
    /// # Errors
    ///
    /// Returns `LatticaError::Parse` on empty input, empty segments, an
    /// unknown id-kind token, or a field/attr id with no name segment.
    pub fn from_full_name(full_name: &str) -> Result<ElemId> {
        let parse_error = |reason: &str| LatticaError::Parse {
            input: full_name.to_string(),
            reason: reason.to_string(),
        };

        if full_name.is_empty() {
            return Err(parse_error("empty id"));
        }
        let segments: Vec<&str> = full_name.split(NAMESPACE_SEPARATOR).collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(parse_error("empty segment"));
        }

        match segments.as_slice() {
            [namespace] => Ok(ElemId::config(namespace)),
            [namespace, type_name] => Ok(ElemId::new(namespace, type_name)),
            [namespace, type_name, kind_token, names @ ..] => {
                let id_kind = ElemIdKind::from_token(kind_token)
                    .ok_or_else(|| parse_error("unknown id kind"))?;
                if names.is_empty() {
                    // Only a config instance may omit its name
                    if id_kind == ElemIdKind::Instance {
                        return Ok(ElemId::from_parts(
                            namespace,
                            type_name,
                            id_kind,
                            [CONFIG_NAME],
                        ));
                    }
                    return Err(parse_error("missing name segment"));
                }
                Ok(ElemId::from_parts(
                    namespace,
                    type_name,
                    id_kind,
                    names.iter().copied(),
                ))
            }
            [] => Err(parse_error("empty id")),
        }
    }

    /// Create an id nested under this one
    ///
    /// From a type id the kind selects the sub-id branch (field, instance, or
    /// attr). From any other id the kind must repeat the id's own kind,
    /// appending nested value path segments within the same branch.
    ///
    /// # Errors
    ///
    /// Returns `LatticaError::InvalidNesting` when the kind is invalid for
    /// this id's level (e.g. nesting a `field` under an instance, or starting
    /// a second `instance` branch below a field), or when no name parts are
    /// given.
    pub fn create_nested_id(&self, kind: ElemIdKind, name_parts: &[&str]) -> Result<ElemId> {
        let nesting_error = || LatticaError::InvalidNesting {
            parent: self.full_name(),
            requested: kind.to_string(),
        };

        if name_parts.is_empty() {
            return Err(nesting_error());
        }
        match self.id_kind {
            ElemIdKind::Type => {
                if kind == ElemIdKind::Type {
                    return Err(nesting_error());
                }
                Ok(ElemId::from_parts(
                    &self.namespace,
                    &self.type_name,
                    kind,
                    name_parts.iter().copied(),
                ))
            }
            current => {
                if kind != current {
                    return Err(nesting_error());
                }
                let mut nested = self.clone();
                nested
                    .name_parts
                    .extend(name_parts.iter().map(|part| part.to_string()));
                Ok(nested)
            }
        }
    }

    /// Strip the most specific component of this id
    ///
    /// Nested values yield their container; top-level ids yield the
    /// namespace config id; a field yields its owning type.
    pub fn create_parent_id(&self) -> ElemId {
        if self.name_parts.len() > 1 {
            return ElemId::from_parts(
                &self.namespace,
                &self.type_name,
                self.id_kind,
                self.name_parts[..self.name_parts.len() - 1].to_vec(),
            );
        }
        if self.is_top_level() {
            return ElemId::config(&self.namespace);
        }
        ElemId::new(&self.namespace, &self.type_name)
    }

    /// Nearest enclosing top-level id plus the remaining path segments
    pub fn create_top_level_parent_id(&self) -> (ElemId, Vec<String>) {
        if self.is_top_level() {
            return (self.clone(), Vec::new());
        }
        match self.id_kind {
            ElemIdKind::Instance => (
                ElemId::from_parts(
                    &self.namespace,
                    &self.type_name,
                    ElemIdKind::Instance,
                    [self.name_parts[0].clone()],
                ),
                self.name_parts[1..].to_vec(),
            ),
            _ => (
                ElemId::new(&self.namespace, &self.type_name),
                self.name_parts.clone(),
            ),
        }
    }
}

impl fmt::Display for ElemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}

impl FromStr for ElemId {
    type Err = LatticaError;

    fn from_str(s: &str) -> Result<ElemId> {
        ElemId::from_full_name(s)
    }
}

impl Serialize for ElemId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.full_name())
    }
}

impl<'de> Deserialize<'de> for ElemId {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<ElemId, D::Error> {
        let full_name = String::deserialize(deserializer)?;
        ElemId::from_full_name(&full_name).map_err(de::Error::custom)
    }
}
