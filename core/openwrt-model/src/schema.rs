use crate::value::AttrValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Describes an entity type's attributes. Built once per entity type and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySchema {
    /// Markdown description used by documentation and language servers.
    pub description: String,
    /// Schema version, bumped whenever the persisted layout changes.
    pub version: i64,
    attributes: Vec<AttributeSchema>,
}

impl EntitySchema {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            version: 0,
            attributes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_version(mut self, version: i64) -> Self {
        self.version = version;
        self
    }

    /// Adds an attribute, replacing any earlier one with the same name.
    #[must_use]
    pub fn with_attribute(mut self, attribute: AttributeSchema) -> Self {
        match self.attributes.iter_mut().find(|a| a.name == attribute.name) {
            Some(existing) => *existing = attribute,
            None => self.attributes.push(attribute),
        }
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeSchema> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Attributes in registration order.
    pub fn attributes(&self) -> &[AttributeSchema] {
        &self.attributes
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|a| a.name.as_str())
    }

    pub fn is_sensitive(&self, name: &str) -> bool {
        self.attribute(name).is_some_and(|a| a.sensitive)
    }

    pub fn sensitive_attributes(&self) -> BTreeSet<String> {
        self.attributes
            .iter()
            .filter(|a| a.sensitive)
            .map(|a| a.name.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

/// A single attribute of an [`EntitySchema`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSchema {
    pub name: String,
    pub kind: AttrKind,
    pub mode: AttrMode,
    /// Sensitive values are stored but never shown in logs or diffs.
    pub sensitive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl AttributeSchema {
    pub fn new(name: impl Into<String>, kind: AttrKind, mode: AttrMode) -> Self {
        Self {
            name: name.into(),
            kind,
            mode,
            sensitive: false,
            description: None,
        }
    }

    /// Shorthand for a string the caller must supply.
    pub fn required_string(name: &str) -> Self {
        Self::new(name, AttrKind::String, AttrMode::Required)
    }

    /// Shorthand for a string the caller may supply.
    pub fn optional_string(name: &str) -> Self {
        Self::new(name, AttrKind::String, AttrMode::Optional)
    }

    /// Shorthand for a string filled in by the provider only.
    pub fn computed_string(name: &str) -> Self {
        Self::new(name, AttrKind::String, AttrMode::Computed)
    }

    pub fn optional_int64(name: &str) -> Self {
        Self::new(name, AttrKind::Int64, AttrMode::Optional)
    }

    pub fn computed_int64(name: &str) -> Self {
        Self::new(name, AttrKind::Int64, AttrMode::Computed)
    }

    pub fn optional_bool(name: &str) -> Self {
        Self::new(name, AttrKind::Bool, AttrMode::Optional)
    }

    #[must_use]
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn required(&self) -> bool {
        self.mode == AttrMode::Required
    }

    pub fn optional(&self) -> bool {
        matches!(self.mode, AttrMode::Optional | AttrMode::OptionalComputed)
    }

    pub fn computed(&self) -> bool {
        matches!(self.mode, AttrMode::Computed | AttrMode::OptionalComputed)
    }

    /// Whether the caller is allowed to supply a value at all.
    pub fn accepts_config(&self) -> bool {
        self.mode != AttrMode::Computed
    }
}

/// Who supplies an attribute's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttrMode {
    /// Must be supplied by the caller.
    Required,
    /// May be supplied by the caller; echoed back after a read.
    Optional,
    /// Set by the provider only.
    Computed,
    /// May be supplied; the provider fills it in otherwise.
    OptionalComputed,
}

/// The semantic type of an attribute. Map keys are always strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "element", rename_all = "snake_case")]
pub enum AttrKind {
    Bool,
    String,
    Int64,
    List(Box<AttrKind>),
    Map(Box<AttrKind>),
}

impl AttrKind {
    pub fn list(element: AttrKind) -> Self {
        Self::List(Box::new(element))
    }

    pub fn map(element: AttrKind) -> Self {
        Self::Map(Box::new(element))
    }

    /// Whether `value` conforms to this kind. Null and unknown conform to
    /// every kind, including inside collections.
    pub fn accepts(&self, value: &AttrValue) -> bool {
        match (self, value) {
            (_, AttrValue::Null | AttrValue::Unknown) => true,
            (Self::Bool, AttrValue::Bool(_)) => true,
            (Self::String, AttrValue::String(_)) => true,
            (Self::Int64, AttrValue::Int64(_)) => true,
            (Self::List(element), AttrValue::List(items)) => {
                items.iter().all(|item| element.accepts(item))
            }
            (Self::Map(element), AttrValue::Map(fields)) => {
                fields.values().all(|v| element.accepts(v))
            }
            _ => false,
        }
    }
}

impl fmt::Display for AttrKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::String => write!(f, "string"),
            Self::Int64 => write!(f, "int64"),
            Self::List(element) => write!(f, "list({element})"),
            Self::Map(element) => write!(f, "map({element})"),
        }
    }
}
