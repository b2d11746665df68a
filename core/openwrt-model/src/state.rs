//! Persisted entity state.

use crate::diagnostics::{AttributePath, Diagnostics};
use crate::schema::EntitySchema;
use crate::value::{AttrValue, ObjectValue};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

const REDACTED: &str = "(sensitive value)";

/// Encodes a typed model back into a flat attribute map.
pub trait IntoObject {
    fn into_object(self) -> ObjectValue;
}

/// The attribute map written back to the host engine after a read.
///
/// Sensitive attributes keep their raw value so later reads can be compared,
/// but `Debug` and [`State::redacted`] mask them.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct State {
    values: BTreeMap<String, AttrValue>,
    sensitive: BTreeSet<String>,
}

impl State {
    /// Encodes `model` as the full state of `schema`.
    ///
    /// Attributes the model leaves out are stored as null. Attributes the
    /// schema does not declare, unknown values and type mismatches are
    /// errors; in that case no state is produced.
    pub fn encode<T: IntoObject>(
        schema: &EntitySchema,
        model: T,
        diags: &mut Diagnostics,
    ) -> Option<Self> {
        let errors_before = diags.error_count();
        let mut object = model.into_object();

        for name in object.keys() {
            if schema.attribute(name).is_none() {
                diags.add_attribute_error(
                    AttributePath::root(name),
                    "Value Conversion Error",
                    format!("State contains attribute {name:?} which the schema does not declare."),
                );
            }
        }

        let mut values = BTreeMap::new();
        for attribute in schema.attributes() {
            let value = object.remove(&attribute.name).unwrap_or(AttrValue::Null);
            let path = AttributePath::root(&attribute.name);
            if value.is_unknown() {
                diags.add_attribute_error(
                    path,
                    "Value Conversion Error",
                    format!("State value for {:?} is still unknown after read.", attribute.name),
                );
                continue;
            }
            if !attribute.kind.accepts(&value) {
                diags.add_attribute_error(
                    path,
                    "Value Conversion Error",
                    format!(
                        "State value for {:?} must be {}, got {}.",
                        attribute.name,
                        attribute.kind,
                        value.type_name()
                    ),
                );
                continue;
            }
            values.insert(attribute.name.clone(), value);
        }

        if diags.error_count() > errors_before {
            return None;
        }
        Some(Self {
            values,
            sensitive: schema.sensitive_attributes(),
        })
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.values.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(AttrValue::as_str)
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(AttrValue::as_i64)
    }

    pub fn is_sensitive(&self, name: &str) -> bool {
        self.sensitive.contains(name)
    }

    /// Raw values, sensitive ones included.
    pub fn values(&self) -> &BTreeMap<String, AttrValue> {
        &self.values
    }

    /// A copy safe to log or display.
    pub fn redacted(&self) -> BTreeMap<String, AttrValue> {
        self.values
            .iter()
            .map(|(name, value)| {
                let shown = if self.is_sensitive(name) && !value.is_null() {
                    AttrValue::from(REDACTED)
                } else {
                    value.clone()
                };
                (name.clone(), shown)
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.redacted()).finish()
    }
}

/// Stored form, used when the host hands prior state back.
#[derive(Deserialize)]
struct StoredState {
    values: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    sensitive: BTreeSet<String>,
}

impl<'de> Deserialize<'de> for State {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let stored = StoredState::deserialize(deserializer)?;
        Ok(Self {
            values: stored
                .values
                .into_iter()
                .map(|(k, v)| (k, AttrValue::from(v)))
                .collect(),
            sensitive: stored.sensitive,
        })
    }
}
