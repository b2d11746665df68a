//! Schema-checked decoding of caller configuration into typed models.

use crate::diagnostics::{AttributePath, Diagnostics};
use crate::schema::EntitySchema;
use crate::value::{AttrValue, ObjectValue, Value};

/// A typed view over a configuration object.
pub trait FromObject: Sized {
    /// Builds the model. The object has already been validated against the
    /// schema; readers still report any type mismatch they run into.
    fn from_object(reader: &ObjectReader<'_>, diags: &mut Diagnostics) -> Self;
}

/// Checks `config` against `schema`, appending one diagnostic per problem.
///
/// Every attribute is checked before returning so the caller sees all
/// problems at once.
pub fn validate(schema: &EntitySchema, config: &ObjectValue, diags: &mut Diagnostics) {
    for name in config.keys() {
        if schema.attribute(name).is_none() {
            let expected = schema.names().collect::<Vec<_>>().join(", ");
            diags.add_attribute_error(
                AttributePath::root(name),
                "Unsupported Attribute",
                format!("An attribute named {name:?} is not expected here. Expected one of: {expected}."),
            );
        }
    }

    for attribute in schema.attributes() {
        let value = config.get(&attribute.name).unwrap_or(&AttrValue::Null);
        let path = AttributePath::root(&attribute.name);

        if !attribute.accepts_config() && !value.is_null() {
            diags.add_attribute_error(
                path,
                "Invalid Configuration for Read-Only Attribute",
                format!(
                    "Cannot set value for attribute {:?}: it is computed by the provider.",
                    attribute.name
                ),
            );
            continue;
        }

        if attribute.required() && value.is_null() {
            diags.add_attribute_error(
                path,
                "Missing Required Argument",
                format!("The argument {:?} is required, but no definition was found.", attribute.name),
            );
            continue;
        }

        if !attribute.kind.accepts(value) {
            diags.add_attribute_error(
                path,
                "Incorrect Attribute Value Type",
                format!(
                    "Attribute {:?} expects a {} value, got {}.",
                    attribute.name,
                    attribute.kind,
                    value.type_name()
                ),
            );
        }
    }
}

/// Validates `config` and decodes it into `T`.
///
/// Returns `None` if validation or decoding appended any error.
pub fn decode<T: FromObject>(
    schema: &EntitySchema,
    config: &ObjectValue,
    diags: &mut Diagnostics,
) -> Option<T> {
    let errors_before = diags.error_count();

    validate(schema, config, diags);
    if diags.error_count() > errors_before {
        return None;
    }

    let model = T::from_object(&ObjectReader::new(config), diags);
    if diags.error_count() > errors_before {
        return None;
    }
    Some(model)
}

/// Typed accessors over a configuration object. Missing attributes read as
/// null.
pub struct ObjectReader<'a> {
    object: &'a ObjectValue,
}

impl<'a> ObjectReader<'a> {
    pub fn new(object: &'a ObjectValue) -> Self {
        Self { object }
    }

    pub fn raw(&self, name: &str) -> &'a AttrValue {
        self.object.get(name).unwrap_or(&AttrValue::Null)
    }

    pub fn string(&self, name: &str, diags: &mut Diagnostics) -> Value<String> {
        self.read(name, "string", diags, |v| v.as_str().map(str::to_string))
    }

    pub fn int64(&self, name: &str, diags: &mut Diagnostics) -> Value<i64> {
        self.read(name, "int64", diags, AttrValue::as_i64)
    }

    pub fn bool(&self, name: &str, diags: &mut Diagnostics) -> Value<bool> {
        self.read(name, "bool", diags, AttrValue::as_bool)
    }

    fn read<T>(
        &self,
        name: &str,
        expected: &str,
        diags: &mut Diagnostics,
        extract: impl FnOnce(&AttrValue) -> Option<T>,
    ) -> Value<T> {
        let value = self.raw(name);
        match value {
            AttrValue::Null => Value::Null,
            AttrValue::Unknown => Value::Unknown,
            other => match extract(other) {
                Some(v) => Value::Known(v),
                None => {
                    diags.add_attribute_error(
                        AttributePath::root(name),
                        "Value Conversion Error",
                        format!("Expected a {expected} value for {name:?}, got {}.", other.type_name()),
                    );
                    Value::Null
                }
            },
        }
    }
}
