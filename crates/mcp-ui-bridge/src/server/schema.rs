//! An explicit JSON-Schema-shaped argument walker.
//!
//! Tools declare `properties` and `required` rather than an arbitrary JSON
//! Schema document; [`InputSchema::validate`] implements the five-step
//! algorithm that decides whether a tool call's `arguments` satisfy it.

use serde_json::Value;

use super::ServerError;

/// The subset of JSON Schema `type` values this crate's tools can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    /// `typeof value === "string"`.
    String,
    /// `typeof value === "number"`.
    Number,
    /// `typeof value === "boolean"`.
    Boolean,
    /// `Array.isArray(value)`.
    Array,
    /// `typeof value === "object"` (and not an array).
    Object,
}

impl SchemaKind {
    /// The `typeof`/`Array.isArray` label used in wrong-type error messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
        }
    }

    fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Array => value.is_array(),
            Self::Object => value.is_object(),
        }
    }
}

fn value_kind_label(value: &Value) -> &'static str {
    match value {
        Value::String(_) => "string",
        Value::Number(_) => "number",
        Value::Bool(_) => "boolean",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
        Value::Null => "null",
    }
}

/// A single declared property of a tool's input schema.
#[derive(Debug, Clone)]
pub struct PropertySchema {
    /// Property name, matching a key in the tool call's `arguments`.
    pub name: String,
    /// Declared type, if the schema constrains it. `None` accepts any
    /// value.
    pub kind: Option<SchemaKind>,
}

impl PropertySchema {
    /// Declare a property with no type constraint.
    #[must_use]
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: None,
        }
    }

    /// Declare a property constrained to `kind`.
    #[must_use]
    pub fn typed(name: impl Into<String>, kind: SchemaKind) -> Self {
        Self {
            name: name.into(),
            kind: Some(kind),
        }
    }
}

/// A tool's input schema: declared properties plus which ones are
/// required.
#[derive(Debug, Clone, Default)]
pub struct InputSchema {
    /// Declared properties.
    pub properties: Vec<PropertySchema>,
    /// Names from `properties` that must be present in `arguments`.
    pub required: Vec<String>,
}

impl InputSchema {
    /// An empty schema: no required arguments, no type constraints.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `arguments` against this schema.
    ///
    /// Implements the spec's five-step algorithm: missing required
    /// arguments are rejected first, then every declared-and-present
    /// argument is checked against its declared type.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::ArgumentValidation`] on the first missing
    /// required argument or type mismatch found.
    pub fn validate(&self, arguments: &Value) -> Result<(), ServerError> {
        let empty = serde_json::Map::new();
        let args = arguments.as_object().unwrap_or(&empty);

        for name in &self.required {
            if !args.contains_key(name) {
                return Err(ServerError::ArgumentValidation(format!(
                    "Missing required argument: {name}"
                )));
            }
        }

        for property in &self.properties {
            let Some(kind) = property.kind else { continue };
            let Some(value) = args.get(&property.name) else {
                continue;
            };
            if !kind.matches(value) {
                return Err(ServerError::ArgumentValidation(format!(
                    "Argument {} has wrong type. Expected {}, got {}",
                    property.name,
                    kind.label(),
                    value_kind_label(value)
                )));
            }
        }

        Ok(())
    }

    /// Render this schema as a JSON Schema document, the shape tool
    /// listings hand back to clients.
    #[must_use]
    pub fn to_json_schema(&self) -> Value {
        let mut properties = serde_json::Map::new();
        for property in &self.properties {
            let entry = property
                .kind
                .map_or_else(|| serde_json::json!({}), |kind| serde_json::json!({ "type": kind.label() }));
            properties.insert(property.name.clone(), entry);
        }
        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": self.required,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> InputSchema {
        InputSchema {
            properties: vec![
                PropertySchema::typed("name", SchemaKind::String),
                PropertySchema::typed("count", SchemaKind::Number),
                PropertySchema::untyped("notes"),
            ],
            required: vec!["name".to_string()],
        }
    }

    #[test]
    fn accepts_valid_arguments() {
        assert!(schema().validate(&json!({ "name": "a", "count": 3 })).is_ok());
    }

    #[test]
    fn rejects_missing_required_argument() {
        let err = schema().validate(&json!({ "count": 3 })).unwrap_err();
        assert_eq!(err.to_string(), "Missing required argument: name");
    }

    #[test]
    fn rejects_wrong_type_with_exact_message_shape() {
        let err = schema()
            .validate(&json!({ "name": "a", "count": "three" }))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Argument count has wrong type. Expected number, got string"
        );
    }

    #[test]
    fn untyped_properties_accept_anything() {
        assert!(schema()
            .validate(&json!({ "name": "a", "notes": { "any": "shape" } }))
            .is_ok());
    }

    #[test]
    fn missing_optional_typed_property_is_fine() {
        assert!(schema().validate(&json!({ "name": "a" })).is_ok());
    }
}
