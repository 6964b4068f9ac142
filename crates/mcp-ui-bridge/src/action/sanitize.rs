//! Parameter sanitization: strip anything that isn't a JSON primitive.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::Primitive;

/// Keep only the properties of `obj` whose value is a primitive
/// (`string | number | boolean | null`); drop the rest.
///
/// Sanitization is shallow by design: nested objects and arrays are
/// declared invalid parameter shapes entirely, so they disappear rather
/// than being recursively filtered. This function never panics regardless
/// of input shape.
#[must_use]
pub fn sanitize_params(obj: &Map<String, Value>) -> BTreeMap<String, Primitive> {
    obj.iter()
        .filter_map(|(key, value)| Primitive::from_value(value).map(|p| (key.clone(), p)))
        .collect()
}
