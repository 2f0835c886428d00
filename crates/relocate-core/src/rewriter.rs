//! Rewriting the image location in a chart's `values.yaml`
//!
//! The document is decoded into a [`serde_yaml::Value`] tree, the `global`
//! section is updated and the tree is encoded again. `serde_yaml::Mapping`
//! keeps insertion order, so existing keys stay where they were and any key
//! that has to be created is appended. Encoding the same tree twice yields
//! the same bytes.
//!
//! Comments and formatting of the original file do not survive the round trip;
//! values do, as read by a YAML 1.2 parser. Helm reads values as YAML 1.1, so
//! scalars whose meaning differs between the two can change in Helm's view:
//! `0644` is re-emitted as the string `'0644'` (1.1 octal 420), and `1.10`
//! as `1.1`.

use serde_yaml::{Mapping, Value};

use crate::error::{RelocateError, Result};
use crate::relocation::{GLOBAL_KEY, IMAGE_NAMESPACE_KEY, IMAGE_REGISTRY_KEY, Relocation};

/// Rewrite the raw content of a values file
///
/// `path` is only used for error reporting.
pub fn rewrite_values(path: &str, content: &[u8], relocation: &Relocation) -> Result<Vec<u8>> {
    let mut values = decode_values(path, content)?;

    relocate_values(&mut values, relocation).map_err(|found| RelocateError::GlobalNotMapping {
        path: path.to_string(),
        found,
    })?;

    let encoded = serde_yaml::to_string(&Value::Mapping(values)).map_err(|e| {
        RelocateError::Encode {
            path: path.to_string(),
            source: e,
        }
    })?;

    Ok(encoded.into_bytes())
}

/// Set `global.imageRegistry` and `global.imageNamespace`
///
/// Other keys of `global` are left alone. A missing or null `global` is
/// replaced by a mapping holding only the two keys. Returns the kind of the
/// offending value when `global` exists but is not a mapping.
pub fn relocate_values(
    values: &mut Mapping,
    relocation: &Relocation,
) -> std::result::Result<(), &'static str> {
    match values.get(GLOBAL_KEY) {
        Some(Value::Mapping(_)) => {}
        Some(Value::Null) | None => {
            values.insert(Value::from(GLOBAL_KEY), Value::Mapping(Mapping::new()));
        }
        Some(other) => return Err(kind_of(other)),
    }

    if let Some(Value::Mapping(global)) = values.get_mut(GLOBAL_KEY) {
        global.insert(
            Value::from(IMAGE_REGISTRY_KEY),
            Value::from(relocation.registry.as_str()),
        );
        global.insert(
            Value::from(IMAGE_NAMESPACE_KEY),
            Value::from(relocation.namespace.as_str()),
        );
    }

    Ok(())
}

fn decode_values(path: &str, content: &[u8]) -> Result<Mapping> {
    if content.iter().all(u8::is_ascii_whitespace) {
        return Ok(Mapping::new());
    }

    let value: Value = serde_yaml::from_slice(content).map_err(|e| RelocateError::Decode {
        path: path.to_string(),
        message: e.to_string(),
    })?;

    match value {
        Value::Mapping(values) => Ok(values),
        Value::Null => Ok(Mapping::new()),
        other => Err(RelocateError::Decode {
            path: path.to_string(),
            message: format!("expected a mapping at the document root, found {}", kind_of(&other)),
        }),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
