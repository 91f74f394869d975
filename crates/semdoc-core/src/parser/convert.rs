//! Lowering of serde values into the document tree

use crate::document::{Document, Mapping, Scalar};

/// JSON values always lower cleanly
pub fn from_json(value: serde_json::Value) -> Document {
    match value {
        serde_json::Value::Null => Document::null(),
        serde_json::Value::Bool(b) => Document::Scalar(Scalar::Bool(b)),
        serde_json::Value::Number(n) => Document::Scalar(json_number(&n)),
        serde_json::Value::String(s) => Document::Scalar(Scalar::String(s)),
        serde_json::Value::Array(items) => {
            Document::Sequence(items.into_iter().map(from_json).collect())
        }
        serde_json::Value::Object(map) => Document::Mapping(
            map.into_iter()
                .map(|(k, v)| (k, from_json(v)))
                .collect::<Mapping>(),
        ),
    }
}

fn json_number(n: &serde_json::Number) -> Scalar {
    if let Some(i) = n.as_i64() {
        Scalar::Int(i)
    } else if let Some(u) = n.as_u64() {
        Scalar::UInt(u)
    } else {
        Scalar::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

/// Lower a YAML value
///
/// Tags are dropped, scalar keys are stringified. Fails on sequence or
/// mapping keys, which have no textual key form.
pub fn from_yaml(value: serde_yaml_ng::Value) -> Result<Document, String> {
    use serde_yaml_ng::Value;

    Ok(match value {
        Value::Null => Document::null(),
        Value::Bool(b) => Document::Scalar(Scalar::Bool(b)),
        Value::Number(n) => Document::Scalar(yaml_number(&n)),
        Value::String(s) => Document::Scalar(Scalar::String(s)),
        Value::Sequence(items) => Document::Sequence(
            items
                .into_iter()
                .map(from_yaml)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Value::Mapping(map) => {
            let mut mapping = Mapping::new();
            for (k, v) in map {
                mapping.insert(yaml_key(k)?, from_yaml(v)?);
            }
            Document::Mapping(mapping)
        }
        Value::Tagged(tagged) => {
            let tagged = *tagged;
            from_yaml(tagged.value)?
        }
    })
}

fn yaml_number(n: &serde_yaml_ng::Number) -> Scalar {
    if let Some(i) = n.as_i64() {
        Scalar::Int(i)
    } else if let Some(u) = n.as_u64() {
        Scalar::UInt(u)
    } else {
        Scalar::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

fn yaml_key(key: serde_yaml_ng::Value) -> Result<String, String> {
    use serde_yaml_ng::Value;

    match key {
        Value::String(s) => Ok(s),
        Value::Null => Ok("null".to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Tagged(tagged) => {
            let tagged = *tagged;
            yaml_key(tagged.value)
        }
        Value::Sequence(_) | Value::Mapping(_) => {
            Err("mapping keys must be scalars, found a collection key".to_string())
        }
    }
}
