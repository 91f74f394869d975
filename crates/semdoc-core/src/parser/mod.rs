//! Document parser - JSON or YAML text into a [`Document`]
//!
//! Text that opens with `{` or `[` is tried as JSON first; everything else,
//! and JSON that fails (e.g. the YAML flow mapping `{interval: 5m0s}`), goes
//! through the YAML parser. JSON errors are only reported when the YAML
//! parser also rejects the text.

pub mod convert;

use std::fmt;
use std::str::FromStr;

use crate::document::Document;
use crate::error::{Error, InputRole};
use crate::Result;

/// Serialization format of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Yaml,
    Json,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Format::Yaml => f.write_str("yaml"),
            Format::Json => f.write_str("json"),
        }
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(Format::Yaml),
            "json" => Ok(Format::Json),
            other => Err(format!("unknown format '{}' (expected yaml or json)", other)),
        }
    }
}

/// Parse document text
///
/// `input` only labels diagnostics; it names which side of an operation
/// failed.
///
/// # Errors
/// Returns `ParseError` carrying the original text and the parser diagnostic.
pub fn parse(text: &str, input: InputRole) -> Result<Document> {
    if looks_like_json(text) {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(text) {
            return Ok(convert::from_json(value));
        }
    }

    let mut value: serde_yaml_ng::Value = serde_yaml_ng::from_str(text).map_err(|e| {
        tracing::debug!(%input, error = %e, "document failed to parse");
        Error::parse(input, e.to_string(), text)
    })?;
    value
        .apply_merge()
        .map_err(|e| Error::parse(input, e.to_string(), text))?;

    convert::from_yaml(value).map_err(|msg| Error::parse(input, msg, text))
}

fn looks_like_json(text: &str) -> bool {
    matches!(text.trim_start().as_bytes().first(), Some(b'{') | Some(b'['))
}
