//! Error types for semdoc
//!
//! All fallible operations return `Result<T, Error>`.
//! A malformed document is the only hard failure of the engine; every other
//! irregularity (odd duration text, projection mismatches) is absorbed.

use std::fmt;

use thiserror::Error;

/// Which input of an operation a diagnostic refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputRole {
    /// The single input of `canonicalize` / `semantic_hash`
    Document,
    /// The document being pruned by `project_by_template`
    Source,
    /// The document supplying the key shape
    Template,
    /// Left-hand side of a comparison
    First,
    /// Right-hand side of a comparison
    Second,
}

impl fmt::Display for InputRole {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            InputRole::Document => "input",
            InputRole::Source => "source",
            InputRole::Template => "template",
            InputRole::First => "first",
            InputRole::Second => "second",
        };
        f.write_str(name)
    }
}

/// semdoc error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Input text is not a well-formed JSON or YAML document
    #[error("Parse error in {input} document: {message}")]
    ParseError {
        input: InputRole,
        message: String,
        /// The original text that failed to parse
        text: String,
    },

    /// The canonical emitter rejected a tree
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A default-rule table could not be loaded
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl Error {
    pub(crate) fn parse(input: InputRole, message: impl Into<String>, text: &str) -> Self {
        Error::ParseError {
            input,
            message: message.into(),
            text: text.to_string(),
        }
    }

    /// The input a `ParseError` refers to, if this is one
    pub fn input(&self) -> Option<InputRole> {
        match self {
            Error::ParseError { input, .. } => Some(*input),
            _ => None,
        }
    }
}

/// Result type alias for semdoc operations
pub type Result<T> = std::result::Result<T, Error>;
