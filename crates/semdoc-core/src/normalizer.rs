//! Canonical normalizer - converts a document to deterministic canonical form
//!
//! The canonical form is the single textual spelling used to detect true
//! duplicates irrespective of formatting.
//!
//! # Pipeline
//!
//! `text → parse → rewrite duration leaves → sort keys → serialize_canonical`
//!
//! # Guarantees
//!
//! - **Idempotent**: `canonicalize(canonicalize(x)) == canonicalize(x)`
//! - **Deterministic**: same input always produces same output
//! - **Order preserving for sequences**: only mapping keys are reordered

use sha2::{Digest, Sha256};

use crate::document::{Document, Scalar};
use crate::duration::normalize_duration_leaves;
use crate::error::{Error, InputRole};
use crate::parser::{self, Format};
use crate::Result;

// ── Public API ─────────────────────────────────────────────

/// Normalize document text to canonical YAML
///
/// Empty input yields empty output.
///
/// # Errors
/// Returns `ParseError` for malformed input.
pub fn canonicalize(text: &str) -> Result<String> {
    canonicalize_as(text, Format::Yaml)
}

/// Normalize document text to canonical form in the given format
pub fn canonicalize_as(text: &str, format: Format) -> Result<String> {
    if text.is_empty() {
        return Ok(String::new());
    }
    let mut doc = parser::parse(text, InputRole::Document)?;
    canonicalize_document(&mut doc);
    serialize_canonical(&doc, format)
}

/// Normalize a parsed tree in place: duration leaves, then key order
pub fn canonicalize_document(doc: &mut Document) {
    normalize_duration_leaves(doc);
    sort_keys(doc);
}

/// Sort every mapping's keys, at every depth, byte-wise ascending
///
/// Sequence element order is never touched.
pub fn sort_keys(doc: &mut Document) {
    match doc {
        Document::Scalar(_) => {}
        Document::Sequence(items) => {
            for item in items {
                sort_keys(item);
            }
        }
        Document::Mapping(mapping) => {
            mapping.sort_keys();
            for (_, value) in mapping.iter_mut() {
                sort_keys(value);
            }
        }
    }
}

// ── Canonical Serializer ───────────────────────────────────

/// Serialize a tree in its current key order
///
/// - YAML: block style, 2-space indentation
/// - JSON: pretty printed, 2-space indentation
/// - Exactly one trailing newline, no trailing blank lines
///
/// # Errors
/// `SerializationError` when JSON output is asked for a tree holding an
/// infinite or NaN float; JSON has no spelling for them.
pub fn serialize_canonical(doc: &Document, format: Format) -> Result<String> {
    match format {
        Format::Yaml => {
            serde_yaml_ng::to_string(doc).map_err(|e| Error::SerializationError(e.to_string()))
        }
        Format::Json => {
            if let Some(value) = non_finite_float(doc) {
                return Err(Error::SerializationError(format!(
                    "JSON cannot represent the float {}",
                    value
                )));
            }
            let mut out = serde_json::to_string_pretty(doc)
                .map_err(|e| Error::SerializationError(e.to_string()))?;
            out.push('\n');
            Ok(out)
        }
    }
}

fn non_finite_float(doc: &Document) -> Option<f64> {
    match doc {
        Document::Scalar(Scalar::Float(f)) if !f.is_finite() => Some(*f),
        Document::Scalar(_) => None,
        Document::Sequence(items) => items.iter().find_map(non_finite_float),
        Document::Mapping(mapping) => mapping.iter().find_map(|(_, v)| non_finite_float(v)),
    }
}

// ── SHA-256 Hash Computation ──────────────────────────────

/// Compute the SHA-256 semantic hash of a document
///
/// The hash is taken over the canonical YAML form, so documents that differ
/// only in key order or duration spelling hash identically.
pub fn semantic_hash(text: &str) -> Result<String> {
    let canonical = canonicalize(text)?;
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let result = hasher.finalize();
    Ok(format!("{:x}", result))
}
