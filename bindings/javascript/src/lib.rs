//! JavaScript/TypeScript bindings for semdoc
//!
//! Thin wrapper around `semdoc-core` compiled to WebAssembly.

use wasm_bindgen::prelude::*;

fn to_js_err(e: semdoc_core::Error) -> JsError {
    JsError::new(&e.to_string())
}

/// Rewrite a JSON/YAML document to canonical YAML.
///
/// @param text - JSON or YAML document
/// @returns Canonical YAML (sorted keys, minimal durations)
/// @throws Error if the document cannot be parsed
#[wasm_bindgen]
pub fn canonicalize(text: &str) -> Result<String, JsError> {
    semdoc_core::canonicalize(text).map_err(to_js_err)
}

/// Rewrite every duration literal in arbitrary text.
///
/// @param text - any text
/// @returns The text with `5m0s`-style literals in minimal spelling
#[wasm_bindgen(js_name = "normalizeDurations")]
pub fn normalize_durations(text: &str) -> String {
    semdoc_core::normalize_durations(text)
}

/// Keep only the fields of `source` present in `template`.
///
/// @param source - document to prune
/// @param template - document whose key shape selects the fields
/// @returns Canonical YAML of the projection
/// @throws Error if either document cannot be parsed
#[wasm_bindgen(js_name = "projectByTemplate")]
pub fn project_by_template(source: &str, template: &str) -> Result<String, JsError> {
    semdoc_core::project_by_template(source, template).map_err(to_js_err)
}

/// Decide whether two documents mean the same thing.
///
/// @returns true when only key order, duration spelling or defaults differ
/// @throws Error if either document cannot be parsed
#[wasm_bindgen(js_name = "areSemanticallyEqual")]
pub fn are_semantically_equal(first: &str, second: &str) -> Result<bool, JsError> {
    semdoc_core::are_semantically_equal(first, second).map_err(to_js_err)
}

/// List where two documents differ after normalization.
///
/// @returns JSON string: [{ path, kind, first?, second? }, ...]
/// @throws Error if either document cannot be parsed
#[wasm_bindgen]
pub fn differences(first: &str, second: &str) -> Result<String, JsError> {
    let diffs = semdoc_core::Comparator::default()
        .differences(first, second)
        .map_err(to_js_err)?;
    serde_json::to_string_pretty(&diffs)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// SHA-256 hex digest of the canonical form.
///
/// @throws Error if the document cannot be parsed
#[wasm_bindgen(js_name = "semanticHash")]
pub fn semantic_hash(text: &str) -> Result<String, JsError> {
    semdoc_core::semantic_hash(text).map_err(to_js_err)
}
