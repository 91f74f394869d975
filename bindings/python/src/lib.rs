//! Python bindings for semdoc
//!
//! Thin wrapper around `semdoc-core`. No logic lives here.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

fn to_py_err(e: semdoc_core::Error) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// Rewrite a JSON/YAML document to canonical YAML.
///
/// Keys are sorted and duration literals take their minimal spelling.
/// Empty input returns an empty string.
///
/// Raises:
///     ValueError: If the document cannot be parsed
#[pyfunction]
fn canonicalize(text: &str) -> PyResult<String> {
    semdoc_core::canonicalize(text).map_err(to_py_err)
}

/// Rewrite every duration literal in arbitrary text (`5m0s` becomes `5m`).
///
/// Never fails; text without durations is returned unchanged.
#[pyfunction]
fn normalize_durations(text: &str) -> String {
    semdoc_core::normalize_durations(text)
}

/// Keep only the fields of `source` that appear in `template`.
///
/// Args:
///     source: document to prune
///     template: document whose key shape selects the fields
///
/// Returns:
///     Canonical YAML of the projection. An empty template returns `source`
///     unchanged; an empty source returns an empty string.
///
/// Raises:
///     ValueError: If either document cannot be parsed
#[pyfunction]
fn project_by_template(source: &str, template: &str) -> PyResult<String> {
    semdoc_core::project_by_template(source, template).map_err(to_py_err)
}

/// Decide whether two documents mean the same thing.
///
/// Ignores key order, duration spelling and implicit defaults.
///
/// Raises:
///     ValueError: If either document cannot be parsed
#[pyfunction]
fn are_semantically_equal(first: &str, second: &str) -> PyResult<bool> {
    semdoc_core::are_semantically_equal(first, second).map_err(to_py_err)
}

/// List where two documents differ after normalization.
///
/// Returns:
///     JSON array of {"path", "kind", "first", "second"} objects, where
///     `path` is a JSON Pointer
#[pyfunction]
fn differences(first: &str, second: &str) -> PyResult<String> {
    let diffs = semdoc_core::Comparator::default()
        .differences(first, second)
        .map_err(to_py_err)?;
    serde_json::to_string_pretty(&diffs)
        .map_err(|e| PyValueError::new_err(format!("Serialization error: {}", e)))
}

/// SHA-256 hex digest of the canonical form.
///
/// Raises:
///     ValueError: If the document cannot be parsed
#[pyfunction]
fn semantic_hash(text: &str) -> PyResult<String> {
    semdoc_core::semantic_hash(text).map_err(to_py_err)
}

/// semdoc Python module: semantic comparison of JSON/YAML documents
#[pymodule]
fn semdoc(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(canonicalize, m)?)?;
    m.add_function(wrap_pyfunction!(normalize_durations, m)?)?;
    m.add_function(wrap_pyfunction!(project_by_template, m)?)?;
    m.add_function(wrap_pyfunction!(are_semantically_equal, m)?)?;
    m.add_function(wrap_pyfunction!(differences, m)?)?;
    m.add_function(wrap_pyfunction!(semantic_hash, m)?)?;
    Ok(())
}
