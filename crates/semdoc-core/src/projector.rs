//! Template projection - prune a document down to a template's shape
//!
//! Drift detection should only look at the fields a caller declared. The
//! caller's declaration acts as a template: a [`KeyShape`] is derived from it
//! and the remote document is walked alongside that shape, dropping every
//! key the template does not mention.
//!
//! Rules of the walk:
//! - Mapping: keep only keys present in the shape, recurse with their shapes
//! - Sequence: the template's first element is a stencil applied to every
//!   source element; an empty template sequence projects each element to `{}`
//! - Scalar shape: the source value is kept as is
//! - Mismatch (e.g. the shape wants a mapping, the source has a scalar):
//!   the subtree becomes `null`
//!
//! Projection never fails once both documents have parsed, and never
//! rewrites leaf values.

use crate::document::{Document, Mapping};
use crate::error::InputRole;
use crate::normalizer::{serialize_canonical, sort_keys};
use crate::parser::{self, Format};
use crate::Result;

/// Structural skeleton of a template document
#[derive(Debug, Clone, PartialEq)]
pub enum KeyShape {
    /// A leaf: keep whatever the source holds here
    IsScalar,
    /// A list; `None` when the template list was empty
    IsSequence(Option<Box<KeyShape>>),
    /// Expected keys and the shape beneath each
    IsMapping(Vec<(String, KeyShape)>),
}

impl KeyShape {
    /// Derive the shape of a template tree
    pub fn from_template(template: &Document) -> Self {
        match template {
            Document::Scalar(_) => KeyShape::IsScalar,
            Document::Sequence(items) => KeyShape::IsSequence(
                items
                    .first()
                    .map(|first| Box::new(KeyShape::from_template(first))),
            ),
            Document::Mapping(mapping) => KeyShape::IsMapping(
                mapping
                    .iter()
                    .map(|(k, v)| (k.to_string(), KeyShape::from_template(v)))
                    .collect(),
            ),
        }
    }

    fn field(&self, key: &str) -> Option<&KeyShape> {
        match self {
            KeyShape::IsMapping(fields) => fields.iter().find(|(k, _)| k == key).map(|(_, s)| s),
            _ => None,
        }
    }
}

/// Prune `source` to the shape of `template`, both given as text
///
/// - Empty `source` → empty output
/// - Empty `template` → `source` returned unchanged
///
/// Otherwise the projection is emitted in canonical key order (YAML).
///
/// # Errors
/// `ParseError` naming `source` or `template`.
pub fn project_by_template(source: &str, template: &str) -> Result<String> {
    project_by_template_as(source, template, Format::Yaml)
}

/// [`project_by_template`] with an explicit output format
pub fn project_by_template_as(source: &str, template: &str, format: Format) -> Result<String> {
    if source.is_empty() {
        return Ok(String::new());
    }
    if template.is_empty() {
        return Ok(source.to_string());
    }

    let source_doc = parser::parse(source, InputRole::Source)?;
    let template_doc = parser::parse(template, InputRole::Template)?;
    let shape = KeyShape::from_template(&template_doc);

    let mut projected = project(&source_doc, &shape);
    sort_keys(&mut projected);
    serialize_canonical(&projected, format)
}

/// Project a tree onto a shape
pub fn project(source: &Document, shape: &KeyShape) -> Document {
    match (shape, source) {
        (KeyShape::IsScalar, _) => source.clone(),
        (KeyShape::IsMapping(_), Document::Mapping(mapping)) => {
            Document::Mapping(project_mapping(mapping, shape))
        }
        (KeyShape::IsSequence(item_shape), Document::Sequence(items)) => Document::Sequence(
            items
                .iter()
                .map(|item| match item_shape {
                    Some(stencil) => project(item, stencil),
                    // no sample element: nothing inherits a shape
                    None => Document::empty_mapping(),
                })
                .collect(),
        ),
        (KeyShape::IsMapping(_), _) | (KeyShape::IsSequence(_), _) => {
            tracing::trace!(found = source.kind(), "projection type mismatch, dropping subtree");
            Document::null()
        }
    }
}

fn project_mapping(mapping: &Mapping, shape: &KeyShape) -> Mapping {
    mapping
        .iter()
        .filter_map(|(key, value)| match shape.field(key) {
            Some(field_shape) => Some((key.to_string(), project(value, field_shape))),
            None => {
                tracing::trace!(%key, "projection dropped key absent from template");
                None
            }
        })
        .collect()
}
