//! semdoc core - semantic normalization and comparison of JSON/YAML documents
//!
//! A remote system often echoes configuration back in a different spelling
//! than it was submitted in: other key order, other whitespace, `5m0s`
//! instead of `5m`, default fields filled in. This crate decides whether such
//! a difference is real drift or cosmetic noise.
//!
//! # Architecture
//!
//! ```text
//! text → Parser → Document → Duration leaves → Sort keys → Canonical text
//!                    │
//!                    ├──→ Default rules → Deep compare → bool
//!                    │
//!                    └──→ Template shape → Projection → Filtered text
//! ```
//!
//! # Guarantees
//!
//! - **Pure**: no I/O, no shared state; every call is independent and safe to
//!   run concurrently
//! - **Deterministic**: same input always produces identical output
//! - **Canonical**: `canonicalize(canonicalize(x)) == canonicalize(x)`
//! - **Forgiving**: only a malformed document is an error

pub mod comparator;
pub mod defaults;
pub mod document;
pub mod duration;
pub mod error;
pub mod normalizer;
pub mod parser;
pub mod projector;

pub use comparator::{are_semantically_equal, CompareOptions, Comparator, Difference, DifferenceKind};
pub use defaults::{apply_defaults, DefaultRule, RuleTable};
pub use document::{Document, Mapping, Scalar};
pub use duration::normalize_durations;
pub use error::{Error, InputRole, Result};
pub use normalizer::{canonicalize, canonicalize_as, semantic_hash};
pub use parser::{parse, Format};
pub use projector::{project_by_template, project_by_template_as, KeyShape};
