//! Semantic comparator - decides whether two documents differ in meaning
//!
//! Used on plan-diff paths to suppress updates that would change nothing:
//! a false "different" causes an endless apply loop, a false "equal" hides
//! real drift.
//!
//! # Pipeline
//!
//! 1. Byte-identical texts are equal without parsing
//! 2. Both sides are parsed (a failure names the side)
//! 3. Duration leaves are rewritten to minimal spelling
//! 4. The default-rule table is applied
//! 5. Deep structural comparison: mappings ignore key order, sequences are
//!    order-sensitive, scalars compare by value, kinds never cross-match

use serde::Serialize;

use crate::defaults::{apply_defaults, RuleTable};
use crate::document::Document;
use crate::duration::normalize_duration_leaves;
use crate::error::InputRole;
use crate::parser;
use crate::Result;

/// Normalization passes applied before comparing
#[derive(Debug, Clone, PartialEq)]
pub struct CompareOptions {
    pub normalize_durations: bool,
    pub rules: RuleTable,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            normalize_durations: true,
            rules: RuleTable::builtin(),
        }
    }
}

/// How two nodes at the same path differ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DifferenceKind {
    /// Key only present in the second document
    Added,
    /// Key only present in the first document
    Removed,
    /// Scalars with different values
    Changed,
    /// Nodes of different kinds (mapping / sequence / scalar)
    TypeMismatch,
    /// Sequences of different lengths
    LengthMismatch,
}

/// One structural difference after normalization
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Difference {
    /// JSON Pointer to the node; the root is `""`
    pub path: String,
    pub kind: DifferenceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<Document>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second: Option<Document>,
}

/// Compares documents under a fixed set of normalization options
#[derive(Debug, Clone, Default)]
pub struct Comparator {
    options: CompareOptions,
}

impl Comparator {
    pub fn new(options: CompareOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompareOptions {
        &self.options
    }

    /// Whether `first` and `second` are semantically equal
    ///
    /// # Errors
    /// `ParseError` naming `first` or `second`. The comparison itself never
    /// fails.
    pub fn equal(&self, first: &str, second: &str) -> Result<bool> {
        if first == second {
            return Ok(true);
        }
        let a = self.normalize(first, InputRole::First)?;
        let b = self.normalize(second, InputRole::Second)?;
        let equal = a == b;
        tracing::debug!(equal, "semantic comparison");
        Ok(equal)
    }

    /// Every structural difference between the normalized documents
    ///
    /// Empty exactly when [`Comparator::equal`] is true.
    pub fn differences(&self, first: &str, second: &str) -> Result<Vec<Difference>> {
        if first == second {
            return Ok(Vec::new());
        }
        let a = self.normalize(first, InputRole::First)?;
        let b = self.normalize(second, InputRole::Second)?;
        let mut out = Vec::new();
        collect_differences(&a, &b, "", &mut out);
        tracing::debug!(count = out.len(), "semantic differences");
        Ok(out)
    }

    /// Parse and run the normalization passes on one side
    pub fn normalize(&self, text: &str, input: InputRole) -> Result<Document> {
        let mut doc = parser::parse(text, input)?;
        self.normalize_document(&mut doc);
        Ok(doc)
    }

    pub fn normalize_document(&self, doc: &mut Document) {
        if self.options.normalize_durations {
            normalize_duration_leaves(doc);
        }
        apply_defaults(doc, &self.options.rules);
    }
}

/// Semantic equality with the default options
pub fn are_semantically_equal(first: &str, second: &str) -> Result<bool> {
    Comparator::default().equal(first, second)
}

// ── Difference walk ────────────────────────────────────────

fn collect_differences(a: &Document, b: &Document, path: &str, out: &mut Vec<Difference>) {
    match (a, b) {
        (Document::Mapping(ma), Document::Mapping(mb)) => {
            for (key, va) in ma.iter() {
                let child = pointer_child(path, key);
                match mb.get(key) {
                    Some(vb) => collect_differences(va, vb, &child, out),
                    None => out.push(Difference {
                        path: child,
                        kind: DifferenceKind::Removed,
                        first: Some(va.clone()),
                        second: None,
                    }),
                }
            }
            for (key, vb) in mb.iter() {
                if !ma.contains_key(key) {
                    out.push(Difference {
                        path: pointer_child(path, key),
                        kind: DifferenceKind::Added,
                        first: None,
                        second: Some(vb.clone()),
                    });
                }
            }
        }
        (Document::Sequence(sa), Document::Sequence(sb)) => {
            if sa.len() != sb.len() {
                out.push(Difference {
                    path: path.to_string(),
                    kind: DifferenceKind::LengthMismatch,
                    first: Some(Document::from(sa.len() as i64)),
                    second: Some(Document::from(sb.len() as i64)),
                });
            }
            for (i, (ia, ib)) in sa.iter().zip(sb.iter()).enumerate() {
                collect_differences(ia, ib, &pointer_child(path, &i.to_string()), out);
            }
        }
        (Document::Scalar(xa), Document::Scalar(xb)) => {
            if xa != xb {
                out.push(Difference {
                    path: path.to_string(),
                    kind: DifferenceKind::Changed,
                    first: Some(a.clone()),
                    second: Some(b.clone()),
                });
            }
        }
        _ => out.push(Difference {
            path: path.to_string(),
            kind: DifferenceKind::TypeMismatch,
            first: Some(a.clone()),
            second: Some(b.clone()),
        }),
    }
}

/// RFC 6901 reference token escaping
fn pointer_child(base: &str, token: &str) -> String {
    format!("{}/{}", base, token.replace('~', "~0").replace('/', "~1"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    // ── Equality ───────────────────────────────────────

    #[test]
    fn test_key_order_invariance() {
        assert!(are_semantically_equal(r#"{"a":1,"b":2}"#, r#"{"b":2,"a":1}"#).unwrap());
    }

    #[test]
    fn test_array_order_sensitivity() {
        assert!(
            !are_semantically_equal(r#"{"items":[1,2,3]}"#, r#"{"items":[3,2,1]}"#).unwrap()
        );
    }

    #[test]
    fn test_duration_equivalence() {
        assert!(are_semantically_equal("{interval: 5m0s}", "{interval: 5m}").unwrap());
        assert!(!are_semantically_equal("{interval: 5m}", "{interval: 10m}").unwrap());
    }

    #[test]
    fn test_default_injection_equivalence() {
        let implicit = "title: cpu\nmodel: {expr: up}\n";
        let explicit = "title: cpu\nmodel: {expr: up}\nisPaused: false\n";
        assert!(are_semantically_equal(implicit, explicit).unwrap());

        let paused = "title: cpu\nmodel: {expr: up}\nisPaused: true\n";
        assert!(!are_semantically_equal(implicit, paused).unwrap());
    }

    #[test]
    fn test_json_and_yaml_spellings_equal() {
        assert!(are_semantically_equal(r#"{"a": [1, {"b": null}]}"#, "a:\n- 1\n- b: ~\n").unwrap());
    }

    #[test]
    fn test_kind_mismatch_unequal() {
        assert!(!are_semantically_equal("a: []", "a: {}").unwrap());
        assert!(!are_semantically_equal("a: [1]", "a: 1").unwrap());
        assert!(!are_semantically_equal("a: '1'", "a: 1").unwrap());
    }

    #[test]
    fn test_identical_text_skips_parsing() {
        // not a valid document, but byte-identical
        assert!(are_semantically_equal("{a: [", "{a: [").unwrap());
    }

    #[test]
    fn test_parse_error_names_side() {
        let err = are_semantically_equal("{a: [", "a: 1").unwrap_err();
        assert_eq!(err.input(), Some(InputRole::First));
        let err = are_semantically_equal("a: 1", "{a: [").unwrap_err();
        assert!(matches!(
            err,
            Error::ParseError {
                input: InputRole::Second,
                ..
            }
        ));
    }

    // ── Options ────────────────────────────────────────

    #[test]
    fn test_durations_can_be_disabled() {
        let comparator = Comparator::new(CompareOptions {
            normalize_durations: false,
            ..CompareOptions::default()
        });
        assert!(!comparator.equal("a: 5m0s", "a: 5m").unwrap());
    }

    #[test]
    fn test_defaults_can_be_disabled() {
        let comparator = Comparator::new(CompareOptions {
            rules: RuleTable::empty(),
            ..CompareOptions::default()
        });
        assert!(!comparator
            .equal("title: a\nmodel: {}", "title: a\nmodel: {}\nisPaused: false")
            .unwrap());
    }

    // ── Differences ────────────────────────────────────

    #[test]
    fn test_differences_empty_when_equal() {
        let diffs = Comparator::default()
            .differences("for: 5m0s\nb: 1", "b: 1\nfor: 5m")
            .unwrap();
        assert!(diffs.is_empty());
    }

    #[test]
    fn test_differences_report_paths_and_kinds() {
        let diffs = Comparator::default()
            .differences(
                "a: 1\nlist: [1, 2]\nobj: {x: 1}\ngone: true",
                "a: 2\nlist: [1]\nobj: [1]\nnew: true",
            )
            .unwrap();
        let summary: Vec<_> = diffs.iter().map(|d| (d.path.as_str(), d.kind)).collect();
        assert_eq!(
            summary,
            vec![
                ("/a", DifferenceKind::Changed),
                ("/list", DifferenceKind::LengthMismatch),
                ("/obj", DifferenceKind::TypeMismatch),
                ("/gone", DifferenceKind::Removed),
                ("/new", DifferenceKind::Added),
            ]
        );
    }

    #[test]
    fn test_difference_paths_are_escaped_pointers() {
        let diffs = Comparator::default()
            .differences("{\"a/b\": {\"c~d\": [0, 1]}}", "{\"a/b\": {\"c~d\": [0, 2]}}")
            .unwrap();
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].path, "/a~1b/c~0d/1");
    }

    #[test]
    fn test_root_difference_has_empty_path() {
        let diffs = Comparator::default().differences("1", "2").unwrap();
        assert_eq!(diffs[0].path, "");
        assert_eq!(diffs[0].kind, DifferenceKind::Changed);
    }

    #[test]
    fn test_difference_serializes_to_json() {
        let diffs = Comparator::default().differences("a: 1", "a: 2").unwrap();
        let json = serde_json::to_value(&diffs).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{"path": "/a", "kind": "changed", "first": 1, "second": 2}])
        );
    }

    // ── Determinism proof (100 iterations) ─────────────

    #[test]
    fn test_determinism_100_iterations() {
        let a = "title: x\nmodel: {}\nfor: 5m0s";
        let b = "for: 5m\nisPaused: false\nmodel: {}\ntitle: x";
        for i in 0..100 {
            assert!(
                are_semantically_equal(a, b).unwrap(),
                "Determinism failure at iteration {}",
                i
            );
        }
    }
}
