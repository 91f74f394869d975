//! Default value injection
//!
//! Some remote systems omit a field from their response when it holds its
//! default value. A [`DefaultRule`] restores such a field so that a document
//! which spells the default out compares equal to one that leaves it implicit.
//!
//! Rules are data. Adding a new implicit default is a new table entry, either
//! in [`RuleTable::builtin`] or in a rule file loaded with
//! [`RuleTable::from_text`]:
//!
//! ```yaml
//! - required_fields: [title, model]
//!   default_field: isPaused
//!   default_value: false
//! ```

use serde::Deserialize;

use crate::document::{Document, Mapping, Scalar};
use crate::error::Error;
use crate::Result;

/// When every field of `required_fields` is present in a mapping and
/// `default_field` is absent, insert `default_field: default_value`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DefaultRule {
    pub required_fields: Vec<String>,
    pub default_field: String,
    #[serde(deserialize_with = "deserialize_scalar")]
    pub default_value: Scalar,
}

impl DefaultRule {
    pub fn new(required_fields: &[&str], default_field: &str, default_value: Scalar) -> Self {
        Self {
            required_fields: required_fields.iter().map(|f| f.to_string()).collect(),
            default_field: default_field.to_string(),
            default_value,
        }
    }

    fn applies_to(&self, mapping: &Mapping) -> bool {
        !mapping.contains_key(&self.default_field)
            && self
                .required_fields
                .iter()
                .all(|field| mapping.contains_key(field))
    }
}

/// An ordered list of default rules
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(transparent)]
pub struct RuleTable {
    rules: Vec<DefaultRule>,
}

impl RuleTable {
    pub fn new(rules: Vec<DefaultRule>) -> Self {
        Self { rules }
    }

    /// A table with no rules; `apply_defaults` becomes a no-op
    pub fn empty() -> Self {
        Self::default()
    }

    /// The rules shipped with the engine
    ///
    /// Alert rules that carry a `title` and a `model` come back without
    /// `isPaused` when they are not paused.
    pub fn builtin() -> Self {
        Self::new(vec![DefaultRule::new(
            &["title", "model"],
            "isPaused",
            Scalar::Bool(false),
        )])
    }

    /// Load a rule table from YAML or JSON text (a list of rules)
    ///
    /// # Errors
    /// `ConfigError` when the text is not a list of well-formed rules.
    pub fn from_text(text: &str) -> Result<Self> {
        serde_yaml_ng::from_str::<RuleTable>(text)
            .map_err(|e| Error::ConfigError(format!("invalid default rule table: {}", e)))
    }

    pub fn rules(&self) -> &[DefaultRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Append rules from another table
    pub fn extend(&mut self, other: RuleTable) {
        self.rules.extend(other.rules);
    }
}

/// Insert implicit defaults at every mapping of the tree
///
/// Depth-first; every mapping, at any depth, is checked against every rule,
/// and recursion continues below mappings whether or not a rule fired.
pub fn apply_defaults(doc: &mut Document, rules: &RuleTable) {
    if rules.is_empty() {
        return;
    }
    match doc {
        Document::Scalar(_) => {}
        Document::Sequence(items) => {
            for item in items {
                apply_defaults(item, rules);
            }
        }
        Document::Mapping(mapping) => {
            for rule in &rules.rules {
                if rule.applies_to(mapping) {
                    tracing::trace!(field = %rule.default_field, "injected default value");
                    mapping.insert(
                        rule.default_field.clone(),
                        Document::Scalar(rule.default_value.clone()),
                    );
                }
            }
            for (_, value) in mapping.iter_mut() {
                apply_defaults(value, rules);
            }
        }
    }
}

fn deserialize_scalar<'de, D>(deserializer: D) -> std::result::Result<Scalar, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_yaml_ng::Value::deserialize(deserializer)?;
    match crate::parser::convert::from_yaml(value) {
        Ok(Document::Scalar(scalar)) => Ok(scalar),
        Ok(other) => Err(serde::de::Error::custom(format!(
            "default_value must be a scalar, found a {}",
            other.kind()
        ))),
        Err(msg) => Err(serde::de::Error::custom(msg)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InputRole;

    fn parse(text: &str) -> Document {
        crate::parser::parse(text, InputRole::Document).unwrap()
    }

    // ── Injection ──────────────────────────────────────

    #[test]
    fn test_injects_when_required_fields_present() {
        let mut doc = parse("title: cpu\nmodel: {expr: up}\n");
        apply_defaults(&mut doc, &RuleTable::builtin());
        assert_eq!(doc.get("isPaused"), Some(&Document::from(false)));
    }

    #[test]
    fn test_existing_value_is_kept() {
        let mut doc = parse("title: cpu\nmodel: {}\nisPaused: true\n");
        apply_defaults(&mut doc, &RuleTable::builtin());
        assert_eq!(doc.get("isPaused"), Some(&Document::from(true)));
    }

    #[test]
    fn test_partial_match_does_not_inject() {
        let mut doc = parse("title: cpu\n");
        apply_defaults(&mut doc, &RuleTable::builtin());
        assert_eq!(doc.get("isPaused"), None);
    }

    #[test]
    fn test_nested_mappings_checked_independently() {
        let mut doc = parse(
            "groups:\n  - name: g\n    rules:\n      - title: a\n        model: {}\n      - title: b\n",
        );
        apply_defaults(&mut doc, &RuleTable::builtin());
        let rules = doc.get("groups").unwrap().as_sequence().unwrap()[0]
            .get("rules")
            .unwrap()
            .as_sequence()
            .unwrap();
        assert_eq!(rules[0].get("isPaused"), Some(&Document::from(false)));
        assert_eq!(rules[1].get("isPaused"), None);
        assert_eq!(doc.get("isPaused"), None);
    }

    #[test]
    fn test_recursion_continues_below_fired_rule() {
        let mut doc = parse("title: outer\nmodel:\n  title: inner\n  model: {}\n");
        apply_defaults(&mut doc, &RuleTable::builtin());
        assert_eq!(doc.get("isPaused"), Some(&Document::from(false)));
        assert_eq!(
            doc.get("model").and_then(|m| m.get("isPaused")),
            Some(&Document::from(false))
        );
    }

    #[test]
    fn test_empty_table_is_noop() {
        let mut doc = parse("title: cpu\nmodel: {}\n");
        let before = doc.clone();
        apply_defaults(&mut doc, &RuleTable::empty());
        assert_eq!(doc, before);
        assert_eq!(doc.as_mapping().unwrap().len(), 2);
    }

    // ── Rule tables ────────────────────────────────────

    #[test]
    fn test_rule_table_from_yaml() {
        let table = RuleTable::from_text(
            "- required_fields: [kind]\n  default_field: replicas\n  default_value: 1\n",
        )
        .unwrap();
        assert_eq!(table.rules().len(), 1);
        assert_eq!(table.rules()[0].default_value, Scalar::Int(1));

        let mut doc = parse("kind: Deployment");
        apply_defaults(&mut doc, &table);
        assert_eq!(doc.get("replicas"), Some(&Document::from(1i64)));
    }

    #[test]
    fn test_rule_table_from_json() {
        let table = RuleTable::from_text(
            r#"[{"required_fields": ["a"], "default_field": "b", "default_value": "x"}]"#,
        )
        .unwrap();
        assert_eq!(table.rules()[0].default_value, Scalar::String("x".into()));
    }

    #[test]
    fn test_rule_table_rejects_collection_default() {
        let err = RuleTable::from_text(
            "- required_fields: [a]\n  default_field: b\n  default_value: [1, 2]\n",
        )
        .unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
        assert!(err.to_string().contains("scalar"));
    }

    #[test]
    fn test_rule_table_rejects_missing_field() {
        let err = RuleTable::from_text("- required_fields: [a]\n").unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn test_extend_appends_rules() {
        let mut table = RuleTable::builtin();
        table.extend(RuleTable::new(vec![DefaultRule::new(
            &["kind"],
            "replicas",
            Scalar::Int(1),
        )]));
        assert_eq!(table.rules().len(), 2);
    }
}
