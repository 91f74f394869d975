//! Document tree - generic in-memory form of a parsed JSON/YAML document
//!
//! Every engine pass works on this tree rather than on untyped serde values,
//! so each recursion matches exhaustively on the three node kinds.
//!
//! Equality is semantic:
//! - Mappings compare independent of key order
//! - Sequences compare element-wise, in order
//! - Numbers compare by value across the integer/float split

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

// ── Scalar ─────────────────────────────────────────────────

/// A leaf value
#[derive(Debug, Clone)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    /// Only used for integers above `i64::MAX`
    UInt(u64),
    Float(f64),
    String(String),
}

impl Scalar {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    /// Short type name used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Scalar::Null => "null",
            Scalar::Bool(_) => "boolean",
            Scalar::Int(_) | Scalar::UInt(_) | Scalar::Float(_) => "number",
            Scalar::String(_) => "string",
        }
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::Null, Scalar::Null) => true,
            (Scalar::Bool(a), Scalar::Bool(b)) => a == b,
            (Scalar::String(a), Scalar::String(b)) => a == b,
            (Scalar::Int(a), Scalar::Int(b)) => a == b,
            (Scalar::UInt(a), Scalar::UInt(b)) => a == b,
            // UInt is reserved for values no i64 can hold
            (Scalar::Int(_), Scalar::UInt(_)) | (Scalar::UInt(_), Scalar::Int(_)) => false,
            (Scalar::Float(a), Scalar::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Scalar::Int(i), Scalar::Float(f)) | (Scalar::Float(f), Scalar::Int(i)) => {
                f.fract() == 0.0 && *i as f64 == *f && *f as i64 == *i
            }
            (Scalar::UInt(u), Scalar::Float(f)) | (Scalar::Float(f), Scalar::UInt(u)) => {
                f.fract() == 0.0 && *u as f64 == *f && *f as u64 == *u
            }
            _ => false,
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Scalar::Null => serializer.serialize_unit(),
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Int(n) => serializer.serialize_i64(*n),
            Scalar::UInt(n) => serializer.serialize_u64(*n),
            Scalar::Float(f) => serializer.serialize_f64(*f),
            Scalar::String(s) => serializer.serialize_str(s),
        }
    }
}

// ── Mapping ────────────────────────────────────────────────

/// Key/value pairs with unique keys, kept in insertion order
///
/// Order only matters for serialization; equality ignores it. Lookups are
/// hashed, so building and comparing a mapping is linear in its size.
#[derive(Debug, Clone, Default)]
pub struct Mapping {
    entries: IndexMap<String, Document>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Document> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert a field, replacing (in place) any previous value for `key`
    pub fn insert(&mut self, key: impl Into<String>, value: Document) -> Option<Document> {
        self.entries.insert(key.into(), value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Document)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Document)> {
        self.entries.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Sort this level's entries by key (byte-wise). Not recursive.
    pub fn sort_keys(&mut self) {
        self.entries.sort_keys();
    }
}

impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|w| v == w))
    }
}

impl FromIterator<(String, Document)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (String, Document)>>(iter: I) -> Self {
        Mapping {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Mapping {
    type Item = (String, Document);
    type IntoIter = indexmap::map::IntoIter<String, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for Mapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

// ── Document ───────────────────────────────────────────────

/// A parsed structured document
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Scalar(Scalar),
    /// Element order is significant
    Sequence(Vec<Document>),
    Mapping(Mapping),
}

impl Document {
    pub fn null() -> Self {
        Document::Scalar(Scalar::Null)
    }

    pub fn empty_mapping() -> Self {
        Document::Mapping(Mapping::new())
    }

    /// Node kind name used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Document::Scalar(_) => "scalar",
            Document::Sequence(_) => "sequence",
            Document::Mapping(_) => "mapping",
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Document::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Document]> {
        match self {
            Document::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Document::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Document::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// Look up a field when this node is a mapping
    pub fn get(&self, key: &str) -> Option<&Document> {
        self.as_mapping().and_then(|m| m.get(key))
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Document::Scalar(s) => s.serialize(serializer),
            Document::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Document::Mapping(m) => m.serialize(serializer),
        }
    }
}

impl From<Scalar> for Document {
    fn from(s: Scalar) -> Self {
        Document::Scalar(s)
    }
}

impl From<Mapping> for Document {
    fn from(m: Mapping) -> Self {
        Document::Mapping(m)
    }
}

impl From<Vec<Document>> for Document {
    fn from(items: Vec<Document>) -> Self {
        Document::Sequence(items)
    }
}

impl From<&str> for Document {
    fn from(s: &str) -> Self {
        Document::Scalar(Scalar::String(s.to_string()))
    }
}

impl From<bool> for Document {
    fn from(b: bool) -> Self {
        Document::Scalar(Scalar::Bool(b))
    }
}

impl From<i64> for Document {
    fn from(n: i64) -> Self {
        Document::Scalar(Scalar::Int(n))
    }
}

impl From<f64> for Document {
    fn from(f: f64) -> Self {
        Document::Scalar(Scalar::Float(f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(n: i64) -> Document {
        Document::from(n)
    }

    fn mapping(pairs: &[(&str, Document)]) -> Document {
        Document::Mapping(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }

    // ── Mapping ────────────────────────────────────────

    #[test]
    fn test_mapping_equality_ignores_order() {
        let a = mapping(&[("a", int(1)), ("b", int(2))]);
        let b = mapping(&[("b", int(2)), ("a", int(1))]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_mapping_insert_replaces_existing_key() {
        let mut m = Mapping::new();
        assert!(m.insert("a", int(1)).is_none());
        let previous = m.insert("a", int(2));
        assert_eq!(previous, Some(int(1)));
        assert_eq!(m.len(), 1);
        assert_eq!(m.get("a"), Some(&int(2)));
    }

    #[test]
    fn test_mapping_extra_key_is_unequal() {
        let a = mapping(&[("a", int(1))]);
        let b = mapping(&[("a", int(1)), ("b", int(2))]);
        assert_ne!(a, b);
        assert_ne!(b, a);
    }

    #[test]
    fn test_sort_keys_is_bytewise() {
        let mut m: Mapping = [("b", 1), ("B", 2), ("a", 3), ("_", 4)]
            .iter()
            .map(|(k, v)| (k.to_string(), Document::from(*v as i64)))
            .collect();
        m.sort_keys();
        let keys: Vec<_> = m.keys().collect();
        assert_eq!(keys, vec!["B", "_", "a", "b"]);
    }

    #[test]
    fn test_wide_mapping_build_and_compare() {
        let n = 50_000;
        let forward: Mapping = (0..n)
            .map(|i| (format!("key{}", i), int(i)))
            .collect();
        let backward: Mapping = (0..n)
            .rev()
            .map(|i| (format!("key{}", i), int(i)))
            .collect();
        assert_eq!(forward.len(), n as usize);
        assert_eq!(forward, backward);
        assert_eq!(backward.get("key49999"), Some(&int(49_999)));

        let mut changed = backward.clone();
        changed.insert("key0", int(-1));
        assert_eq!(changed.len(), n as usize);
        assert_ne!(forward, changed);
    }

    #[test]
    fn test_insert_existing_key_keeps_position() {
        let mut m = Mapping::new();
        m.insert("b", int(1));
        m.insert("a", int(2));
        m.insert("b", int(3));
        let keys: Vec<_> = m.keys().collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(m.get("b"), Some(&int(3)));
    }

    // ── Sequence ───────────────────────────────────────

    #[test]
    fn test_sequence_order_matters() {
        let a = Document::from(vec![int(1), int(2), int(3)]);
        let b = Document::from(vec![int(3), int(2), int(1)]);
        assert_ne!(a, b);
    }

    // ── Scalars ────────────────────────────────────────

    #[test]
    fn test_integer_equals_integral_float() {
        assert_eq!(Scalar::Int(1), Scalar::Float(1.0));
        assert_ne!(Scalar::Int(1), Scalar::Float(1.5));
    }

    #[test]
    fn test_nan_equals_itself() {
        assert_eq!(Scalar::Float(f64::NAN), Scalar::Float(f64::NAN));
    }

    #[test]
    fn test_cross_kind_scalars_unequal() {
        assert_ne!(Scalar::String("1".into()), Scalar::Int(1));
        assert_ne!(Scalar::Bool(false), Scalar::Null);
        assert_ne!(Scalar::String("true".into()), Scalar::Bool(true));
    }

    #[test]
    fn test_cross_kind_documents_unequal() {
        assert_ne!(Document::empty_mapping(), Document::Sequence(vec![]));
        assert_ne!(Document::Sequence(vec![]), Document::null());
    }

    // ── Serialization ──────────────────────────────────

    #[test]
    fn test_serialize_keeps_insertion_order() {
        let doc = mapping(&[("z", int(1)), ("a", true.into())]);
        let json = serde_json::to_string(&doc).unwrap();
        assert_eq!(json, r#"{"z":1,"a":true}"#);
    }
}
