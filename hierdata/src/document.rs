//! Ordered documents and dotted-path lookup.
//!
//! Every data file is parsed into a [`Document`]: a `serde_json::Value` built
//! with `preserve_order`, so mappings keep the key order of the source file.
//! Keys are addressed with dot-separated paths where numeric segments index
//! into sequences:
//!
//! - `database.host`
//! - `servers.0.name`
//! - `matrix.1.2`
//!
//! A segment that is absent, or applied to a value of the wrong shape, makes
//! the whole lookup miss. Lookups never panic.

use serde_json::Value;

/// A parsed data file.
///
/// # Examples
///
/// ```
/// use hierdata::Document;
/// use serde_json::json;
///
/// let doc = Document::from(json!({"servers": [{"name": "a"}, {"name": "b"}]}));
/// assert_eq!(doc.lookup("servers.1.name"), Some(&json!("b")));
/// assert_eq!(doc.lookup("servers.2.name"), None);
/// assert_eq!(doc.lookup("servers.name"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    root: Value,
}

impl Document {
    /// Wrap a parsed value.
    #[must_use]
    pub const fn new(root: Value) -> Self {
        Self { root }
    }

    /// The whole parsed value.
    #[must_use]
    pub const fn root(&self) -> &Value {
        &self.root
    }

    /// Look up a dotted key.
    ///
    /// Explicit `null` values count as absent so that a lower-priority
    /// document can still supply the key.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<&Value> {
        lookup_path(&self.root, key).filter(|value| !value.is_null())
    }
}

impl From<Value> for Document {
    fn from(root: Value) -> Self {
        Self::new(root)
    }
}

/// Walk `key` through `value`, one dot-separated segment at a time.
///
/// Mappings are indexed by the segment text, sequences by the segment parsed
/// as an unsigned integer. Any other combination misses.
///
/// # Examples
///
/// ```
/// use hierdata::document::lookup_path;
/// use serde_json::json;
///
/// let value = json!({"a": {"2": "mapping key"}, "b": [10, 20, 30]});
/// assert_eq!(lookup_path(&value, "a.2"), Some(&json!("mapping key")));
/// assert_eq!(lookup_path(&value, "b.2"), Some(&json!(30)));
/// assert_eq!(lookup_path(&value, "b.x"), None);
/// ```
#[must_use]
pub fn lookup_path<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment
            .parse::<usize>()
            .ok()
            .and_then(|index| items.get(index)),
        _ => None,
    })
}

/// Short name of a value's shape, used in error messages.
pub(crate) const fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::{Document, lookup_path};
    use rstest::rstest;
    use serde_json::{Value, json};

    fn sample() -> Value {
        json!({
            "db": {"host": "localhost", "ports": [5432, 5433]},
            "users": [{"name": "ada"}, {"name": "grace"}],
            "empty": null,
            "flag": false,
        })
    }

    #[rstest]
    #[case("db.host", Some(json!("localhost")))]
    #[case("db.ports.1", Some(json!(5433)))]
    #[case("users.0.name", Some(json!("ada")))]
    #[case("flag", Some(json!(false)))]
    #[case("db.missing", None)]
    #[case("db.ports.9", None)]
    #[case("db.ports.-1", None)]
    #[case("db.host.inner", None)]
    #[case("users.name", None)]
    fn dotted_lookup(#[case] key: &str, #[case] expected: Option<Value>) {
        let value = sample();
        assert_eq!(lookup_path(&value, key).cloned(), expected);
    }

    #[test]
    fn null_values_are_treated_as_absent() {
        let doc = Document::from(sample());
        assert_eq!(lookup_path(doc.root(), "empty"), Some(&Value::Null));
        assert_eq!(doc.lookup("empty"), None);
    }

    #[test]
    fn empty_document_misses_everything() {
        let doc = Document::default();
        assert_eq!(doc.lookup("anything"), None);
    }

    #[test]
    fn mapping_order_is_preserved() {
        let doc = Document::from(json!({"zeta": 1, "alpha": 2, "mid": 3}));
        let keys: Vec<_> = doc
            .root()
            .as_object()
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }
}
