//! Substitution variables for path templates and interpolation.
//!
//! A [`Context`] is assembled per lookup from the engine's defaults, the
//! caller's context and the caller's overrides, with later layers winning.
//! Before it is used, entries whose value is falsy are dropped so that
//! hierarchy levels referencing them simply do not apply.

use serde_json::{Map, Value};

/// Ordered mapping of variable name to value.
///
/// # Examples
///
/// ```
/// use hierdata::Context;
/// use serde_json::json;
///
/// let defaults = Context::new().with("environment", "production");
/// let call = Context::new().with("environment", "staging").with("role", "");
/// let merged = Context::layered([&defaults, &call]).filtered();
/// assert_eq!(merged.get("environment"), Some(&json!("staging")));
/// assert_eq!(merged.get("role"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    vars: Map<String, Value>,
}

impl Context {
    /// An empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a variable.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.vars.insert(name.into(), value.into());
    }

    /// Fetch a variable.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// Number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether no variables are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Iterate over variables in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.vars.iter()
    }

    /// Copy every variable of `other` over `self`.
    pub fn extend(&mut self, other: &Self) {
        for (name, value) in &other.vars {
            self.vars.insert(name.clone(), value.clone());
        }
    }

    /// Combine layers in order; later layers win.
    #[must_use]
    pub fn layered<'a, I>(layers: I) -> Self
    where
        I: IntoIterator<Item = &'a Self>,
    {
        layers.into_iter().fold(Self::new(), |mut acc, layer| {
            acc.extend(layer);
            acc
        })
    }

    /// Drop every falsy entry (see [`is_falsy`]).
    #[must_use]
    pub fn filtered(mut self) -> Self {
        self.vars.retain(|_, value| !is_falsy(value));
        self
    }
}

impl<K, V> FromIterator<(K, V)> for Context
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

impl From<Map<String, Value>> for Context {
    fn from(vars: Map<String, Value>) -> Self {
        Self { vars }
    }
}

/// Null, `false`, zero, the empty string and empty containers.
///
/// # Examples
///
/// ```
/// use hierdata::context::is_falsy;
/// use serde_json::json;
///
/// assert!(is_falsy(&json!(0)));
/// assert!(is_falsy(&json!("")));
/// assert!(!is_falsy(&json!("0")));
/// ```
#[must_use]
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n == 0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Text of a scalar for substitution into a string.
///
/// Strings are used verbatim; numbers and booleans use their JSON spelling.
/// Null and containers have no scalar text.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{Context, is_falsy, scalar_text};
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    #[case(json!(null), true)]
    #[case(json!(false), true)]
    #[case(json!(0), true)]
    #[case(json!(0.0), true)]
    #[case(json!(""), true)]
    #[case(json!([]), true)]
    #[case(json!({}), true)]
    #[case(json!(true), false)]
    #[case(json!(-1), false)]
    #[case(json!("false"), false)]
    #[case(json!([0]), false)]
    fn falsy_values(#[case] value: Value, #[case] expected: bool) {
        assert_eq!(is_falsy(&value), expected, "{value}");
    }

    #[test]
    fn later_layers_win() {
        let defaults = Context::new().with("a", 1).with("b", 1);
        let explicit = Context::new().with("b", 2).with("c", 2);
        let overrides = Context::new().with("c", 3);
        let merged = Context::layered([&defaults, &explicit, &overrides]);
        assert_eq!(merged.get("a"), Some(&json!(1)));
        assert_eq!(merged.get("b"), Some(&json!(2)));
        assert_eq!(merged.get("c"), Some(&json!(3)));
    }

    #[test]
    fn override_with_falsy_value_removes_default() {
        let defaults = Context::new().with("environment", "production");
        let overrides = Context::new().with("environment", Value::Null);
        let merged = Context::layered([&defaults, &overrides]).filtered();
        assert!(merged.is_empty());
    }

    #[test]
    fn layering_does_not_touch_inputs() {
        let defaults = Context::new().with("a", 1);
        let call = Context::new().with("a", 2);
        let _merged = Context::layered([&defaults, &call]);
        assert_eq!(defaults.get("a"), Some(&json!(1)));
    }

    #[rstest]
    #[case(json!("web"), Some("web"))]
    #[case(json!(8080), Some("8080"))]
    #[case(json!(true), Some("true"))]
    #[case(json!(null), None)]
    #[case(json!(["a"]), None)]
    fn scalar_text_of_values(#[case] value: Value, #[case] expected: Option<&str>) {
        assert_eq!(scalar_text(&value).as_deref(), expected);
    }
}
