//! Merge strategies for combining hits from several candidate documents.
//!
//! Without a strategy the first hit wins outright. With one, every hit is
//! resolved and fed into an [`Accumulator`] created on the first hit. The
//! accumulator's shape is fixed by the strategy for the lifetime of a lookup.

use std::fmt;

use serde_json::map::Entry;
use serde_json::{Map, Value};

use crate::document::kind_name;
use crate::error::{HieraError, HieraResult};

/// How hits for the same key are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum MergeStrategy {
    /// Concatenate sequences in scan order, keeping duplicates.
    Array,
    /// Union of elements in first-seen order.
    Set,
    /// Combine mappings; shallow merges keep the first value of each key.
    Hash,
    /// The last hit replaces everything before it.
    String,
}

impl MergeStrategy {
    /// Every strategy, in declaration order.
    pub const ALL: &'static [Self] = &[Self::Array, Self::Set, Self::Hash, Self::String];

    /// Name used on the command line and in error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Array => "array",
            Self::Set => "set",
            Self::Hash => "hash",
            Self::String => "string",
        }
    }

    /// Resolve a strategy from its name.
    ///
    /// # Examples
    ///
    /// ```
    /// use hierdata::MergeStrategy;
    /// assert_eq!(MergeStrategy::from_name("hash"), Some(MergeStrategy::Hash));
    /// assert_eq!(MergeStrategy::from_name("tuple"), None);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|strategy| strategy.name() == name)
    }
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A requested merge: strategy plus the deep flag for mappings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Merge {
    /// How hits are combined.
    pub strategy: MergeStrategy,
    /// Recurse into nested mappings when merging hashes.
    pub deep: bool,
}

impl Merge {
    /// A shallow merge with `strategy`.
    #[must_use]
    pub const fn new(strategy: MergeStrategy) -> Self {
        Self {
            strategy,
            deep: false,
        }
    }

    /// A deep merge with `strategy`.
    #[must_use]
    pub const fn deep(strategy: MergeStrategy) -> Self {
        Self {
            strategy,
            deep: true,
        }
    }
}

impl From<MergeStrategy> for Merge {
    fn from(strategy: MergeStrategy) -> Self {
        Self::new(strategy)
    }
}

/// Running result of a merged lookup for one key.
#[derive(Debug, Clone, PartialEq)]
pub struct Accumulator {
    merge: Merge,
    value: Value,
}

impl Accumulator {
    /// An empty accumulator shaped for `merge`.
    #[must_use]
    pub fn new(merge: Merge) -> Self {
        let value = match merge.strategy {
            MergeStrategy::Array | MergeStrategy::Set => Value::Array(Vec::new()),
            MergeStrategy::Hash => Value::Object(Map::new()),
            MergeStrategy::String => Value::String(String::new()),
        };
        Self { merge, value }
    }

    /// The merge this accumulator was created for.
    #[must_use]
    pub const fn merge(&self) -> Merge {
        self.merge
    }

    /// Current merged value.
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    /// Consume the accumulator, returning the merged value.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Feed one resolved hit for `key` into the accumulator.
    ///
    /// # Errors
    ///
    /// Returns [`HieraError::MergeType`] when a hash merge receives a hit that
    /// is not a mapping.
    pub fn merge_value(&mut self, key: &str, hit: Value) -> HieraResult<()> {
        match (self.merge.strategy, &mut self.value) {
            (MergeStrategy::Array, Value::Array(items)) => match hit {
                Value::Array(more) => items.extend(more),
                single => items.push(single),
            },
            (MergeStrategy::Set, Value::Array(items)) => {
                for item in elements(hit) {
                    if !items.contains(&item) {
                        items.push(item);
                    }
                }
            }
            (MergeStrategy::Hash, Value::Object(map)) => {
                let found = kind_name(&hit);
                let Value::Object(incoming) = hit else {
                    return Err(HieraError::MergeType {
                        key: key.to_owned(),
                        strategy: MergeStrategy::Hash.name(),
                        found,
                    });
                };
                if self.merge.deep {
                    deep_merge_maps(map, &incoming);
                } else {
                    for (name, value) in incoming {
                        map.entry(name).or_insert(value);
                    }
                }
            }
            (_, slot) => *slot = hit,
        }
        Ok(())
    }
}

fn elements(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        single => vec![single],
    }
}

/// Recursively merge `right` into a copy of `left`.
///
/// Nested mappings merge key-wise. When `left` holds a sequence, items of a
/// sequence in `right` that `left` does not already contain are appended, and
/// a scalar in `right` is appended as one item. Everything else in `right`
/// overwrites. A non-mapping `right` replaces `left` entirely.
///
/// # Examples
///
/// ```
/// use hierdata::merge::deep_merge;
/// use serde_json::json;
///
/// let merged = deep_merge(&json!({"a": {"x": 1}}), &json!({"a": {"y": 2}}));
/// assert_eq!(merged, json!({"a": {"x": 1, "y": 2}}));
///
/// let merged = deep_merge(&json!({"list": [1, 2]}), &json!({"list": [2, 3]}));
/// assert_eq!(merged, json!({"list": [1, 2, 3]}));
/// ```
#[must_use]
pub fn deep_merge(left: &Value, right: &Value) -> Value {
    match (left, right) {
        (Value::Object(base), Value::Object(incoming)) => {
            let mut merged = base.clone();
            deep_merge_maps(&mut merged, incoming);
            Value::Object(merged)
        }
        (_, other) => other.clone(),
    }
}

fn deep_merge_maps(target: &mut Map<String, Value>, incoming: &Map<String, Value>) {
    for (key, value) in incoming {
        match target.entry(key.clone()) {
            Entry::Vacant(vacant) => {
                vacant.insert(value.clone());
            }
            Entry::Occupied(mut occupied) => merge_entry(occupied.get_mut(), value),
        }
    }
}

fn merge_entry(existing: &mut Value, incoming: &Value) {
    match (existing, incoming) {
        (Value::Object(nested), Value::Object(more)) => deep_merge_maps(nested, more),
        (Value::Array(items), Value::Array(more)) => {
            let novel: Vec<Value> = more
                .iter()
                .filter(|item| !items.contains(item))
                .cloned()
                .collect();
            items.extend(novel);
        }
        (Value::Array(items), single) => items.push(single.clone()),
        (slot, other) => *slot = other.clone(),
    }
}
