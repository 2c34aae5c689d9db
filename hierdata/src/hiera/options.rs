//! Per-call lookup options.

use serde_json::Value;

use crate::context::Context;
use crate::merge::{Merge, MergeStrategy};

/// Options for a single lookup.
///
/// The lookup context is layered from the engine's defaults, then
/// [`with_context`](Self::with_context), then [`with_var`](Self::with_var)
/// overrides. Later layers win and falsy values are dropped.
///
/// # Examples
///
/// ```
/// use hierdata::{LookupOptions, MergeStrategy};
///
/// let options = LookupOptions::new()
///     .with_merge(MergeStrategy::Hash)
///     .with_deep(true)
///     .with_var("environment", "staging")
///     .with_default(serde_json::json!({}));
/// assert!(options.merge().is_some_and(|merge| merge.deep));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupOptions {
    pub(crate) default: Option<Value>,
    pub(crate) merge: Option<MergeStrategy>,
    pub(crate) deep: bool,
    pub(crate) throw: bool,
    pub(crate) context: Context,
    pub(crate) overrides: Context,
}

impl LookupOptions {
    /// First match wins, no default, missing keys are not errors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Value returned by `get` when the key is not found.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Combine every hit with `strategy` instead of taking the first.
    #[must_use]
    pub const fn with_merge(mut self, strategy: MergeStrategy) -> Self {
        self.merge = Some(strategy);
        self
    }

    /// Merge nested mappings recursively.
    #[must_use]
    pub const fn with_deep(mut self, deep: bool) -> Self {
        self.deep = deep;
        self
    }

    /// Make `get` fail with [`crate::HieraError::NotFound`] instead of
    /// returning the default.
    #[must_use]
    pub const fn with_throw(mut self, throw: bool) -> Self {
        self.throw = throw;
        self
    }

    /// Context for this call, layered over the engine's defaults.
    #[must_use]
    pub fn with_context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    /// Override one variable, above both the engine's defaults and
    /// [`with_context`](Self::with_context).
    #[must_use]
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.overrides.insert(name, value);
        self
    }

    /// The requested merge, if any.
    #[must_use]
    pub fn merge(&self) -> Option<Merge> {
        self.merge.map(|strategy| Merge {
            strategy,
            deep: self.deep,
        })
    }

    /// Value returned when the key is not found.
    #[must_use]
    pub const fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Whether not-found propagates as an error from `get`.
    #[must_use]
    pub const fn throws(&self) -> bool {
        self.throw
    }

    pub(crate) fn lookup_context(&self, defaults: &Context) -> Context {
        Context::layered([defaults, &self.context, &self.overrides]).filtered()
    }
}
