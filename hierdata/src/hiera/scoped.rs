//! Context-bound views of an engine.

use std::ops::Deref;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{Hiera, LookupOptions};
use crate::context::Context;
use crate::error::HieraResult;

/// A [`Hiera`] with extra context bound to every lookup.
///
/// The bound context sits above the engine's defaults and below each call's
/// own context and overrides. The engine itself is never modified; anything
/// not defined here is reached through [`Deref`].
///
/// # Examples
///
/// ```
/// use hierdata::{Context, Hiera, LookupOptions};
/// use serde_json::json;
///
/// let dir = tempfile::tempdir()?;
/// std::fs::create_dir(dir.path().join("env"))?;
/// std::fs::write(dir.path().join("env/prod.yaml"), "tier: gold\n")?;
/// let hiera = Hiera::from_value(json!({
///     "backends": ["yaml"],
///     "hierarchy": ["env/%{environment}"],
///     "yaml": {"datadir": dir.path().to_str()},
/// }))?;
/// let prod = hiera.scoped(Context::new().with("environment", "prod"));
/// assert_eq!(prod.get("tier", &LookupOptions::new())?, Some(json!("gold")));
/// assert_eq!(hiera.get("tier", &LookupOptions::new())?, None);
/// assert_eq!(prod.hierarchy().len(), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct ScopedHiera<'a> {
    hiera: &'a Hiera,
    context: Context,
}

impl<'a> ScopedHiera<'a> {
    pub(crate) const fn new(hiera: &'a Hiera, context: Context) -> Self {
        Self { hiera, context }
    }

    /// The bound context.
    #[must_use]
    pub const fn bound_context(&self) -> &Context {
        &self.context
    }

    /// [`Hiera::lookup`] with the bound context.
    ///
    /// # Errors
    ///
    /// As [`Hiera::lookup`].
    pub fn lookup(&self, key: &str, options: &LookupOptions) -> HieraResult<Value> {
        self.hiera.lookup(key, &self.bind(options))
    }

    /// [`Hiera::get`] with the bound context.
    ///
    /// # Errors
    ///
    /// As [`Hiera::get`].
    pub fn get(&self, key: &str, options: &LookupOptions) -> HieraResult<Option<Value>> {
        self.hiera.get(key, &self.bind(options))
    }

    /// [`Hiera::has`] with the bound context.
    ///
    /// # Errors
    ///
    /// As [`Hiera::has`].
    pub fn has(&self, key: &str, options: &LookupOptions) -> HieraResult<bool> {
        self.hiera.has(key, &self.bind(options))
    }

    /// [`Hiera::extract`] with the bound context.
    ///
    /// # Errors
    ///
    /// As [`Hiera::extract`].
    pub fn extract<T: DeserializeOwned>(&self, key: &str, options: &LookupOptions) -> HieraResult<T> {
        self.hiera.extract(key, &self.bind(options))
    }

    fn bind(&self, options: &LookupOptions) -> LookupOptions {
        let mut bound = options.clone();
        bound.context = Context::layered([&self.context, &options.context]);
        bound
    }
}

impl Deref for ScopedHiera<'_> {
    type Target = Hiera;

    fn deref(&self) -> &Self::Target {
        self.hiera
    }
}
