//! Key lookup and merge over loaded candidate documents.

use std::sync::Arc;

use camino::Utf8PathBuf;
use serde_json::Value;

use crate::context::Context;
use crate::document::Document;
use crate::error::{HieraError, HieraResult};
use crate::interpolate::{self, KeyLookup};
use crate::merge::{Accumulator, Merge};

/// A candidate file and its cached document.
#[derive(Debug, Clone)]
pub(crate) struct Loaded {
    pub(crate) path: Utf8PathBuf,
    pub(crate) document: Arc<Document>,
}

/// State of one top-level lookup.
///
/// `chain` holds the keys currently being resolved so that a key whose value
/// refers back to itself is reported instead of recursing forever. Only the
/// top-level key is merged; keys referenced from interpolation markup resolve
/// first-match.
pub(crate) struct Resolution<'a> {
    loaded: &'a [Loaded],
    context: &'a Context,
    merge: Option<Merge>,
    chain: Vec<String>,
}

impl<'a> Resolution<'a> {
    pub(crate) const fn new(loaded: &'a [Loaded], context: &'a Context, merge: Option<Merge>) -> Self {
        Self {
            loaded,
            context,
            merge,
            chain: Vec::new(),
        }
    }

    pub(crate) fn get_key(&mut self, key: &str) -> HieraResult<Value> {
        self.enter(key, self.merge)
    }

    fn enter(&mut self, key: &str, merge: Option<Merge>) -> HieraResult<Value> {
        if let Some(start) = self.chain.iter().position(|seen| seen == key) {
            let mut cycle: Vec<&str> = self.chain.iter().skip(start).map(String::as_str).collect();
            cycle.push(key);
            return Err(HieraError::ResolutionCycle {
                cycle: cycle.join(" -> "),
            });
        }
        self.chain.push(key.to_owned());
        let result = self.scan(key, merge);
        self.chain.pop();
        result
    }

    fn scan(&mut self, key: &str, merge: Option<Merge>) -> HieraResult<Value> {
        let loaded = self.loaded;
        let mut accumulator: Option<Accumulator> = None;
        for candidate in loaded {
            let Some(raw) = candidate.document.lookup(key) else {
                continue;
            };
            tracing::trace!(key, path = %candidate.path, "key found");
            let value = interpolate::resolve(raw, self)?;
            match merge {
                None => return Ok(value),
                Some(active) => accumulator
                    .get_or_insert_with(|| Accumulator::new(active))
                    .merge_value(key, value)?,
            }
        }
        accumulator.map(Accumulator::into_value).ok_or_else(|| {
            tracing::debug!(key, candidates = loaded.len(), "key not found");
            HieraError::not_found(key)
        })
    }
}

impl KeyLookup for Resolution<'_> {
    fn context(&self) -> &Context {
        self.context
    }

    fn lookup_key(&mut self, key: &str) -> HieraResult<Value> {
        self.enter(key, None)
    }
}
