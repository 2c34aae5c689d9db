//! Resolution of interpolation markup in looked-up values.
//!
//! Mappings and sequences resolve element-wise. Strings are scanned by
//! [`parser`] and evaluated left to right:
//!
//! - `%{alias('k')}` must be the whole string and yields `k`'s resolved value
//!   with its type intact.
//! - `%{hiera('k')}` and `%{lookup('k')}` resolve another key.
//! - `%{scope('v')}` reads a context variable.
//! - `%{literal('text')}` yields `text` untouched.
//! - `%{v}` reads a context variable, or the empty string when it is unset.
//!
//! A call that is the entire string keeps the type of its result. Inside a
//! larger string every call must produce a string. Substituted text is never
//! scanned again.

pub(crate) mod parser;

use serde_json::{Map, Value};

use crate::context::{Context, is_falsy, scalar_text};
use crate::document::kind_name;
use crate::error::{HieraError, HieraResult};

use self::parser::{Function, Segment};

/// Access to the lookup that is resolving a value.
pub(crate) trait KeyLookup {
    /// Filtered context of the current lookup.
    fn context(&self) -> &Context;

    /// Look up and fully resolve another key.
    fn lookup_key(&mut self, key: &str) -> HieraResult<Value>;
}

/// Resolve every piece of markup inside `value`.
pub(crate) fn resolve<L: KeyLookup>(value: &Value, lookup: &mut L) -> HieraResult<Value> {
    match value {
        Value::Object(map) => {
            let mut resolved = Map::with_capacity(map.len());
            for (name, item) in map {
                resolved.insert(name.clone(), resolve(item, lookup)?);
            }
            Ok(Value::Object(resolved))
        }
        Value::Array(items) => items
            .iter()
            .map(|item| resolve(item, lookup))
            .collect::<HieraResult<Vec<_>>>()
            .map(Value::Array),
        Value::String(text) if parser::has_markup(text) => resolve_str(text, lookup),
        other => Ok(other.clone()),
    }
}

fn resolve_str<L: KeyLookup>(raw: &str, lookup: &mut L) -> HieraResult<Value> {
    let segments = parser::parse(raw);
    let aliases = segments
        .iter()
        .filter(|segment| {
            matches!(
                segment,
                Segment::Call {
                    function: Function::Alias,
                    ..
                }
            )
        })
        .count();
    match segments.as_slice() {
        [Segment::Call {
            function: Function::Alias,
            arg,
        }] => lookup_reference(Function::Alias, arg, lookup),
        _ if aliases > 0 => Err(HieraError::interpolation(
            raw,
            "alias can not be used for string interpolation",
        )),
        [Segment::Call { function, arg }] => call(raw, *function, arg, lookup),
        _ => concatenate(raw, &segments, lookup).map(Value::String),
    }
}

fn concatenate<L: KeyLookup>(
    raw: &str,
    segments: &[Segment<'_>],
    lookup: &mut L,
) -> HieraResult<String> {
    let mut out = String::with_capacity(raw.len());
    for segment in segments {
        match *segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Call { function, arg } => match call(raw, function, arg, lookup)? {
                Value::String(text) => out.push_str(&text),
                other => {
                    return Err(HieraError::interpolation(
                        raw,
                        format!(
                            "{function}('{arg}') resolved to a {} where a string is required",
                            kind_name(&other)
                        ),
                    ));
                }
            },
            Segment::Var(name) => match lookup.context().get(name) {
                None | Some(Value::Null) => {}
                Some(value) => {
                    let text = scalar_text(value).ok_or_else(|| {
                        HieraError::interpolation(
                            raw,
                            format!(
                                "variable '{name}' is a {} and cannot be interpolated",
                                kind_name(value)
                            ),
                        )
                    })?;
                    out.push_str(&text);
                }
            },
        }
    }
    Ok(out)
}

fn call<L: KeyLookup>(
    raw: &str,
    function: Function,
    arg: &str,
    lookup: &mut L,
) -> HieraResult<Value> {
    let value = match function {
        Function::Scope => lookup.context().get(arg).cloned().unwrap_or(Value::Null),
        Function::Hiera | Function::Lookup => lookup_reference(function, arg, lookup)?,
        Function::Literal => Value::String(arg.to_owned()),
        Function::Alias => {
            return Err(HieraError::interpolation(raw, "invalid alias function call"));
        }
    };
    if is_falsy(&value) {
        return Err(HieraError::interpolation(
            raw,
            format!("could not resolve a value for {function}('{arg}')"),
        ));
    }
    Ok(value)
}

fn lookup_reference<L: KeyLookup>(
    function: Function,
    key: &str,
    lookup: &mut L,
) -> HieraResult<Value> {
    lookup.lookup_key(key).map_err(|err| match err {
        HieraError::NotFound { key: missing } => HieraError::ReferenceNotFound {
            function: function.name().to_owned(),
            key: missing,
        },
        other => other,
    })
}

#[cfg(test)]
mod tests;
