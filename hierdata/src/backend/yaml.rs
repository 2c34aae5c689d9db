//! YAML parsing backed by `serde-saphyr`.

use serde_json::Value;
use serde_saphyr::Options;

use super::BackendError;

/// A file holding only comments, document markers or whitespace is empty.
fn is_blank(raw: &str) -> bool {
    raw.lines().map(str::trim).all(|line| {
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    })
}

/// Parse YAML into an ordered value using strict boolean semantics, so `yes`
/// and `on` stay strings.
///
/// Keys pulled in through a merge key (`<<: *anchor`) follow the mapping's
/// explicit keys. Values are unaffected but hash merges and rendered output
/// see that order.
pub(super) fn parse(raw: &str) -> Result<Value, BackendError> {
    if is_blank(raw) {
        return Ok(Value::Null);
    }
    let value = serde_saphyr::from_str_with_options(
        raw,
        Options {
            strict_booleans: true,
            ..Options::default()
        },
    )?;
    Ok(value)
}
