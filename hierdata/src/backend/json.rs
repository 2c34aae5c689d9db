//! JSON parsing.

use serde_json::Value;

use super::BackendError;

pub(super) fn parse(raw: &str) -> Result<Value, BackendError> {
    Ok(serde_json::from_str(raw)?)
}
