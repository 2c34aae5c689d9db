//! Rendering of resolved values.

use serde_json::Value;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Render `value` for printing.
///
/// In raw format strings print without quotes, null prints as an empty
/// string and everything else is compact JSON.
///
/// # Errors
///
/// Returns [`CliError::Render`] if JSON serialisation fails.
///
/// # Examples
///
/// ```
/// use hierdata_cli::{cli::OutputFormat, output::render};
/// use serde_json::json;
///
/// assert_eq!(render(&json!("web01"), OutputFormat::Raw)?, "web01");
/// assert_eq!(render(&json!("web01"), OutputFormat::Json)?, "\"web01\"");
/// assert_eq!(render(&json!([1, 2]), OutputFormat::Raw)?, "[1,2]");
/// # Ok::<(), hierdata_cli::error::CliError>(())
/// ```
pub fn render(value: &Value, format: OutputFormat) -> Result<String, CliError> {
    match (format, value) {
        (OutputFormat::Json, _) => Ok(serde_json::to_string_pretty(value)?),
        (OutputFormat::Raw, Value::String(text)) => Ok(text.clone()),
        (OutputFormat::Raw, Value::Null) => Ok(String::new()),
        (OutputFormat::Raw, _) => Ok(serde_json::to_string(value)?),
    }
}
