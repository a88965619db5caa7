//! JSON text form of the structured value

use crate::error::{CodecError, Result};
use crate::value::Value;

/// Render a value as a JSON document.
///
/// Non-finite floats have no JSON spelling and are rejected rather than
/// silently written as `null`.
pub fn to_text(value: &Value, pretty: bool) -> Result<String> {
    check_finite(value)?;
    let text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    text.map_err(|e| CodecError::Encode(e.to_string()))
}

/// Parse a JSON document into a value
pub fn from_text(text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|e| {
        let offset = byte_offset(text, e.line(), e.column());
        CodecError::parse(offset, e.to_string())
    })
}

fn check_finite(value: &Value) -> Result<()> {
    match value {
        Value::Float(v) if !v.is_finite() => {
            Err(CodecError::Encode(format!("non-finite float {}", v)))
        }
        Value::Array(items) => items.iter().try_for_each(check_finite),
        Value::Object(obj) => obj.iter().try_for_each(|(_, v)| check_finite(v)),
        _ => Ok(()),
    }
}

/// Convert serde_json's 1-based line/column into a byte offset
fn byte_offset(text: &str, line: usize, column: usize) -> u64 {
    if line == 0 {
        return 0;
    }
    let line_start: usize = text
        .split_inclusive('\n')
        .take(line - 1)
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(text.len()) as u64
}
