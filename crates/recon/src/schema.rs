//! Per-file parse and top-level shape check.

use serde_json::Value;

use crate::error::ReconError;
use crate::model::{ClassifiedFile, ExportRecord, FileRole};

/// Field holding the entry list in `following.json`.
pub const FOLLOWING_FIELD: &str = "relationships_following";

/// Parse `file` and check the shape required by its role.
///
/// Only the top level is checked here: a `following.json` must be an object
/// with an array under [`FOLLOWING_FIELD`], a `followers_<N>.json` must be an
/// array. Entry contents are left to the username extractor.
pub fn validate(file: &ClassifiedFile) -> Result<ExportRecord, ReconError> {
    let value = parse_json(&file.name, &file.bytes)?;

    let entries = match file.role {
        FileRole::Following => match value {
            Value::Object(mut map) => match map.remove(FOLLOWING_FIELD) {
                Some(Value::Array(entries)) => entries,
                Some(other) => {
                    return Err(ReconError::schema(
                        &file.name,
                        format!("'{FOLLOWING_FIELD}' must be a list, found {}", kind_of(&other)),
                    ))
                }
                None => {
                    return Err(ReconError::schema(
                        &file.name,
                        format!("missing '{FOLLOWING_FIELD}'"),
                    ))
                }
            },
            other => {
                return Err(ReconError::schema(
                    &file.name,
                    format!("expected an object, found {}", kind_of(&other)),
                ))
            }
        },
        FileRole::Followers => match value {
            Value::Array(entries) => entries,
            other => {
                return Err(ReconError::schema(
                    &file.name,
                    format!("expected a list, found {}", kind_of(&other)),
                ))
            }
        },
        FileRole::Ignored => {
            return Err(ReconError::schema(&file.name, "file has no export role"));
        }
    };

    Ok(ExportRecord {
        file: file.name.clone(),
        role: file.role,
        entries,
    })
}

fn parse_json(name: &str, bytes: &[u8]) -> Result<Value, ReconError> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let text = std::str::from_utf8(bytes)
        .map_err(|e| ReconError::parse(name, format!("not UTF-8 text: {e}")))?;

    if text.trim().is_empty() {
        return Err(ReconError::parse(name, "file is empty"));
    }

    serde_json::from_str(text).map_err(|e| ReconError::parse(name, e.to_string()))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
