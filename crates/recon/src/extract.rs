use serde_json::Value;

use crate::model::{ExportRecord, UsernameSequence};

/// Nested list of value-records inside each entry.
pub const STRING_LIST_FIELD: &str = "string_list_data";
pub const VALUE_FIELD: &str = "value";

/// Flatten every entry's `string_list_data[*].value` into one ordered list.
///
/// Malformed entries are skipped rather than rejected: real exports carry the
/// odd broken entry and that should not sink an otherwise valid file.
pub fn extract_usernames(record: &ExportRecord) -> UsernameSequence {
    let mut usernames = Vec::with_capacity(record.entries.len());
    let mut skipped_entries = 0;

    for entry in &record.entries {
        let Some(values) = entry.get(STRING_LIST_FIELD).and_then(Value::as_array) else {
            skipped_entries += 1;
            continue;
        };

        for item in values {
            match item.get(VALUE_FIELD).and_then(Value::as_str) {
                Some(name) => usernames.push(name.to_string()),
                None => skipped_entries += 1,
            }
        }
    }

    if skipped_entries > 0 {
        log::debug!("{}: skipped {skipped_entries} malformed entries", record.file);
    }

    UsernameSequence {
        file: record.file.clone(),
        usernames,
        skipped_entries,
    }
}
