//! Filename-based role classification. Pure, infallible.

use crate::model::{ClassifiedFile, FileRole, UploadFile};

pub const FOLLOWING_FILE: &str = "following.json";
pub const FOLLOWERS_PREFIX: &str = "followers_";
pub const JSON_EXTENSION: &str = ".json";

/// Role of a file, derived from the last path component only.
///
/// `following.json` is matched exactly. `followers_<N>.json` requires `N` to
/// be a run of ASCII digits denoting a positive integer.
pub fn classify_name(name: &str) -> FileRole {
    let base = basename(name);

    if base == FOLLOWING_FILE {
        return FileRole::Following;
    }

    let index = base
        .strip_prefix(FOLLOWERS_PREFIX)
        .and_then(|rest| rest.strip_suffix(JSON_EXTENSION));

    match index {
        Some(digits) if is_positive_integer(digits) => FileRole::Followers,
        _ => FileRole::Ignored,
    }
}

/// Classify every file and drop the ignored ones, preserving upload order.
pub fn classify_files(files: Vec<UploadFile>) -> Vec<ClassifiedFile> {
    files
        .into_iter()
        .filter_map(|file| {
            let role = classify_name(&file.name);
            if role == FileRole::Ignored {
                log::debug!("ignoring {}", file.name);
                return None;
            }
            Some(ClassifiedFile {
                name: file.name,
                role,
                bytes: file.bytes,
            })
        })
        .collect()
}

/// Last component of a `/`- or `\`-separated path.
pub fn basename(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}

fn is_positive_integer(digits: &str) -> bool {
    !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && digits.bytes().any(|b| b != b'0')
}
