use thiserror::Error;

/// Fatal pipeline errors. The first one raised aborts the run; no partial
/// result is ever returned alongside an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconError {
    /// Container unreadable, or no recognized members in the upload.
    #[error("unrecognized upload: {0}")]
    Format(String),
    /// No `following.json` among the recognized files.
    #[error("We need your following.json file to compare.")]
    MissingFollowing,
    /// No `followers_<N>.json` among the recognized files.
    #[error("We need at least one followers_*.json file to compare.")]
    MissingFollowers,
    /// File text is empty, not UTF-8, or not valid JSON.
    #[error("{file}: file appears empty or unreadable ({detail})")]
    Parse { file: String, detail: String },
    /// File parsed but does not have the shape of an export file.
    #[error("{file}: does not look like a real export file ({detail})")]
    Schema { file: String, detail: String },
    /// A file or archive member exceeds a configured limit.
    #[error("{file}: exceeds limit of {limit}")]
    SizeLimit { file: String, limit: String },
    /// Options file parse error.
    #[error("config parse error: {0}")]
    ConfigParse(String),
    /// Options validation error (zero limits, etc.).
    #[error("config validation error: {0}")]
    ConfigValidation(String),
}

impl ReconError {
    /// Stable machine-readable kind, used in JSON error payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Format(_) => "format_error",
            Self::MissingFollowing => "missing_following_error",
            Self::MissingFollowers => "missing_followers_error",
            Self::Parse { .. } => "parse_error",
            Self::Schema { .. } => "schema_error",
            Self::SizeLimit { .. } => "size_limit_error",
            Self::ConfigParse(_) | Self::ConfigValidation(_) => "config_error",
        }
    }

    /// The offending file, when the error is tied to one.
    pub fn file(&self) -> Option<&str> {
        match self {
            Self::Parse { file, .. } | Self::Schema { file, .. } | Self::SizeLimit { file, .. } => {
                Some(file)
            }
            _ => None,
        }
    }

    pub(crate) fn parse(file: &str, detail: impl Into<String>) -> Self {
        Self::Parse { file: file.into(), detail: detail.into() }
    }

    pub(crate) fn schema(file: &str, detail: impl Into<String>) -> Self {
        Self::Schema { file: file.into(), detail: detail.into() }
    }

    /// Size limit on bytes, formatted as a human-readable size.
    pub fn too_large(file: &str, max_bytes: u64) -> Self {
        Self::SizeLimit { file: file.into(), limit: format_bytes(max_bytes) }
    }

    /// Size limit on extracted entry count.
    pub fn too_many_entries(file: &str, max_entries: usize) -> Self {
        Self::SizeLimit { file: file.into(), limit: format!("{max_entries} entries") }
    }
}

fn format_bytes(bytes: u64) -> String {
    const MIB: u64 = 1024 * 1024;
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{} MB", bytes / MIB)
    } else {
        format!("{bytes} bytes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_limit_message_names_file() {
        let err = ReconError::too_large("followers_1.json", 5 * 1024 * 1024);
        assert_eq!(err.to_string(), "followers_1.json: exceeds limit of 5 MB");
        assert_eq!(err.file(), Some("followers_1.json"));
        assert_eq!(err.kind(), "size_limit_error");
    }

    #[test]
    fn entry_limit_message() {
        let err = ReconError::too_many_entries("a/followers_9.json", 3);
        assert_eq!(err.to_string(), "a/followers_9.json: exceeds limit of 3 entries");
    }

    #[test]
    fn odd_byte_limits_are_exact() {
        assert_eq!(format_bytes(1500), "1500 bytes");
    }
}
