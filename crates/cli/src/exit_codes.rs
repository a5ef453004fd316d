//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract. Scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range | Domain    | Description                                   |
//! |-------|-----------|-----------------------------------------------|
//! | 0     | Universal | Success                                       |
//! | 1     | Universal | General error (unspecified)                   |
//! | 2     | Universal | CLI usage error (bad args, missing input)     |
//! | 3-7   | upload    | Upload rejected by the reconciliation engine  |
//! | 8     | io        | File system errors                            |
//! | 9     | config    | Settings file unreadable or invalid           |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into `recon_exit_code` or the relevant command

use followcheck_io::LoadError;
use followcheck_recon::ReconError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, no input paths, archive mixed with files.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Upload (3-7)
// =============================================================================

/// Archive unreadable, or no following/followers files recognized.
pub const EXIT_FORMAT: u8 = 3;

/// following.json or every followers_<N>.json is missing.
pub const EXIT_MISSING_FILE: u8 = 4;

/// A recognized file is empty or not valid JSON.
pub const EXIT_PARSE: u8 = 5;

/// A recognized file parsed but has the wrong shape.
pub const EXIT_SCHEMA: u8 = 6;

/// A file or archive member exceeds the size or entry limit.
pub const EXIT_SIZE_LIMIT: u8 = 7;

// =============================================================================
// IO / Config (8-9)
// =============================================================================

/// Cannot read an input path or write an output file.
pub const EXIT_IO: u8 = 8;

/// Settings file unreadable or invalid.
pub const EXIT_CONFIG: u8 = 9;

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::Format(_) => EXIT_FORMAT,
        ReconError::MissingFollowing | ReconError::MissingFollowers => EXIT_MISSING_FILE,
        ReconError::Parse { .. } => EXIT_PARSE,
        ReconError::Schema { .. } => EXIT_SCHEMA,
        ReconError::SizeLimit { .. } => EXIT_SIZE_LIMIT,
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_CONFIG,
    }
}

/// Map a loading error to its exit code.
pub fn load_exit_code(err: &LoadError) -> u8 {
    match err {
        LoadError::NoInput | LoadError::MixedArchive(_) => EXIT_USAGE,
        LoadError::Io { .. } => EXIT_IO,
        LoadError::Recon(e) => recon_exit_code(e),
    }
}

/// Structured error output for `--json` mode.
#[derive(Debug, serde::Serialize)]
pub struct ErrorOutput {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub exit_code: u8,
}

impl ErrorOutput {
    pub fn from_load_error(err: &LoadError) -> Self {
        let (error, file) = match err {
            LoadError::NoInput | LoadError::MixedArchive(_) => ("usage_error", None),
            LoadError::Io { path, .. } => ("io_error", Some(path.clone())),
            LoadError::Recon(e) => (e.kind(), e.file().map(str::to_string)),
        };
        Self {
            error: error.to_string(),
            message: err.to_string(),
            file,
            exit_code: load_exit_code(err),
        }
    }

    /// Print to stderr as a single JSON line.
    pub fn print(&self) {
        if let Ok(output) = serde_json::to_string(self) {
            eprintln!("{}", output);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct_per_kind() {
        let errors = [
            ReconError::Format("x".into()),
            ReconError::MissingFollowing,
            ReconError::Parse { file: "f".into(), detail: "d".into() },
            ReconError::Schema { file: "f".into(), detail: "d".into() },
            ReconError::too_large("f", 1),
        ];
        let codes: Vec<u8> = errors.iter().map(recon_exit_code).collect();
        assert_eq!(codes, vec![3, 4, 5, 6, 7]);
        assert_eq!(recon_exit_code(&ReconError::MissingFollowers), EXIT_MISSING_FILE);
    }

    #[test]
    fn error_output_carries_file() {
        let err = LoadError::Recon(ReconError::Parse {
            file: "followers_1.json".into(),
            detail: "EOF".into(),
        });
        let out = ErrorOutput::from_load_error(&err);
        assert_eq!(out.error, "parse_error");
        assert_eq!(out.file.as_deref(), Some("followers_1.json"));
        assert_eq!(out.exit_code, EXIT_PARSE);
    }

    #[test]
    fn usage_errors() {
        assert_eq!(load_exit_code(&LoadError::NoInput), EXIT_USAGE);
    }
}
