use serde::{Deserialize, Serialize};

use crate::error::ReconError;

/// 5 MB per file.
pub const DEFAULT_MAX_FILE_BYTES: u64 = 5 * 1024 * 1024;
/// Total extracted entries across an archive.
pub const DEFAULT_MAX_ENTRIES: usize = 20_000;
/// Following count above which a single followers file looks incomplete.
pub const DEFAULT_INCOMPLETE_FOLLOWERS_THRESHOLD: usize = 1000;

// ---------------------------------------------------------------------------
// Top-level options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconOptions {
    pub limits: Limits,
    /// `|following|` strictly above this with exactly one followers file
    /// attaches the incomplete-upload warning.
    pub incomplete_followers_threshold: usize,
    /// Remove duplicate usernames across followers files, not only within
    /// each file. Off by default: cross-file duplicates are kept.
    pub dedupe_followers_across_files: bool,
}

impl Default for ReconOptions {
    fn default() -> Self {
        Self {
            limits: Limits::default(),
            incomplete_followers_threshold: DEFAULT_INCOMPLETE_FOLLOWERS_THRESHOLD,
            dedupe_followers_across_files: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Resource limits
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum bytes per file or archive member.
    pub max_file_bytes: u64,
    /// Maximum number of members extracted from one archive.
    pub max_entries: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconOptions {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let options: ReconOptions =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.limits.max_file_bytes == 0 {
            return Err(ReconError::ConfigValidation(
                "limits.max_file_bytes must be greater than 0".into(),
            ));
        }
        if self.limits.max_entries == 0 {
            return Err(ReconError::ConfigValidation(
                "limits.max_entries must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
