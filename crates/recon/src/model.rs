use serde::Serialize;
use serde_json::Value;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A named byte blob as handed over by the host (file picker, file system,
/// or archive extraction).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    /// Size reported by the host before reading. Checked against limits
    /// before any parsing happens.
    pub declared_size: u64,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            declared_size: bytes.len() as u64,
            bytes,
        }
    }
}

/// One upload invocation: either loose files in upload order, or a single
/// compressed container.
#[derive(Debug, Clone)]
pub enum RawUpload {
    Loose(Vec<UploadFile>),
    Archive(UploadFile),
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileRole {
    Following,
    Followers,
    Ignored,
}

impl std::fmt::Display for FileRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Following => write!(f, "following"),
            Self::Followers => write!(f, "followers"),
            Self::Ignored => write!(f, "ignored"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClassifiedFile {
    pub name: String,
    pub role: FileRole,
    pub bytes: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Validated records
// ---------------------------------------------------------------------------

/// A file whose top-level shape matched its role. Individual entries are
/// kept as raw JSON; their inner shape is checked leniently on extraction.
#[derive(Debug, Clone)]
pub struct ExportRecord {
    pub file: String,
    pub role: FileRole,
    pub entries: Vec<Value>,
}

/// Usernames from one file plus what extraction had to skip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsernameSequence {
    pub file: String,
    pub usernames: Vec<String>,
    pub skipped_entries: usize,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Which edge-case rule produced the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    EmptyFollowing,
    EmptyFollowers,
    Mutual,
    CircleComplete,
    SomeDontFollowBack,
    Mixed,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyFollowing => write!(f, "empty_following"),
            Self::EmptyFollowers => write!(f, "empty_followers"),
            Self::Mutual => write!(f, "mutual"),
            Self::CircleComplete => write!(f, "circle_complete"),
            Self::SomeDontFollowBack => write!(f, "some_dont_follow_back"),
            Self::Mixed => write!(f, "mixed"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconStats {
    /// Usernames in the effective following sequence, after dedup.
    pub following: usize,
    /// Usernames in the combined followers sequence.
    pub followers: usize,
    pub followers_files: usize,
    pub duplicates_removed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationResult {
    pub not_following_back: Vec<String>,
    pub you_dont_follow_back: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtext: Option<String>,
    pub warnings: Vec<String>,
    pub outcome: Outcome,
    pub stats: ReconStats,
}

impl ReconciliationResult {
    /// Copy of the result with both lists narrowed to usernames containing
    /// `term`, case-insensitively. An empty term keeps everything.
    pub fn search(&self, term: &str) -> Self {
        let needle = term.trim().to_lowercase();
        let keep = |list: &[String]| -> Vec<String> {
            list.iter()
                .filter(|u| needle.is_empty() || u.to_lowercase().contains(&needle))
                .cloned()
                .collect()
        };
        Self {
            not_following_back: keep(&self.not_following_back),
            you_dont_follow_back: keep(&self.you_dont_follow_back),
            ..self.clone()
        }
    }
}
