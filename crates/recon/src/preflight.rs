//! Checks that need only file names and sizes.
//!
//! Loose files, folders and archive members all pass through [`check_upload`]
//! before any of their bytes are read or parsed, so every kind of upload is
//! rejected the same way and in the same order.

use crate::classify::classify_name;
use crate::config::Limits;
use crate::error::ReconError;
use crate::model::{FileRole, UploadFile};

pub const NOTHING_RECOGNIZED: &str = "no following.json or followers_<N>.json files found";

/// Name and size of one input file, known before its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader<'a> {
    pub name: &'a str,
    pub size: u64,
}

impl<'a> From<&'a UploadFile> for FileHeader<'a> {
    /// The larger of the declared and the actual size.
    fn from(file: &'a UploadFile) -> Self {
        Self {
            name: &file.name,
            size: file.declared_size.max(file.bytes.len() as u64),
        }
    }
}

/// Reject an upload from its headers alone.
///
/// Order: nothing recognized (`Format`), no following file, no followers
/// file, more than `max_entries` recognized files (naming the first one past
/// the limit), then the first recognized file over `max_file_bytes`.
/// Ignored files are neither counted nor size-checked.
pub fn check_upload<'a, I>(headers: I, limits: &Limits) -> Result<(), ReconError>
where
    I: IntoIterator<Item = FileHeader<'a>>,
{
    let recognized: Vec<(FileHeader<'a>, FileRole)> = headers
        .into_iter()
        .map(|header| (header, classify_name(header.name)))
        .filter(|(_, role)| *role != FileRole::Ignored)
        .collect();

    if recognized.is_empty() {
        return Err(ReconError::Format(NOTHING_RECOGNIZED.into()));
    }
    if !recognized.iter().any(|(_, role)| *role == FileRole::Following) {
        return Err(ReconError::MissingFollowing);
    }
    if !recognized.iter().any(|(_, role)| *role == FileRole::Followers) {
        return Err(ReconError::MissingFollowers);
    }

    if let Some((extra, _)) = recognized.get(limits.max_entries) {
        return Err(ReconError::too_many_entries(extra.name, limits.max_entries));
    }
    if let Some((big, _)) = recognized.iter().find(|(h, _)| h.size > limits.max_file_bytes) {
        return Err(ReconError::too_large(big.name, limits.max_file_bytes));
    }

    log::debug!("{} recognized files within limits", recognized.len());
    Ok(())
}
