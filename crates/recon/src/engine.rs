use crate::archive::extract_archive;
use crate::assemble::{assemble, ReconWarning};
use crate::classify::classify_files;
use crate::config::ReconOptions;
use crate::dedup::dedupe;
use crate::error::ReconError;
use crate::extract::extract_usernames;
use crate::model::{ClassifiedFile, FileRole, RawUpload, ReconStats, ReconciliationResult, UsernameSequence};
use crate::preflight::{check_upload, FileHeader};
use crate::reconcile::reconcile;
use crate::schema::validate;

/// Every recognized file of an upload, parsed and flattened, in merge order.
#[derive(Debug, Clone)]
pub struct ValidatedUpload {
    /// The authoritative following file (first in upload order).
    pub following: UsernameSequence,
    /// Followers files in upload order.
    pub followers: Vec<UsernameSequence>,
    /// Further `following.json` files that were present but not used.
    pub ignored_following: Vec<String>,
}

/// Run the whole pipeline: extract, classify, validate, flatten, dedupe,
/// reconcile, assemble.
pub fn run(upload: RawUpload, options: &ReconOptions) -> Result<ReconciliationResult, ReconError> {
    let validated = load(upload, options)?;
    Ok(reconcile_upload(validated, options))
}

/// Everything up to and including username extraction. Fails on the first
/// error in upload order.
pub fn load(upload: RawUpload, options: &ReconOptions) -> Result<ValidatedUpload, ReconError> {
    let limits = &options.limits;

    let files = match upload {
        RawUpload::Archive(container) => {
            log::debug!("extracting {} ({} bytes)", container.name, container.bytes.len());
            extract_archive(&container, limits)?
        }
        RawUpload::Loose(files) => files,
    };
    check_upload(files.iter().map(FileHeader::from), limits)?;
    let total = files.len();

    let classified = classify_files(files);
    log::debug!("{} of {total} files recognized", classified.len());

    let (following, followers): (Vec<ClassifiedFile>, Vec<ClassifiedFile>) =
        classified.into_iter().partition(|f| f.role == FileRole::Following);

    let mut following = following.into_iter();
    let primary = following.next().ok_or(ReconError::MissingFollowing)?;
    let ignored_following: Vec<String> = following.map(|f| f.name).collect();
    if !ignored_following.is_empty() {
        log::info!("multiple following.json files; using {}", primary.name);
    }

    let mut ordered = vec![primary];
    ordered.extend(followers);

    let mut sequences = process_all(&ordered)?.into_iter();
    let following = sequences.next().ok_or(ReconError::MissingFollowing)?;
    let followers: Vec<UsernameSequence> = sequences.collect();

    Ok(ValidatedUpload {
        following,
        followers,
        ignored_following,
    })
}

/// Dedupe, merge, reconcile and assemble an already validated upload.
pub fn reconcile_upload(validated: ValidatedUpload, options: &ReconOptions) -> ReconciliationResult {
    let mut warnings = Vec::new();
    let mut duplicates_removed = 0;

    if !validated.ignored_following.is_empty() {
        warnings.push(ReconWarning::ExtraFollowingFiles {
            used: validated.following.file.clone(),
            ignored: validated.ignored_following.clone(),
        });
    }

    let following = dedupe(validated.following.usernames);
    duplicates_removed += following.removed;

    let followers_files = validated.followers.len();
    let mut followers: Vec<String> = Vec::new();
    for sequence in validated.followers {
        let deduped = dedupe(sequence.usernames);
        duplicates_removed += deduped.removed;
        followers.extend(deduped.usernames);
    }

    if options.dedupe_followers_across_files {
        let merged = dedupe(followers);
        duplicates_removed += merged.removed;
        followers = merged.usernames;
    }

    if duplicates_removed > 0 {
        log::info!("removed {duplicates_removed} duplicate usernames");
        warnings.push(ReconWarning::DuplicatesRemoved);
    }

    if following.usernames.len() > options.incomplete_followers_threshold && followers_files == 1 {
        log::info!(
            "{} accounts followed but only one followers file supplied",
            following.usernames.len()
        );
        warnings.push(ReconWarning::PossiblyIncompleteFollowers);
    }

    let stats = ReconStats {
        following: following.usernames.len(),
        followers: followers.len(),
        followers_files,
        duplicates_removed,
    };

    let reconciled = reconcile(&following.usernames, &followers);
    log::info!(
        "reconciled {} following / {} followers: {} not following back, {} not followed back",
        stats.following,
        stats.followers,
        reconciled.not_following_back.len(),
        reconciled.you_dont_follow_back.len(),
    );

    assemble(reconciled, &warnings, stats)
}

fn process_file(file: &ClassifiedFile) -> Result<UsernameSequence, ReconError> {
    let record = validate(file)?;
    let sequence = extract_usernames(&record);
    log::debug!("{}: {} usernames ({})", file.name, sequence.usernames.len(), file.role);
    Ok(sequence)
}

#[cfg(feature = "parallel")]
fn process_all(files: &[ClassifiedFile]) -> Result<Vec<UsernameSequence>, ReconError> {
    use rayon::prelude::*;

    // Collect everything first so the reported error is the first one in
    // upload order regardless of scheduling.
    let results: Vec<Result<UsernameSequence, ReconError>> = files.par_iter().map(process_file).collect();
    results.into_iter().collect()
}

#[cfg(not(feature = "parallel"))]
fn process_all(files: &[ClassifiedFile]) -> Result<Vec<UsernameSequence>, ReconError> {
    files.iter().map(process_file).collect()
}
