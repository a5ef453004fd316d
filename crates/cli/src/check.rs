//! `followcheck check`, `validate` and `export`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use followcheck_config::{OutputFormat, Settings};
use followcheck_io::csv::write_usernames_csv;
use followcheck_io::{load_upload, LoadError};
use followcheck_recon::{FileRole, RawUpload, ReconciliationResult, ValidatedUpload};

use crate::exit_codes::{load_exit_code, ErrorOutput, EXIT_ERROR};
use crate::render;
use crate::{CliError, LimitArgs, ListKind};

const MIB: u64 = 1024 * 1024;

/// Settings file (explicit path is fatal on error) with command-line overrides applied.
fn resolve_settings(config: Option<&Path>, overrides: &LimitArgs) -> Result<Settings, CliError> {
    let mut settings = match config {
        Some(path) => Settings::load_from(path).map_err(|e| {
            CliError::config(e).with_hint("fix the file or drop --config / FOLLOWCHECK_CONFIG")
        })?,
        None => Settings::load(),
    };

    let limits = &mut settings.recon.limits;
    if let Some(mb) = overrides.max_file_mb {
        limits.max_file_bytes = mb
            .checked_mul(MIB)
            .ok_or_else(|| CliError::args(format!("--max-file-mb {mb} is too large")))?;
    }
    if let Some(n) = overrides.max_entries {
        limits.max_entries = usize::try_from(n)
            .map_err(|_| CliError::args(format!("--max-entries {n} is too large")))?;
    }
    if overrides.dedupe_followers {
        settings.recon.dedupe_followers_across_files = true;
    }

    settings.recon.validate().map_err(|e| CliError::config(e.to_string()))?;
    log::debug!("options: {:?}", settings.recon);
    Ok(settings)
}

/// Report a loading failure. In JSON mode the error goes to stderr as a JSON
/// line and main stays quiet.
fn load_failure(err: &LoadError, json: bool) -> CliError {
    if json {
        ErrorOutput::from_load_error(err).print();
        CliError::silent(load_exit_code(err))
    } else {
        CliError::load(err)
    }
}

fn read_upload(paths: &[PathBuf], settings: &Settings, json: bool) -> Result<RawUpload, CliError> {
    load_upload(paths, &settings.recon.limits).map_err(|e| load_failure(&e, json))
}

fn reconcile(paths: &[PathBuf], settings: &Settings, json: bool) -> Result<ReconciliationResult, CliError> {
    let upload = read_upload(paths, settings, json)?;
    followcheck_recon::run(upload, &settings.recon).map_err(|e| load_failure(&LoadError::Recon(e), json))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value).map_err(|e| CliError {
        code: EXIT_ERROR,
        message: format!("JSON serialization error: {e}"),
        hint: None,
    })
}

// ============================================================================
// check
// ============================================================================

pub fn cmd_check(
    config: Option<&Path>,
    paths: &[PathBuf],
    json: bool,
    output: Option<PathBuf>,
    search: Option<String>,
    overrides: &LimitArgs,
) -> Result<(), CliError> {
    let settings = resolve_settings(config, overrides)?;
    let json = json || settings.output.format == OutputFormat::Json;

    let result = reconcile(paths, &settings, json)?;

    if let Some(ref path) = output {
        std::fs::write(path, to_json(&result)?)
            .map_err(|e| CliError::io(format!("cannot write {}: {e}", path.display())))?;
        eprintln!("wrote {}", path.display());
    }

    let shown = match search.as_deref() {
        Some(term) => result.search(term),
        None => result,
    };

    if json {
        println!("{}", to_json(&shown)?);
        return Ok(());
    }

    let stdout = std::io::stdout();
    render::print_result(&mut stdout.lock(), &shown, search.as_deref())
        .map_err(|e| CliError::io(format!("cannot write output: {e}")))?;
    for warning in &shown.warnings {
        eprintln!("warning: {warning}");
    }
    Ok(())
}

// ============================================================================
// validate
// ============================================================================

/// What `validate` found in each recognized file.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub file: String,
    pub role: FileRole,
    pub usernames: usize,
    pub skipped_entries: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub files: Vec<FileReport>,
    /// Extra following.json files that a check would ignore.
    pub ignored_following: Vec<String>,
}

impl ValidationReport {
    fn from_upload(validated: ValidatedUpload) -> Self {
        let report = |role: FileRole, seq: followcheck_recon::model::UsernameSequence| FileReport {
            file: seq.file,
            role,
            usernames: seq.usernames.len(),
            skipped_entries: seq.skipped_entries,
        };

        let mut files = vec![report(FileRole::Following, validated.following)];
        files.extend(validated.followers.into_iter().map(|seq| report(FileRole::Followers, seq)));
        Self { files, ignored_following: validated.ignored_following }
    }
}

pub fn cmd_validate(
    config: Option<&Path>,
    paths: &[PathBuf],
    json: bool,
    overrides: &LimitArgs,
) -> Result<(), CliError> {
    let settings = resolve_settings(config, overrides)?;
    let json = json || settings.output.format == OutputFormat::Json;

    let upload = read_upload(paths, &settings, json)?;
    let validated = followcheck_recon::load(upload, &settings.recon)
        .map_err(|e| load_failure(&LoadError::Recon(e), json))?;
    let report = ValidationReport::from_upload(validated);

    if json {
        println!("{}", to_json(&report)?);
        return Ok(());
    }

    let stdout = std::io::stdout();
    render::print_validation(&mut stdout.lock(), &report)
        .map_err(|e| CliError::io(format!("cannot write output: {e}")))
}

// ============================================================================
// export
// ============================================================================

pub fn cmd_export(
    config: Option<&Path>,
    paths: &[PathBuf],
    list: ListKind,
    output: Option<PathBuf>,
    no_urls: bool,
    search: Option<String>,
    overrides: &LimitArgs,
) -> Result<(), CliError> {
    let settings = resolve_settings(config, overrides)?;
    let with_urls = settings.output.csv_profile_urls && !no_urls;

    let mut result = reconcile(paths, &settings, false)?;
    if let Some(term) = search.as_deref() {
        result = result.search(term);
    }
    let usernames = match list {
        ListKind::NotFollowingBack => &result.not_following_back,
        ListKind::YouDontFollowBack => &result.you_dont_follow_back,
    };

    match output {
        Some(path) => {
            let file = File::create(&path)
                .map_err(|e| CliError::io(format!("cannot create {}: {e}", path.display())))?;
            write_usernames_csv(BufWriter::new(file), usernames, with_urls)
                .map_err(|e| CliError::io(format!("cannot write {}: {e}", path.display())))?;
            eprintln!("wrote {} rows to {}", usernames.len(), path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            write_usernames_csv(&mut lock, usernames, with_urls)
                .map_err(|e| CliError::io(format!("cannot write output: {e}")))?;
            lock.flush().map_err(|e| CliError::io(format!("cannot write output: {e}")))?;
        }
    }

    if let Some(message) = &result.message {
        log::info!("{message}");
    }
    Ok(())
}
