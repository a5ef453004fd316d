//! Turn command-line paths into a [`RawUpload`].
//!
//! A single `.zip` (or anything starting with a ZIP signature) becomes an
//! archive upload. Directories are walked recursively, the way a browser
//! folder upload would hand over every file inside. Everything else is a
//! loose file. Names, roles, the entry count and sizes are all checked from
//! metadata before any file is read.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use followcheck_recon::classify::classify_name;
use followcheck_recon::{check_upload, FileHeader, FileRole, Limits, RawUpload, ReconError, UploadFile};
use thiserror::Error;
use walkdir::WalkDir;

const ZIP_SIGNATURES: [&[u8; 4]; 2] = [b"PK\x03\x04", b"PK\x05\x06"];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no input paths given")]
    NoInput,
    #[error("{0}: an archive must be the only input")]
    MixedArchive(String),
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Recon(#[from] ReconError),
}

impl LoadError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io { path: path.display().to_string(), source }
    }
}

/// Build an upload from `paths`, in the order given.
pub fn load_upload(paths: &[PathBuf], limits: &Limits) -> Result<RawUpload, LoadError> {
    if paths.is_empty() {
        return Err(LoadError::NoInput);
    }

    for path in paths {
        if path.is_file() && is_archive(path)? {
            if paths.len() > 1 {
                return Err(LoadError::MixedArchive(path.display().to_string()));
            }
            let bytes = std::fs::read(path).map_err(|e| LoadError::io(path, e))?;
            log::debug!("{}: archive upload ({} bytes)", path.display(), bytes.len());
            return Ok(RawUpload::Archive(UploadFile::new(display_name(path), bytes)));
        }
    }

    let mut candidates = Vec::new();
    for path in paths {
        if path.is_dir() {
            collect_dir(path, &mut candidates)?;
        } else {
            push_candidate(path, display_name(path), &mut candidates)?;
        }
    }

    check_upload(candidates.iter().map(Candidate::header), limits)?;

    let files = candidates
        .into_iter()
        .map(|candidate| candidate.read(limits))
        .collect::<Result<Vec<_>, _>>()?;

    log::debug!("{} export files gathered from {} path(s)", files.len(), paths.len());
    Ok(RawUpload::Loose(files))
}

/// A recognized file on disk, known by name and size only.
#[derive(Debug)]
struct Candidate {
    path: PathBuf,
    name: String,
    size: u64,
}

impl Candidate {
    fn header(&self) -> FileHeader<'_> {
        FileHeader { name: &self.name, size: self.size }
    }

    /// Read at most one byte past the limit, so a file that grew since its
    /// metadata was taken is still caught.
    fn read(self, limits: &Limits) -> Result<UploadFile, LoadError> {
        let file = File::open(&self.path).map_err(|e| LoadError::io(&self.path, e))?;
        let mut bytes = Vec::new();
        file.take(limits.max_file_bytes.saturating_add(1))
            .read_to_end(&mut bytes)
            .map_err(|e| LoadError::io(&self.path, e))?;
        if bytes.len() as u64 > limits.max_file_bytes {
            return Err(ReconError::too_large(&self.name, limits.max_file_bytes).into());
        }
        Ok(UploadFile {
            name: self.name,
            declared_size: self.size,
            bytes,
        })
    }
}

fn collect_dir(root: &Path, candidates: &mut Vec<Candidate>) -> Result<(), LoadError> {
    let walker = WalkDir::new(root).follow_links(false).sort_by_file_name();
    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            LoadError::io(&path, e.into())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        push_candidate(entry.path(), name, candidates)?;
    }
    Ok(())
}

/// Record a file's name and size, unless its name gives it no export role.
fn push_candidate(path: &Path, name: String, candidates: &mut Vec<Candidate>) -> Result<(), LoadError> {
    if classify_name(&name) == FileRole::Ignored {
        log::debug!("skipping {name}");
        return Ok(());
    }
    let metadata = std::fs::metadata(path).map_err(|e| LoadError::io(path, e))?;
    candidates.push(Candidate {
        path: path.to_path_buf(),
        name,
        size: metadata.len(),
    });
    Ok(())
}

fn is_archive(path: &Path) -> Result<bool, LoadError> {
    let by_extension = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));
    if by_extension {
        return Ok(true);
    }

    let mut magic = [0u8; 4];
    let mut file = File::open(path).map_err(|e| LoadError::io(path, e))?;
    match file.read_exact(&mut magic) {
        Ok(()) => Ok(ZIP_SIGNATURES.iter().any(|sig| **sig == magic)),
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(LoadError::io(path, e)),
    }
}

fn display_name(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
