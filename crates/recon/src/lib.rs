//! `followcheck-recon`: following/followers export reconciliation engine.
//!
//! Pure engine crate: receives in-memory uploads (loose files or a ZIP
//! container), returns a reconciliation result or the first fatal error.
//! No file-system or CLI dependencies.

pub mod archive;
pub mod assemble;
pub mod classify;
pub mod config;
pub mod dedup;
pub mod engine;
pub mod error;
pub mod extract;
pub mod model;
pub mod preflight;
pub mod reconcile;
pub mod schema;

pub use config::{Limits, ReconOptions};
pub use engine::{load, run, ValidatedUpload};
pub use error::ReconError;
pub use preflight::{check_upload, FileHeader};
pub use model::{FileRole, Outcome, RawUpload, ReconStats, ReconciliationResult, UploadFile};
