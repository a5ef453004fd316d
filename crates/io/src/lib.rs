// File I/O operations

pub mod csv;
pub mod upload;

pub use upload::{load_upload, LoadError};
