mod layout;
mod local;

pub use layout::{DOCUMENTS_DIR, PICTURES_DIR, StorageLayout};
pub use local::LocalStorage;

use crate::models::ContentReference;
use std::io::{self, Read, Write};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Content not found: {0}")]
    NotFound(String),
    #[error("Unsupported content reference: {0}")]
    UnsupportedReference(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Byte access for content references and local files.
pub trait Storage: Send + Sync {
    /// Opens the referenced content for a single read.
    fn open_read(&self, reference: &ContentReference) -> Result<Box<dyn Read + Send>, StorageError>;

    /// Creates (or truncates) a local file.
    fn create_file(&self, path: &Path) -> Result<Box<dyn Write + Send>, StorageError>;

    /// Size in bytes of a local file.
    fn file_len(&self, path: &Path) -> Result<u64, StorageError>;

    /// Removes a local file the pipeline created but never handed out.
    fn remove_file(&self, path: &Path) -> Result<(), StorageError>;

    /// Copies `source` to the end into `destination` and flushes it.
    fn copy(&self, source: &mut dyn Read, destination: &mut dyn Write) -> Result<u64, StorageError> {
        let copied = io::copy(source, destination)?;
        destination.flush()?;
        Ok(copied)
    }
}
