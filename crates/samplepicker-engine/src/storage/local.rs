use super::{Storage, StorageError};
use crate::models::ContentReference;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

const FILE_SCHEME: &str = "file";

/// Filesystem-backed storage.
///
/// Reads `file://` references and bare paths. Other schemes need a host
/// resolver.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        Self
    }

    fn resolve(reference: &ContentReference) -> Result<PathBuf, StorageError> {
        let unsupported = || StorageError::UnsupportedReference(reference.as_str().to_string());
        match reference.url() {
            None => Ok(PathBuf::from(reference.as_str())),
            Some(url) if url.scheme() == FILE_SCHEME => {
                url.to_file_path().map_err(|()| unsupported())
            }
            Some(_) => Err(unsupported()),
        }
    }
}

impl Storage for LocalStorage {
    fn open_read(&self, reference: &ContentReference) -> Result<Box<dyn Read + Send>, StorageError> {
        let path = Self::resolve(reference)?;
        if !path.is_file() {
            return Err(StorageError::NotFound(reference.as_str().to_string()));
        }
        let file = File::open(&path)?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn create_file(&self, path: &Path) -> Result<Box<dyn Write + Send>, StorageError> {
        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        Ok(Box::new(BufWriter::new(file)))
    }

    fn file_len(&self, path: &Path) -> Result<u64, StorageError> {
        match fs::metadata(path) {
            Ok(metadata) if metadata.is_file() => Ok(metadata.len()),
            Ok(_) => Err(StorageError::NotFound(path.display().to_string())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.display().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn remove_file(&self, path: &Path) -> Result<(), StorageError> {
        fs::remove_file(path)?;
        Ok(())
    }
}
