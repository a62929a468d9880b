//! Host callbacks implemented on the Kotlin side, and their adapters onto
//! the engine's collaborator traits.

use crate::ExternalRequestDto;
use samplepicker_engine::{
    ContentReference, ExternalRequest, Launcher, LocalStorage, Permission, PermissionSubsystem,
    RequestToken, Storage, StorageError,
};
use std::io::{self, BufReader, Read, Write};
use std::path::Path;
use std::sync::Arc;

const CONTENT_SCHEME: &str = "content";
/// Bytes requested from the host per call across the boundary.
const READ_CHUNK: usize = 64 * 1024;

/// Runtime permission checks and prompts (ContextCompat / ActivityCompat).
#[uniffi::export(with_foreign)]
pub trait HostPermissions: Send + Sync {
    fn check_granted(&self, permission: String) -> bool;
    /// Show the system prompt; the answer arrives via onRequestPermissionsResult.
    fn request(&self, permissions: Vec<String>, request_code: i32);
}

/// Launches intents through the activity result launcher for the request's kind.
#[uniffi::export(with_foreign)]
pub trait HostLauncher: Send + Sync {
    fn launch(&self, token: String, request: ExternalRequestDto);
}

/// Opens `content://` URIs through the ContentResolver.
#[uniffi::export(with_foreign)]
pub trait HostContentResolver: Send + Sync {
    /// An input stream over `uri`, or None if it cannot be opened.
    fn open(&self, uri: String) -> Option<Arc<dyn HostContentStream>>;
}

/// An open `InputStream` on the Kotlin side.
#[uniffi::export(with_foreign)]
pub trait HostContentStream: Send + Sync {
    /// Up to `max_len` bytes; empty at end of stream, None if the read failed.
    fn read(&self, max_len: u32) -> Option<Vec<u8>>;
    fn close(&self);
}

pub(crate) struct HostPermissionsAdapter {
    host: Arc<dyn HostPermissions>,
}

impl HostPermissionsAdapter {
    pub(crate) fn new(host: Arc<dyn HostPermissions>) -> Self {
        Self { host }
    }
}

impl PermissionSubsystem for HostPermissionsAdapter {
    fn check_granted(&self, permission: Permission) -> bool {
        self.host.check_granted(permission.as_str().to_string())
    }

    fn request(&self, permissions: &[Permission], request_code: i32) {
        let names = permissions.iter().map(|p| p.as_str().to_string()).collect();
        self.host.request(names, request_code);
    }
}

pub(crate) struct HostLauncherAdapter {
    host: Arc<dyn HostLauncher>,
}

impl HostLauncherAdapter {
    pub(crate) fn new(host: Arc<dyn HostLauncher>) -> Self {
        Self { host }
    }
}

impl Launcher for HostLauncherAdapter {
    fn launch(&self, token: RequestToken, request: &ExternalRequest) {
        self.host
            .launch(token.to_string(), ExternalRequestDto::from_engine(request));
    }
}

/// Provider URIs go through the host; everything else is local.
pub(crate) struct ResolverStorage {
    resolver: Arc<dyn HostContentResolver>,
    local: LocalStorage,
}

impl ResolverStorage {
    pub(crate) fn new(resolver: Arc<dyn HostContentResolver>) -> Self {
        Self {
            resolver,
            local: LocalStorage::new(),
        }
    }
}

impl Storage for ResolverStorage {
    fn open_read(&self, reference: &ContentReference) -> Result<Box<dyn Read + Send>, StorageError> {
        if reference.scheme().as_deref() != Some(CONTENT_SCHEME) {
            return self.local.open_read(reference);
        }

        let stream = self
            .resolver
            .open(reference.as_str().to_string())
            .ok_or_else(|| StorageError::NotFound(reference.as_str().to_string()))?;
        Ok(Box::new(BufReader::with_capacity(
            READ_CHUNK,
            HostReader::new(stream),
        )))
    }

    fn create_file(&self, path: &Path) -> Result<Box<dyn Write + Send>, StorageError> {
        self.local.create_file(path)
    }

    fn file_len(&self, path: &Path) -> Result<u64, StorageError> {
        self.local.file_len(path)
    }

    fn remove_file(&self, path: &Path) -> Result<(), StorageError> {
        self.local.remove_file(path)
    }
}

/// [`Read`] over a host stream. The stream is closed when the reader drops.
struct HostReader {
    stream: Arc<dyn HostContentStream>,
}

impl HostReader {
    fn new(stream: Arc<dyn HostContentStream>) -> Self {
        Self { stream }
    }
}

impl Read for HostReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let max_len = u32::try_from(buf.len().min(READ_CHUNK)).unwrap_or(u32::MAX);
        let chunk = self
            .stream
            .read(max_len)
            .ok_or_else(|| io::Error::other("host stream read failed"))?;
        if chunk.len() > buf.len() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("host returned {} bytes for a {} byte read", chunk.len(), buf.len()),
            ));
        }
        buf[..chunk.len()].copy_from_slice(&chunk);
        Ok(chunk.len())
    }
}

impl Drop for HostReader {
    fn drop(&mut self) {
        self.stream.close();
    }
}
