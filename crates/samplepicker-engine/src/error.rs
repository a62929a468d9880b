use crate::models::ContentReference;
use crate::request::RequestToken;
use crate::source::SourceKind;
use crate::storage::StorageError;
use crate::tier::CapabilityTier;
use std::path::PathBuf;

/// Failures reported to the caller of the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum AcquireError {
    #[error("Permissions for the {tier} tier are not granted")]
    PermissionDenied { tier: CapabilityTier },

    #[error("Failed to create capture destination {}: {source}", .path.display())]
    DestinationCreateFailed { path: PathBuf, source: StorageError },

    #[error("A {kind} request is already pending ({token})")]
    RequestAlreadyPending { kind: SourceKind, token: RequestToken },

    #[error("No pending request for token {token}")]
    UnknownRequest { token: RequestToken },
}

/// Failure of a single item in a batch; logged and skipped.
#[derive(Debug, thiserror::Error)]
pub enum ItemError {
    #[error("Failed to open {reference}: {source}")]
    ContentOpenFailed {
        reference: ContentReference,
        source: StorageError,
    },

    #[error("Failed to create {}: {source}", .path.display())]
    DestinationCreateFailed { path: PathBuf, source: StorageError },

    #[error("Failed to copy {reference} to {}: {source}", .path.display())]
    CopyFailed {
        reference: ContentReference,
        path: PathBuf,
        source: StorageError,
    },
}
