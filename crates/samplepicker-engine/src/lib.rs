pub mod dispatch;
pub mod error;
pub mod materialize;
pub mod models;
pub mod naming;
pub mod observe;
pub mod permissions;
pub mod pipeline;
pub mod request;
pub mod source;
pub mod storage;
pub mod tier;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use dispatch::{
    CameraDestination, DEFAULT_GALLERY_MAX_ITEMS, Launcher, PreparedRequest, SourceDispatcher,
};
pub use error::{AcquireError, ItemError};
pub use materialize::ResultMaterializer;
pub use models::*;
pub use naming::{Clock, SystemClock, name_for};
pub use observe::{DEFAULT_LOG_TAG, LogFacadeSink, LogSink};
pub use permissions::{
    PERMISSION_REQUEST_CODE, Permission, PermissionGate, PermissionSet, PermissionSubsystem,
    required_permissions,
};
pub use pipeline::{AcquisitionPipeline, Collaborators, PipelineOptions};
pub use request::{ExternalRequest, RequestToken};
pub use source::SourceKind;
pub use storage::{LocalStorage, Storage, StorageError, StorageLayout};
pub use tier::{CapabilityTier, MODERN_TIER_THRESHOLD, TierStrategy, resolve_tier, strategy_for};
