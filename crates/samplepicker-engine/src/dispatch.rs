use crate::error::AcquireError;
use crate::request::{ExternalRequest, RequestToken};
use crate::source::SourceKind;
use crate::storage::{Storage, StorageLayout};
use crate::tier::{CapabilityTier, strategy_for};
use chrono::NaiveDateTime;
use std::path::PathBuf;

/// Upper bound on images picked in one gallery operation.
pub const DEFAULT_GALLERY_MAX_ITEMS: u32 = 10;

/// Platform mechanism that shows the camera or a picker.
///
/// The result is delivered later, carrying the same token.
pub trait Launcher: Send + Sync {
    fn launch(&self, token: RequestToken, request: &ExternalRequest);
}

/// Camera file allocated before dispatch; the platform writes into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDestination {
    pub path: PathBuf,
    pub created_at: NaiveDateTime,
}

/// A request ready to launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    pub kind: SourceKind,
    pub request: ExternalRequest,
    pub camera_destination: Option<CameraDestination>,
}

/// Builds the source-specific request for a tier.
#[derive(Debug, Clone)]
pub struct SourceDispatcher {
    layout: StorageLayout,
    gallery_max_items: u32,
}

impl SourceDispatcher {
    pub fn new(layout: StorageLayout, gallery_max_items: u32) -> Self {
        Self {
            layout,
            gallery_max_items,
        }
    }

    /// Builds the request for `kind`.
    ///
    /// Camera requests need an existing destination, so the file is created
    /// here; if that fails nothing may be launched.
    pub fn build_request(
        &self,
        kind: SourceKind,
        tier: CapabilityTier,
        storage: &dyn Storage,
        now: NaiveDateTime,
    ) -> Result<PreparedRequest, AcquireError> {
        let (request, camera_destination) = match kind {
            SourceKind::Camera => {
                let destination = self.allocate_camera_destination(storage, now)?;
                (
                    ExternalRequest::capture_image(destination.path.clone()),
                    Some(destination),
                )
            }
            SourceKind::Gallery => {
                let build_gallery = strategy_for(tier).build_gallery;
                (build_gallery(self.gallery_max_items), None)
            }
            SourceKind::Document => (ExternalRequest::get_content(kind.mime_type()), None),
        };

        Ok(PreparedRequest {
            kind,
            request,
            camera_destination,
        })
    }

    fn allocate_camera_destination(
        &self,
        storage: &dyn Storage,
        now: NaiveDateTime,
    ) -> Result<CameraDestination, AcquireError> {
        let path = self.layout.destination_for(SourceKind::Camera, 0, now);
        // Drop the handle straight away; only the empty file is needed.
        storage
            .create_file(&path)
            .map_err(|source| AcquireError::DestinationCreateFailed {
                path: path.clone(),
                source,
            })?;
        Ok(CameraDestination {
            path,
            created_at: now,
        })
    }
}
