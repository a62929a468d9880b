use crate::dispatch::CameraDestination;
use crate::error::ItemError;
use crate::models::{AcquiredFile, ContentReference, ExternalResult, ResultPayload};
use crate::naming::Clock;
use crate::observe::LogSink;
use crate::source::SourceKind;
use crate::storage::{Storage, StorageLayout};
use chrono::NaiveDateTime;
use std::path::Path;
use std::sync::Arc;

/// Turns a delivered result into locally owned files.
///
/// Cancelled or empty results produce nothing. A failing item is logged and
/// skipped; the rest of the batch is still materialized.
pub struct ResultMaterializer {
    layout: StorageLayout,
    storage: Arc<dyn Storage>,
    sink: Arc<dyn LogSink>,
    clock: Arc<dyn Clock>,
    log_tag: String,
}

impl ResultMaterializer {
    pub fn new(
        layout: StorageLayout,
        storage: Arc<dyn Storage>,
        sink: Arc<dyn LogSink>,
        clock: Arc<dyn Clock>,
        log_tag: impl Into<String>,
    ) -> Self {
        Self {
            layout,
            storage,
            sink,
            clock,
            log_tag: log_tag.into(),
        }
    }

    pub fn materialize(
        &self,
        kind: SourceKind,
        result: ExternalResult,
        camera_destination: Option<CameraDestination>,
    ) -> Vec<AcquiredFile> {
        if !result.status.is_success() {
            self.log(&format!("{kind}: cancelled"));
            if let Some(destination) = camera_destination {
                self.discard(&destination.path);
            }
            return Vec::new();
        }

        if kind == SourceKind::Camera {
            return self.reread_camera(camera_destination).into_iter().collect();
        }

        // One timestamp per batch keeps its files adjacent when sorted
        let now = self.clock.now();
        match result.payload {
            None => {
                self.log(&format!("{kind}: no data"));
                Vec::new()
            }
            Some(ResultPayload::Single(reference)) => {
                match self.copy_item(kind, 0, &reference, now) {
                    Ok(file) => {
                        self.log(&format!("{kind}: Uri - {}", file.path.display()));
                        vec![file]
                    }
                    Err(e) => {
                        self.warn(&format!("{kind}: skipped - {e}"));
                        Vec::new()
                    }
                }
            }
            Some(ResultPayload::Multiple(references)) => references
                .iter()
                .enumerate()
                .filter_map(|(index, reference)| {
                    match self.copy_item(kind, index, reference, now) {
                        Ok(file) => {
                            self.log(&format!("{kind}{index}: Uri - {}", file.path.display()));
                            Some(file)
                        }
                        Err(e) => {
                            self.warn(&format!("{kind}{index}: skipped - {e}"));
                            None
                        }
                    }
                })
                .collect(),
        }
    }

    /// The platform wrote the capture straight into the destination.
    fn reread_camera(&self, destination: Option<CameraDestination>) -> Option<AcquiredFile> {
        let Some(destination) = destination else {
            self.log("Camera result without a destination");
            return None;
        };

        match self.storage.file_len(&destination.path) {
            Ok(0) => {
                // The placeholder is still empty: the camera wrote nothing
                self.warn("Camera: nothing captured");
                self.discard(&destination.path);
                None
            }
            Ok(_) => {
                self.log(&format!("Camera result: {}", destination.path.display()));
                Some(AcquiredFile {
                    path: destination.path,
                    kind: SourceKind::Camera,
                    index: 0,
                    created_at: destination.created_at,
                })
            }
            Err(e) => {
                self.warn(&format!(
                    "Camera result missing: {} - {e}",
                    destination.path.display()
                ));
                None
            }
        }
    }

    fn copy_item(
        &self,
        kind: SourceKind,
        index: usize,
        reference: &ContentReference,
        now: NaiveDateTime,
    ) -> Result<AcquiredFile, ItemError> {
        // Released on every return path below
        let mut source =
            self.storage
                .open_read(reference)
                .map_err(|source| ItemError::ContentOpenFailed {
                    reference: reference.clone(),
                    source,
                })?;

        let path = self.layout.destination_for(kind, index, now);
        let mut destination =
            self.storage
                .create_file(&path)
                .map_err(|source| ItemError::DestinationCreateFailed {
                    path: path.clone(),
                    source,
                })?;

        if let Err(error) = self.storage.copy(&mut *source, &mut *destination) {
            drop(destination);
            self.discard(&path);
            return Err(ItemError::CopyFailed {
                reference: reference.clone(),
                path,
                source: error,
            });
        }

        Ok(AcquiredFile {
            path,
            kind,
            index,
            created_at: now,
        })
    }

    /// Removes a destination that was never handed out.
    fn discard(&self, path: &Path) {
        if let Err(e) = self.storage.remove_file(path) {
            self.warn(&format!("Failed to remove {}: {e}", path.display()));
        }
    }

    fn log(&self, message: &str) {
        self.sink.log(&self.log_tag, message);
    }

    fn warn(&self, message: &str) {
        self.sink.warn(&self.log_tag, message);
    }
}
