use crate::dispatch::{CameraDestination, DEFAULT_GALLERY_MAX_ITEMS, Launcher, SourceDispatcher};
use crate::error::AcquireError;
use crate::materialize::ResultMaterializer;
use crate::models::{AcquiredFile, ExternalResult};
use crate::naming::{Clock, SystemClock};
use crate::observe::{DEFAULT_LOG_TAG, LogFacadeSink, LogSink};
use crate::permissions::{PermissionGate, PermissionSet, PermissionSubsystem, required_permissions};
use crate::request::RequestToken;
use crate::source::SourceKind;
use crate::storage::{Storage, StorageLayout};
use crate::tier::{CapabilityTier, MODERN_TIER_THRESHOLD, resolve_tier};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

/// Tunables for an [`AcquisitionPipeline`].
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub layout: StorageLayout,
    pub modern_tier_threshold: u32,
    pub gallery_max_items: u32,
    pub log_tag: String,
}

impl PipelineOptions {
    pub fn new(storage_root: impl Into<PathBuf>) -> Self {
        Self {
            layout: StorageLayout::new(storage_root),
            modern_tier_threshold: MODERN_TIER_THRESHOLD,
            gallery_max_items: DEFAULT_GALLERY_MAX_ITEMS,
            log_tag: DEFAULT_LOG_TAG.to_string(),
        }
    }
}

/// Host capabilities the pipeline is composed from.
#[derive(Clone)]
pub struct Collaborators {
    pub permissions: Arc<dyn PermissionSubsystem>,
    pub launcher: Arc<dyn Launcher>,
    pub storage: Arc<dyn Storage>,
    pub log: Arc<dyn LogSink>,
    pub clock: Arc<dyn Clock>,
}

impl Collaborators {
    /// Logs through the `log` facade and names files by the local clock.
    pub fn new(
        permissions: Arc<dyn PermissionSubsystem>,
        launcher: Arc<dyn Launcher>,
        storage: Arc<dyn Storage>,
    ) -> Self {
        Self {
            permissions,
            launcher,
            storage,
            log: Arc::new(LogFacadeSink),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_log_sink(mut self, log: Arc<dyn LogSink>) -> Self {
        self.log = log;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

#[derive(Debug)]
struct PendingRequest {
    token: RequestToken,
    camera_destination: Option<CameraDestination>,
}

/// Permission gate, dispatch and materialization wired together.
///
/// At most one request per [`SourceKind`] is outstanding. Each launch yields a
/// [`RequestToken`]; the host hands the token back with the result.
pub struct AcquisitionPipeline {
    platform_version: u32,
    options: PipelineOptions,
    collaborators: Collaborators,
    gate: PermissionGate,
    dispatcher: SourceDispatcher,
    materializer: ResultMaterializer,
    pending: Mutex<HashMap<SourceKind, PendingRequest>>,
}

impl AcquisitionPipeline {
    pub fn new(platform_version: u32, options: PipelineOptions, collaborators: Collaborators) -> Self {
        let gate = PermissionGate::new(collaborators.permissions.clone());
        let dispatcher = SourceDispatcher::new(options.layout.clone(), options.gallery_max_items);
        let materializer = ResultMaterializer::new(
            options.layout.clone(),
            collaborators.storage.clone(),
            collaborators.log.clone(),
            collaborators.clock.clone(),
            options.log_tag.clone(),
        );

        Self {
            platform_version,
            options,
            collaborators,
            gate,
            dispatcher,
            materializer,
            pending: Mutex::new(HashMap::new()),
        }
    }

    pub fn tier(&self) -> CapabilityTier {
        resolve_tier(self.platform_version, self.options.modern_tier_threshold)
    }

    pub fn required_permissions(&self) -> PermissionSet {
        required_permissions(self.tier())
    }

    /// Whether every permission of the current tier is granted.
    pub fn may_proceed(&self) -> bool {
        self.gate.is_granted(&self.required_permissions())
    }

    /// Prompts for the current tier's permission set.
    pub fn request_permissions(&self) {
        let permissions = self.required_permissions();
        self.log(&format!("Requesting {} permissions", self.tier()));
        self.gate.request_missing(&permissions);
    }

    /// Checks the gate and prompts if it is closed, as a host does when its
    /// screen comes to the foreground. Returns whether it was already open.
    pub fn ensure_permissions(&self) -> bool {
        if self.may_proceed() {
            return true;
        }
        self.request_permissions();
        false
    }

    /// Launches the request for `kind` and returns the token its result must carry.
    pub fn acquire(&self, kind: SourceKind) -> Result<RequestToken, AcquireError> {
        let tier = self.tier();
        if !self.gate.is_granted(&required_permissions(tier)) {
            self.log(&format!("{kind}: permissions for the {tier} tier missing"));
            return Err(AcquireError::PermissionDenied { tier });
        }

        let token = RequestToken::new();
        let prepared = {
            let mut pending = self.lock_pending();
            if let Some(existing) = pending.get(&kind) {
                return Err(AcquireError::RequestAlreadyPending {
                    kind,
                    token: existing.token,
                });
            }

            let prepared = self.dispatcher.build_request(
                kind,
                tier,
                self.collaborators.storage.as_ref(),
                self.collaborators.clock.now(),
            )?;
            pending.insert(
                kind,
                PendingRequest {
                    token,
                    camera_destination: prepared.camera_destination.clone(),
                },
            );
            prepared
        };

        // Lock released: a host may deliver the result from inside launch
        self.collaborators.launcher.launch(token, &prepared.request);
        Ok(token)
    }

    /// Materializes the result delivered for `token`.
    ///
    /// Cancelled results complete the request with no files.
    pub fn complete(
        &self,
        token: RequestToken,
        result: ExternalResult,
    ) -> Result<Vec<AcquiredFile>, AcquireError> {
        let (kind, request) = {
            let mut pending = self.lock_pending();
            let kind = pending
                .iter()
                .find(|(_, request)| request.token == token)
                .map(|(kind, _)| *kind)
                .ok_or(AcquireError::UnknownRequest { token })?;
            let request = pending
                .remove(&kind)
                .ok_or(AcquireError::UnknownRequest { token })?;
            (kind, request)
        };

        Ok(self
            .materializer
            .materialize(kind, result, request.camera_destination))
    }

    /// Token of the outstanding request for `kind`, if any.
    pub fn pending(&self, kind: SourceKind) -> Option<RequestToken> {
        self.lock_pending().get(&kind).map(|request| request.token)
    }

    /// Forgets the outstanding request for `kind`; a late result for it is
    /// then rejected as unknown.
    pub fn abandon(&self, kind: SourceKind) -> Option<RequestToken> {
        let token = self.lock_pending().remove(&kind).map(|request| request.token);
        if let Some(token) = token {
            self.log(&format!("{kind}: abandoned request {token}"));
        }
        token
    }

    fn lock_pending(&self) -> MutexGuard<'_, HashMap<SourceKind, PendingRequest>> {
        // Recover from poisoned mutex (another thread panicked while holding lock)
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn log(&self, message: &str) {
        self.collaborators.log.log(&self.options.log_tag, message);
    }
}
