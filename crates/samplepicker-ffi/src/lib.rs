//! UniFFI bindings for samplepicker mobile apps
//!
//! Exposes the acquisition pipeline to the Kotlin Android app. The app
//! implements the host callbacks (permissions, launching, content access)
//! and forwards activity results back through [`AcquisitionSession::complete`].

#[cfg(test)]
mod fakes;
mod host;
mod platform;

use host::{HostLauncherAdapter, HostPermissionsAdapter, ResolverStorage};
use samplepicker_config::Config;
use samplepicker_engine::{
    AcquireError, AcquiredFile, AcquisitionPipeline, Collaborators, ContentReference,
    ExternalRequest, ExternalResult, PermissionSubsystem, PipelineOptions, RequestToken,
    ResultPayload, ResultStatus, SourceKind, StorageLayout,
};
use std::sync::Arc;

pub use host::{HostContentResolver, HostContentStream, HostLauncher, HostPermissions};

uniffi::setup_scaffolding!();

const CREATED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

// ============ Errors ============

/// Errors that can cross the FFI boundary
/// Note: Field is named `reason` not `message` to avoid conflict with Throwable.message in Kotlin
#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum FfiError {
    #[error("Permission denied: {reason}")]
    PermissionDenied { reason: String },
    #[error("Capture destination unavailable: {reason}")]
    DestinationUnavailable { reason: String },
    #[error("Request already pending: {reason}")]
    RequestAlreadyPending { reason: String },
    #[error("Unknown request: {reason}")]
    UnknownRequest { reason: String },
    #[error("Config error: {reason}")]
    ConfigError { reason: String },
}

impl From<AcquireError> for FfiError {
    fn from(error: AcquireError) -> Self {
        let reason = error.to_string();
        match error {
            AcquireError::PermissionDenied { .. } => FfiError::PermissionDenied { reason },
            AcquireError::DestinationCreateFailed { .. } => {
                FfiError::DestinationUnavailable { reason }
            }
            AcquireError::RequestAlreadyPending { .. } => FfiError::RequestAlreadyPending { reason },
            AcquireError::UnknownRequest { .. } => FfiError::UnknownRequest { reason },
        }
    }
}

// ============ Session ============

/// One acquisition pipeline bound to a hosting screen.
///
/// Create it when the screen is created and keep it for the screen's lifetime
/// so pending requests survive until their results arrive.
#[derive(uniffi::Object)]
pub struct AcquisitionSession {
    pipeline: AcquisitionPipeline,
}

#[uniffi::export]
impl AcquisitionSession {
    /// Create a session writing under `storage_root` with default options.
    #[uniffi::constructor]
    pub fn new(
        platform_version: u32,
        storage_root: String,
        permissions: Arc<dyn HostPermissions>,
        launcher: Arc<dyn HostLauncher>,
        resolver: Arc<dyn HostContentResolver>,
    ) -> Self {
        Self::build(
            platform_version,
            PipelineOptions::new(storage_root),
            Arc::new(HostPermissionsAdapter::new(permissions)),
            launcher,
            resolver,
        )
    }

    /// Create a session from a TOML config file.
    #[uniffi::constructor]
    pub fn from_config(
        platform_version: u32,
        config_path: String,
        permissions: Arc<dyn HostPermissions>,
        launcher: Arc<dyn HostLauncher>,
        resolver: Arc<dyn HostContentResolver>,
    ) -> Result<Self, FfiError> {
        let config = Config::load_from_path(&config_path)
            .map_err(|e| FfiError::ConfigError {
                reason: e.to_string(),
            })?
            .ok_or_else(|| FfiError::ConfigError {
                reason: format!("no config file at {config_path}"),
            })?;

        Ok(Self::build(
            platform_version,
            options_from_config(&config),
            Arc::new(HostPermissionsAdapter::new(permissions)),
            launcher,
            resolver,
        ))
    }

    /// Capability tier: "legacy" or "modern".
    pub fn tier(&self) -> String {
        self.pipeline.tier().to_string()
    }

    /// Permission identifiers the current tier requires, in prompt order.
    pub fn required_permissions(&self) -> Vec<String> {
        self.pipeline
            .required_permissions()
            .iter()
            .map(|p| p.as_str().to_string())
            .collect()
    }

    pub fn may_proceed(&self) -> bool {
        self.pipeline.may_proceed()
    }

    pub fn request_permissions(&self) {
        self.pipeline.request_permissions();
    }

    /// Call from onResume: prompts when permissions are missing.
    pub fn ensure_permissions(&self) -> bool {
        self.pipeline.ensure_permissions()
    }

    /// Launch the request for `kind`. Returns the token the result must carry.
    pub fn acquire(&self, kind: SourceKindDto) -> Result<String, FfiError> {
        let token = self.pipeline.acquire(kind.into())?;
        Ok(token.to_string())
    }

    /// Hand back the activity result for `token`.
    ///
    /// Run this off the main thread: it copies every picked item.
    pub fn complete(
        &self,
        token: String,
        result: ExternalResultDto,
    ) -> Result<Vec<AcquiredFileDto>, FfiError> {
        let token: RequestToken = token.parse().map_err(|e: uuid::Error| {
            FfiError::UnknownRequest {
                reason: format!("{token}: {e}"),
            }
        })?;
        let files = self.pipeline.complete(token, result.into_engine())?;
        Ok(files.into_iter().map(AcquiredFileDto::from_engine).collect())
    }

    /// Token of the outstanding request for `kind`, if any.
    pub fn pending(&self, kind: SourceKindDto) -> Option<String> {
        self.pipeline.pending(kind.into()).map(|t| t.to_string())
    }

    /// Drop the outstanding request for `kind`, e.g. after the screen was recreated.
    pub fn abandon(&self, kind: SourceKindDto) -> Option<String> {
        self.pipeline.abandon(kind.into()).map(|t| t.to_string())
    }
}

#[cfg(target_os = "android")]
#[uniffi::export]
impl AcquisitionSession {
    /// Create a session that checks and requests permissions itself over JNI,
    /// using the SDK level reported by the device.
    ///
    /// Requires `NativeBridge.attachActivity` to have been called.
    #[uniffi::constructor]
    pub fn with_platform_permissions(
        storage_root: String,
        launcher: Arc<dyn HostLauncher>,
        resolver: Arc<dyn HostContentResolver>,
    ) -> Result<Self, FfiError> {
        let platform_version =
            platform::sdk_version().ok_or_else(|| FfiError::PermissionDenied {
                reason: "could not read the platform version; is an activity attached?"
                    .to_string(),
            })?;

        Ok(Self::build(
            platform_version,
            PipelineOptions::new(storage_root),
            Arc::new(platform::AndroidPermissions),
            launcher,
            resolver,
        ))
    }
}

impl AcquisitionSession {
    fn build(
        platform_version: u32,
        options: PipelineOptions,
        permissions: Arc<dyn PermissionSubsystem>,
        launcher: Arc<dyn HostLauncher>,
        resolver: Arc<dyn HostContentResolver>,
    ) -> Self {
        log::info!(
            "Acquisition session for platform {platform_version} under {}",
            options.layout.root().display()
        );
        let collaborators = Collaborators::new(
            permissions,
            Arc::new(HostLauncherAdapter::new(launcher)),
            Arc::new(ResolverStorage::new(resolver)),
        );

        Self {
            pipeline: AcquisitionPipeline::new(platform_version, options, collaborators),
        }
    }
}

fn options_from_config(config: &Config) -> PipelineOptions {
    PipelineOptions {
        layout: StorageLayout::new(config.storage_root.clone()),
        modern_tier_threshold: config.modern_tier_threshold,
        gallery_max_items: config.gallery_max_items,
        log_tag: config.log_tag.clone(),
    }
}

// ============ DTOs ============

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum SourceKindDto {
    Camera,
    Gallery,
    Document,
}

impl From<SourceKindDto> for SourceKind {
    fn from(kind: SourceKindDto) -> Self {
        match kind {
            SourceKindDto::Camera => SourceKind::Camera,
            SourceKindDto::Gallery => SourceKind::Gallery,
            SourceKindDto::Document => SourceKind::Document,
        }
    }
}

impl From<SourceKind> for SourceKindDto {
    fn from(kind: SourceKind) -> Self {
        match kind {
            SourceKind::Camera => SourceKindDto::Camera,
            SourceKind::Gallery => SourceKindDto::Gallery,
            SourceKind::Document => SourceKindDto::Document,
        }
    }
}

/// What the app should launch, mapped onto an Intent by the Kotlin side.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Enum)]
pub enum ExternalRequestDto {
    /// ACTION_IMAGE_CAPTURE with EXTRA_OUTPUT pointing at `destination`
    CaptureImage {
        destination: String,
        grant_read: bool,
        grant_write: bool,
    },
    /// ACTION_PICK_IMAGES with EXTRA_PICK_IMAGES_MAX
    PickImages { mime_type: String, max_items: u32 },
    /// ACTION_GET_CONTENT, optionally with EXTRA_ALLOW_MULTIPLE and CATEGORY_OPENABLE
    GetContent {
        mime_type: String,
        allow_multiple: bool,
        openable: bool,
    },
}

impl ExternalRequestDto {
    fn from_engine(request: &ExternalRequest) -> Self {
        match request {
            ExternalRequest::CaptureImage {
                destination,
                grant_read,
                grant_write,
            } => Self::CaptureImage {
                destination: destination.to_string_lossy().into_owned(),
                grant_read: *grant_read,
                grant_write: *grant_write,
            },
            ExternalRequest::PickImages {
                mime_type,
                max_items,
            } => Self::PickImages {
                mime_type: mime_type.to_string(),
                max_items: *max_items,
            },
            ExternalRequest::GetContent {
                mime_type,
                allow_multiple,
                openable,
            } => Self::GetContent {
                mime_type: mime_type.to_string(),
                allow_multiple: *allow_multiple,
                openable: *openable,
            },
        }
    }
}

/// An activity result as the app received it.
#[derive(Debug, Clone, uniffi::Record)]
pub struct ExternalResultDto {
    /// Activity result code (RESULT_OK is -1)
    pub result_code: i32,
    /// Intent.data, if any
    pub data: Option<String>,
    /// Intent.clipData URIs in order; takes precedence over `data`
    pub clip_items: Option<Vec<String>>,
}

impl ExternalResultDto {
    fn into_engine(self) -> ExternalResult {
        let payload = match (self.clip_items, self.data) {
            (Some(items), _) => Some(ResultPayload::Multiple(
                items.into_iter().map(ContentReference::new).collect(),
            )),
            (None, Some(uri)) => Some(ResultPayload::Single(ContentReference::new(uri))),
            (None, None) => None,
        };

        ExternalResult {
            status: ResultStatus::from_code(self.result_code),
            payload,
        }
    }
}

/// A file now owned by the app.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct AcquiredFileDto {
    pub path: String,
    pub kind: SourceKindDto,
    /// Position in the picked batch, starting at 0
    pub index: u64,
    /// Local time, `yyyy-MM-ddTHH:mm:ss`
    pub created_at: String,
}

impl AcquiredFileDto {
    fn from_engine(file: AcquiredFile) -> Self {
        Self {
            path: file.path.to_string_lossy().into_owned(),
            kind: file.kind.into(),
            index: u64::try_from(file.index).unwrap_or(u64::MAX),
            created_at: file.created_at.format(CREATED_AT_FORMAT).to_string(),
        }
    }
}

// ============ Standalone Functions ============

/// Initialise logging: logcat on Android, stderr elsewhere.
#[uniffi::export]
pub fn init_logging(tag: String) {
    #[cfg(target_os = "android")]
    {
        android_logger::init_once(
            android_logger::Config::default()
                .with_max_level(log::LevelFilter::Debug)
                .with_tag(tag),
        );
    }

    #[cfg(not(target_os = "android"))]
    {
        // Tags only apply to logcat
        let _ = tag;
        let _ = host_logger().try_init();
    }
}

/// Info by default; `RUST_LOG` takes precedence.
#[cfg(not(target_os = "android"))]
fn host_logger() -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(log::LevelFilter::Info)
        .parse_default_env();
    builder
}

/// The device's SDK level, or None when it cannot be read: off Android, or
/// before `NativeBridge.attachActivity` has run.
#[uniffi::export]
pub fn detect_platform_version() -> Option<u32> {
    platform::sdk_version()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::MemoryResolver;
    use chrono::NaiveDate;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct FakeHost {
        granted: bool,
        requested: Mutex<Vec<(Vec<String>, i32)>>,
        launched: Mutex<Vec<(String, ExternalRequestDto)>>,
        resolver: Arc<MemoryResolver>,
    }

    impl HostPermissions for FakeHost {
        fn check_granted(&self, _permission: String) -> bool {
            self.granted
        }

        fn request(&self, permissions: Vec<String>, request_code: i32) {
            self.requested
                .lock()
                .unwrap()
                .push((permissions, request_code));
        }
    }

    impl HostLauncher for FakeHost {
        fn launch(&self, token: String, request: ExternalRequestDto) {
            self.launched.lock().unwrap().push((token, request));
        }
    }

    impl HostContentResolver for FakeHost {
        fn open(&self, uri: String) -> Option<Arc<dyn HostContentStream>> {
            self.resolver.open(uri)
        }
    }

    fn session(version: u32, host: &Arc<FakeHost>, root: &TempDir) -> AcquisitionSession {
        AcquisitionSession::new(
            version,
            root.path().to_string_lossy().into_owned(),
            host.clone(),
            host.clone(),
            host.clone(),
        )
    }

    fn granted_host(content: &[(&str, &[u8])]) -> Arc<FakeHost> {
        Arc::new(FakeHost {
            granted: true,
            resolver: MemoryResolver::with(content),
            ..FakeHost::default()
        })
    }

    #[test]
    fn test_required_permissions_per_tier() {
        let root = TempDir::new().unwrap();
        let host = granted_host(&[]);

        let modern = session(33, &host, &root);
        assert_eq!(modern.tier(), "modern");
        assert_eq!(
            modern.required_permissions(),
            vec![
                "android.permission.READ_MEDIA_IMAGES".to_string(),
                "android.permission.CAMERA".to_string(),
            ]
        );

        let legacy = session(28, &host, &root);
        assert_eq!(legacy.tier(), "legacy");
        assert_eq!(legacy.required_permissions().len(), 3);
    }

    #[test]
    fn test_ensure_permissions_prompts_host() {
        let root = TempDir::new().unwrap();
        let host = Arc::new(FakeHost::default());
        let session = session(33, &host, &root);

        assert!(!session.ensure_permissions());
        let requested = host.requested.lock().unwrap().clone();
        assert_eq!(requested.len(), 1);
        assert_eq!(requested[0].1, 1);
    }

    #[test]
    fn test_acquire_without_permission_is_an_error() {
        let root = TempDir::new().unwrap();
        let host = Arc::new(FakeHost::default());
        let session = session(33, &host, &root);

        let result = session.acquire(SourceKindDto::Gallery);
        assert!(matches!(result, Err(FfiError::PermissionDenied { .. })));
        assert!(host.launched.lock().unwrap().is_empty());
    }

    #[test]
    fn test_gallery_pick_through_content_resolver() {
        let root = TempDir::new().unwrap();
        let host = granted_host(&[
            ("content://media/1", b"first"),
            ("content://media/2", b"second"),
        ]);
        let session = session(34, &host, &root);

        let token = session.acquire(SourceKindDto::Gallery).unwrap();
        assert_eq!(
            host.launched.lock().unwrap().clone(),
            vec![(
                token.clone(),
                ExternalRequestDto::PickImages {
                    mime_type: "image/jpeg".to_string(),
                    max_items: 10,
                }
            )]
        );

        let files = session
            .complete(
                token,
                ExternalResultDto {
                    result_code: -1,
                    data: None,
                    clip_items: Some(vec![
                        "content://media/1".to_string(),
                        "content://media/missing".to_string(),
                        "content://media/2".to_string(),
                    ]),
                },
            )
            .unwrap();

        assert_eq!(files.iter().map(|f| f.index).collect::<Vec<_>>(), vec![0, 2]);
        assert!(files.iter().all(|f| f.kind == SourceKindDto::Gallery));
        assert_eq!(std::fs::read(&files[0].path).unwrap(), b"first");
        assert_eq!(std::fs::read(&files[1].path).unwrap(), b"second");
        assert_eq!(host.resolver.opened(), 2);
        assert!(host.resolver.all_closed());
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_acquired_file_index_is_not_truncated() {
        let index = u32::MAX as usize + 1;
        let dto = AcquiredFileDto::from_engine(AcquiredFile {
            path: PathBuf::from("/data/files/Pictures/Gallery_20240115_093005_4294967296.jpg"),
            kind: SourceKind::Gallery,
            index,
            created_at: NaiveDate::from_ymd_opt(2024, 1, 15)
                .unwrap()
                .and_hms_opt(9, 30, 5)
                .unwrap(),
        });

        assert_eq!(dto.index, 4_294_967_296);
        assert_eq!(dto.created_at, "2024-01-15T09:30:05");
    }

    #[test]
    fn test_clip_items_take_precedence_over_data() {
        let dto = ExternalResultDto {
            result_code: -1,
            data: Some("content://single".to_string()),
            clip_items: Some(vec!["content://a".to_string()]),
        };
        let result = dto.into_engine();
        assert_eq!(
            result.payload,
            Some(ResultPayload::Multiple(vec![ContentReference::new(
                "content://a"
            )]))
        );
    }

    #[test]
    fn test_cancelled_result_returns_no_files() {
        let root = TempDir::new().unwrap();
        let host = granted_host(&[("content://doc", b"%PDF")]);
        let session = session(33, &host, &root);

        let token = session.acquire(SourceKindDto::Document).unwrap();
        let files = session
            .complete(
                token,
                ExternalResultDto {
                    result_code: 0,
                    data: Some("content://doc".to_string()),
                    clip_items: None,
                },
            )
            .unwrap();
        assert!(files.is_empty());
        assert_eq!(session.pending(SourceKindDto::Document), None);
    }

    #[test]
    fn test_camera_request_carries_destination() {
        let root = TempDir::new().unwrap();
        let host = granted_host(&[]);
        let session = session(30, &host, &root);

        let token = session.acquire(SourceKindDto::Camera).unwrap();
        let request = host.launched.lock().unwrap()[0].1.clone();
        let destination = match request {
            ExternalRequestDto::CaptureImage {
                destination,
                grant_read,
                grant_write,
            } => {
                assert!(grant_read && grant_write);
                destination
            }
            other => panic!("expected capture request, got {other:?}"),
        };
        assert!(destination.starts_with(&*root.path().to_string_lossy()));

        std::fs::write(&destination, b"photo").unwrap();
        let files = session
            .complete(
                token,
                ExternalResultDto {
                    result_code: -1,
                    data: None,
                    clip_items: None,
                },
            )
            .unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, destination);
        assert_eq!(files[0].index, 0);
    }

    #[test]
    fn test_double_acquire_and_bad_token() {
        let root = TempDir::new().unwrap();
        let host = granted_host(&[]);
        let session = session(33, &host, &root);

        let token = session.acquire(SourceKindDto::Document).unwrap();
        assert!(matches!(
            session.acquire(SourceKindDto::Document),
            Err(FfiError::RequestAlreadyPending { .. })
        ));
        assert!(matches!(
            session.complete(
                "garbage".to_string(),
                ExternalResultDto {
                    result_code: -1,
                    data: None,
                    clip_items: None,
                }
            ),
            Err(FfiError::UnknownRequest { .. })
        ));
        assert_eq!(session.abandon(SourceKindDto::Document), Some(token));
    }

    #[test]
    fn test_from_config_applies_options() {
        let root = TempDir::new().unwrap();
        let config_path = root.path().join("config.toml");
        let mut config = Config::new(root.path().join("files"));
        config.gallery_max_items = 4;
        config.modern_tier_threshold = 30;
        config.save_to_path(&config_path).unwrap();

        let host = granted_host(&[]);
        let session = AcquisitionSession::from_config(
            31,
            config_path.to_string_lossy().into_owned(),
            host.clone(),
            host.clone(),
            host.clone(),
        )
        .unwrap();
        assert_eq!(session.tier(), "modern");

        session.acquire(SourceKindDto::Gallery).unwrap();
        assert!(matches!(
            host.launched.lock().unwrap()[0].1,
            ExternalRequestDto::PickImages { max_items: 4, .. }
        ));
    }

    #[test]
    fn test_from_config_missing_file() {
        let root = TempDir::new().unwrap();
        let host = granted_host(&[]);
        let result = AcquisitionSession::from_config(
            33,
            root.path().join("absent.toml").to_string_lossy().into_owned(),
            host.clone(),
            host.clone(),
            host.clone(),
        );
        assert!(matches!(result, Err(FfiError::ConfigError { .. })));
    }

    #[cfg(not(target_os = "android"))]
    #[test]
    fn test_rust_log_overrides_default_level() {
        unsafe {
            std::env::set_var("RUST_LOG", "debug");
        }
        let debug = host_logger().build().filter();
        unsafe {
            std::env::remove_var("RUST_LOG");
        }
        let default = host_logger().build().filter();

        assert_eq!(debug, log::LevelFilter::Debug);
        assert_eq!(default, log::LevelFilter::Info);
    }

    #[cfg(not(target_os = "android"))]
    #[test]
    fn test_detect_platform_version_off_device() {
        assert_eq!(detect_platform_version(), None);
    }
}
