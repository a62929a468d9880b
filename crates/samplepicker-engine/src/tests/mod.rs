//! Shared test doubles and fixtures.

use crate::dispatch::Launcher;
use crate::models::ContentReference;
use crate::naming::Clock;
use crate::observe::LogSink;
use crate::permissions::{Permission, PermissionSubsystem};
use crate::request::{ExternalRequest, RequestToken};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashSet;
use std::sync::Mutex;
use tempfile::TempDir;

/// 2024-01-15 09:30:05, formats as `20240115_093005`.
pub fn test_timestamp() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 15)
        .unwrap()
        .and_hms_opt(9, 30, 5)
        .unwrap()
}

pub fn create_test_storage_root() -> TempDir {
    TempDir::new().unwrap()
}

/// Writes a provider-side file and returns a `file://` reference to it.
pub fn create_source_file(dir: &TempDir, name: &str, content: &[u8]) -> ContentReference {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    ContentReference::new(url::Url::from_file_path(&path).unwrap().as_str())
}

#[derive(Default)]
pub struct FakePermissions {
    granted: HashSet<Permission>,
    checked: Mutex<Vec<Permission>>,
    requests: Mutex<Vec<(Vec<Permission>, i32)>>,
}

impl FakePermissions {
    pub fn granting(granted: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            granted: granted.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn granting_all() -> Self {
        Self::granting([
            Permission::Camera,
            Permission::ReadExternalStorage,
            Permission::WriteExternalStorage,
            Permission::ReadMediaImages,
        ])
    }

    pub fn denying_all() -> Self {
        Self::default()
    }

    pub fn checked(&self) -> Vec<Permission> {
        self.checked.lock().unwrap().clone()
    }

    pub fn requests(&self) -> Vec<(Vec<Permission>, i32)> {
        self.requests.lock().unwrap().clone()
    }
}

impl PermissionSubsystem for FakePermissions {
    fn check_granted(&self, permission: Permission) -> bool {
        self.checked.lock().unwrap().push(permission);
        self.granted.contains(&permission)
    }

    fn request(&self, permissions: &[Permission], request_code: i32) {
        self.requests
            .lock()
            .unwrap()
            .push((permissions.to_vec(), request_code));
    }
}

#[derive(Default)]
pub struct RecordingLauncher {
    launched: Mutex<Vec<(RequestToken, ExternalRequest)>>,
}

impl RecordingLauncher {
    pub fn launched(&self) -> Vec<(RequestToken, ExternalRequest)> {
        self.launched.lock().unwrap().clone()
    }
}

impl Launcher for RecordingLauncher {
    fn launch(&self, token: RequestToken, request: &ExternalRequest) {
        self.launched.lock().unwrap().push((token, request.clone()));
    }
}

#[derive(Default)]
pub struct RecordingSink {
    entries: Mutex<Vec<(String, String)>>,
    warnings: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn entries(&self) -> Vec<(String, String)> {
        self.entries.lock().unwrap().clone()
    }

    /// Messages logged at warn, also present in [`Self::messages`].
    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries().into_iter().map(|(_, message)| message).collect()
    }
}

impl LogSink for RecordingSink {
    fn log(&self, tag: &str, message: &str) {
        self.entries
            .lock()
            .unwrap()
            .push((tag.to_string(), message.to_string()));
    }

    fn warn(&self, tag: &str, message: &str) {
        self.warnings.lock().unwrap().push(message.to_string());
        self.log(tag, message);
    }
}

pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
