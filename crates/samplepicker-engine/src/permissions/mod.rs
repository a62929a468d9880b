use crate::tier::{CapabilityTier, strategy_for};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Request code attached to every permission prompt.
pub const PERMISSION_REQUEST_CODE: i32 = 1;

/// Runtime permissions the pipeline may need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Permission {
    Camera,
    ReadExternalStorage,
    WriteExternalStorage,
    ReadMediaImages,
}

impl Permission {
    /// Platform identifier for this permission.
    pub fn as_str(self) -> &'static str {
        match self {
            Permission::Camera => "android.permission.CAMERA",
            Permission::ReadExternalStorage => "android.permission.READ_EXTERNAL_STORAGE",
            Permission::WriteExternalStorage => "android.permission.WRITE_EXTERNAL_STORAGE",
            Permission::ReadMediaImages => "android.permission.READ_MEDIA_IMAGES",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered set of permissions, in the order they are presented to the platform.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PermissionSet {
    permissions: Vec<Permission>,
}

impl PermissionSet {
    pub fn new(permissions: impl IntoIterator<Item = Permission>) -> Self {
        let mut set = Self::default();
        for permission in permissions {
            if !set.permissions.contains(&permission) {
                set.permissions.push(permission);
            }
        }
        set
    }

    pub fn iter(&self) -> impl Iterator<Item = Permission> + '_ {
        self.permissions.iter().copied()
    }

    pub fn as_slice(&self) -> &[Permission] {
        &self.permissions
    }

    pub fn contains(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }
}

/// Permission subsystem of the host platform.
///
/// `request` is fire-and-forget: the user's decision arrives out of band and
/// the host re-checks with `check_granted` later.
pub trait PermissionSubsystem: Send + Sync {
    fn check_granted(&self, permission: Permission) -> bool;
    fn request(&self, permissions: &[Permission], request_code: i32);
}

/// Permission set the given tier requires.
pub fn required_permissions(tier: CapabilityTier) -> PermissionSet {
    PermissionSet::new(strategy_for(tier).permissions.iter().copied())
}

/// Decides whether the pipeline may proceed and asks the platform when it may not.
#[derive(Clone)]
pub struct PermissionGate {
    subsystem: Arc<dyn PermissionSubsystem>,
}

impl PermissionGate {
    pub fn new(subsystem: Arc<dyn PermissionSubsystem>) -> Self {
        Self { subsystem }
    }

    /// True only if every permission in the set is currently granted.
    ///
    /// Stops at the first missing permission. An empty set is granted.
    pub fn is_granted(&self, permissions: &PermissionSet) -> bool {
        permissions
            .iter()
            .all(|permission| self.subsystem.check_granted(permission))
    }

    /// Prompts for exactly the permissions in `permissions`, granted or not.
    pub fn request_missing(&self, permissions: &PermissionSet) {
        self.subsystem
            .request(permissions.as_slice(), PERMISSION_REQUEST_CODE);
    }
}
