use crate::permissions::Permission;
use crate::request::ExternalRequest;
use crate::source::JPEG_ONLY;
use serde::Serialize;
use std::fmt;

/// First platform version with scoped media permissions and the system photo picker.
pub const MODERN_TIER_THRESHOLD: u32 = 33;

/// Group of platform versions sharing one permission and picker mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CapabilityTier {
    Legacy,
    Modern,
}

impl fmt::Display for CapabilityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapabilityTier::Legacy => f.write_str("legacy"),
            CapabilityTier::Modern => f.write_str("modern"),
        }
    }
}

/// Modern if `platform_version` is at or above `threshold`, Legacy otherwise.
pub fn resolve_tier(platform_version: u32, threshold: u32) -> CapabilityTier {
    if platform_version >= threshold {
        CapabilityTier::Modern
    } else {
        CapabilityTier::Legacy
    }
}

/// Everything that differs between tiers.
pub struct TierStrategy {
    pub tier: CapabilityTier,
    pub permissions: &'static [Permission],
    /// Builds the gallery request; receives the per-operation item limit.
    pub build_gallery: fn(u32) -> ExternalRequest,
}

static LEGACY: TierStrategy = TierStrategy {
    tier: CapabilityTier::Legacy,
    permissions: &[
        Permission::WriteExternalStorage,
        Permission::ReadExternalStorage,
        Permission::Camera,
    ],
    build_gallery: legacy_gallery,
};

static MODERN: TierStrategy = TierStrategy {
    tier: CapabilityTier::Modern,
    permissions: &[Permission::ReadMediaImages, Permission::Camera],
    build_gallery: modern_gallery,
};

pub fn strategy_for(tier: CapabilityTier) -> &'static TierStrategy {
    match tier {
        CapabilityTier::Legacy => &LEGACY,
        CapabilityTier::Modern => &MODERN,
    }
}

// The generic content chooser has no item limit.
fn legacy_gallery(_max_items: u32) -> ExternalRequest {
    ExternalRequest::get_content(JPEG_ONLY)
}

fn modern_gallery(max_items: u32) -> ExternalRequest {
    ExternalRequest::PickImages {
        mime_type: JPEG_ONLY,
        max_items,
    }
}
