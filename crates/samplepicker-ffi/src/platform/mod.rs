//! Platform-specific functionality
//!
//! Reads the SDK level and runtime permission state directly from Android
//! over JNI, for hosts that do not want to forward them from Kotlin. The
//! host attaches its activity first; until then every lookup reports nothing.

#[cfg_attr(not(target_os = "android"), allow(dead_code))]
mod attachment;

#[cfg(target_os = "android")]
mod android;

#[cfg(target_os = "android")]
pub use android::*;

/// The platform SDK level.
///
/// On non-Android platforms there is none.
#[cfg(not(target_os = "android"))]
pub fn sdk_version() -> Option<u32> {
    None
}
