use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use uuid::Uuid;

/// Correlates a launched request with the result the platform later delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RequestToken(Uuid);

impl RequestToken {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for RequestToken {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A request for the platform to launch a camera or picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ExternalRequest {
    /// Image capture written straight into `destination`.
    CaptureImage {
        destination: PathBuf,
        grant_read: bool,
        grant_write: bool,
    },
    /// System photo picker.
    PickImages {
        mime_type: &'static str,
        max_items: u32,
    },
    /// Generic openable-content chooser.
    GetContent {
        mime_type: &'static str,
        allow_multiple: bool,
        openable: bool,
    },
}

impl ExternalRequest {
    pub fn capture_image(destination: PathBuf) -> Self {
        ExternalRequest::CaptureImage {
            destination,
            grant_read: true,
            grant_write: true,
        }
    }

    pub fn get_content(mime_type: &'static str) -> Self {
        ExternalRequest::GetContent {
            mime_type,
            allow_multiple: true,
            openable: true,
        }
    }
}
