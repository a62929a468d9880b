use serde::Serialize;
use std::fmt;

pub const JPEG_ONLY: &str = "image/jpeg";
pub const PDF_ONLY: &str = "application/pdf";

/// The external content source a request is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SourceKind {
    Camera,
    Gallery,
    Document,
}

impl SourceKind {
    pub const ALL: [SourceKind; 3] = [SourceKind::Camera, SourceKind::Gallery, SourceKind::Document];

    /// Prefix used for materialized file names and log lines.
    pub fn label(self) -> &'static str {
        match self {
            SourceKind::Camera => "Camera",
            SourceKind::Gallery => "Gallery",
            SourceKind::Document => "Document",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            SourceKind::Camera | SourceKind::Gallery => "jpg",
            SourceKind::Document => "pdf",
        }
    }

    /// MIME filter handed to pickers for this source.
    pub fn mime_type(self) -> &'static str {
        match self {
            SourceKind::Camera | SourceKind::Gallery => JPEG_ONLY,
            SourceKind::Document => PDF_ONLY,
        }
    }

    pub fn is_image(self) -> bool {
        self != SourceKind::Document
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
