use crate::source::SourceKind;
use chrono::NaiveDateTime;
use std::path::PathBuf;

/// A locally owned file produced by materialization.
///
/// Ownership passes to the caller; the pipeline never deletes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquiredFile {
    pub path: PathBuf,
    pub kind: SourceKind,
    /// Position within the batch the platform delivered, starting at 0.
    pub index: usize,
    pub created_at: NaiveDateTime,
}

impl AcquiredFile {
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|name| name.to_str())
    }
}
