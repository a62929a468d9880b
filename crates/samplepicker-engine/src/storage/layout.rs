use crate::naming::name_for;
use crate::source::SourceKind;
use chrono::NaiveDateTime;
use relative_path::{RelativePath, RelativePathBuf};
use std::path::{Path, PathBuf};

pub const PICTURES_DIR: &str = "Pictures";
pub const DOCUMENTS_DIR: &str = "Documents";

/// Where materialized files go under the application storage root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    root: PathBuf,
    pictures: RelativePathBuf,
    documents: RelativePathBuf,
}

impl StorageLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            pictures: RelativePathBuf::from(PICTURES_DIR),
            documents: RelativePathBuf::from(DOCUMENTS_DIR),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn directory_for(&self, kind: SourceKind) -> &RelativePath {
        if kind.is_image() {
            &self.pictures
        } else {
            &self.documents
        }
    }

    /// Absolute path for item `index` of a `kind` batch taken at `timestamp`.
    pub fn destination_for(
        &self,
        kind: SourceKind,
        index: usize,
        timestamp: NaiveDateTime,
    ) -> PathBuf {
        self.directory_for(kind)
            .join(name_for(kind, index, timestamp))
            .to_path(&self.root)
    }
}
