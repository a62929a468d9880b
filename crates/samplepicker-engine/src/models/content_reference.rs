use serde::Serialize;
use std::fmt;
use url::Url;

/// Opaque URI for bytes owned by the platform or a content provider.
///
/// The pipeline only ever reads the referent, once.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ContentReference(String);

impl ContentReference {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The reference parsed as an absolute URI. `None` for bare paths.
    pub fn url(&self) -> Option<Url> {
        Url::parse(&self.0).ok()
    }

    /// Lowercased URI scheme, e.g. `content` or `file`.
    pub fn scheme(&self) -> Option<String> {
        self.url().map(|url| url.scheme().to_string())
    }
}

impl fmt::Display for ContentReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContentReference {
    fn from(uri: &str) -> Self {
        Self::new(uri)
    }
}

impl From<String> for ContentReference {
    fn from(uri: String) -> Self {
        Self(uri)
    }
}
