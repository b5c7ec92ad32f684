use bytes::Bytes;
use futures_core::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

/// Stream of bytes for media content
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Default MIME type when the store does not report one
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Identifies one object: a storage bucket plus the path inside it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectLocator {
    pub bucket: String,
    pub path: String,
}

impl ObjectLocator {
    pub fn new<B: Into<String>, P: Into<String>>(bucket: B, path: P) -> Self {
        Self {
            bucket: bucket.into(),
            path: path.into(),
        }
    }

    /// Build from raw route parameters.
    ///
    /// Returns `None` when either part is missing or empty after trimming
    /// leading slashes from the path.
    pub fn from_parts(bucket: Option<&str>, path: Option<&str>) -> Option<Self> {
        let bucket = bucket.filter(|b| !b.is_empty())?;
        let path = path.map(|p| p.trim_start_matches('/')).filter(|p| !p.is_empty())?;
        Some(Self::new(bucket, path))
    }
}

impl std::fmt::Display for ObjectLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.bucket, self.path)
    }
}

/// Size and type of an object, learned by probing its signed URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMetadata {
    pub size: u64,
    pub content_type: String,
}

impl ObjectMetadata {
    pub fn new<S: Into<String>>(size: u64, content_type: S) -> Self {
        Self {
            size,
            content_type: content_type.into(),
        }
    }
}

/// A time-limited download URL for exactly one object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedUrl {
    pub url: String,
    pub expires_in_secs: u64,
}

impl SignedUrl {
    pub fn new<S: Into<String>>(url: S, expires_in_secs: u64) -> Self {
        Self {
            url: url.into(),
            expires_in_secs,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locator_requires_both_parts() {
        assert_eq!(
            ObjectLocator::from_parts(Some("drills"), Some("abc/clip.mp4")),
            Some(ObjectLocator::new("drills", "abc/clip.mp4"))
        );
        assert_eq!(ObjectLocator::from_parts(Some("drills"), None), None);
        assert_eq!(ObjectLocator::from_parts(Some(""), Some("clip.mp4")), None);
        assert_eq!(ObjectLocator::from_parts(Some("drills"), Some("/")), None);
    }

    #[test]
    fn locator_strips_leading_slashes() {
        let locator = ObjectLocator::from_parts(Some("drills"), Some("//abc/clip.mp4")).unwrap();
        assert_eq!(locator.path, "abc/clip.mp4");
        assert_eq!(locator.to_string(), "drills/abc/clip.mp4");
    }
}
