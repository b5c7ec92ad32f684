use async_trait::async_trait;

use crate::{BlobResult, ByteRange, ByteStream, ObjectLocator, SignedUrl};

/// Issues signed, time-limited download URLs - implemented by object stores
#[async_trait]
pub trait SignedUrlStore: Send + Sync {
    /// Mint a URL granting read access to exactly one object
    async fn sign_get(&self, locator: &ObjectLocator, expires_in_secs: u64) -> BlobResult<SignedUrl>;
}

/// Plain HTTP access to signed URLs
///
/// Non-success statuses are reported in the returned value, not as errors;
/// `Err` is reserved for transport failures.
#[async_trait]
pub trait ObjectFetcher: Send + Sync {
    /// Metadata-only request (HEAD)
    async fn head(&self, url: &SignedUrl) -> BlobResult<ObjectHead>;

    /// Content request, optionally restricted to `range`
    async fn get(&self, url: &SignedUrl, range: Option<ByteRange>) -> BlobResult<FetchedObject>;
}

/// Response to a metadata probe
#[derive(Debug, Clone, Default)]
pub struct ObjectHead {
    pub status: u16,
    pub content_length: Option<u64>,
    pub content_type: Option<String>,
}

impl ObjectHead {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Response to a content request
pub struct FetchedObject {
    pub status: u16,
    pub body: Option<ByteStream>,
}

impl FetchedObject {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_partial(&self) -> bool {
        self.status == 206
    }
}

impl std::fmt::Debug for FetchedObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchedObject")
            .field("status", &self.status)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}
