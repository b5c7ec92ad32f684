use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;

use crate::{
    BlobError, BlobResult, ByteRange, ByteStream, FetchedObject, ObjectFetcher, ObjectHead,
    ObjectLocator, SignedUrl, SignedUrlStore,
};

const MEMORY_SCHEME: &str = "memory://";
const STREAM_CHUNK: usize = 64 * 1024;

#[derive(Clone)]
struct StoredObject {
    content_type: String,
    data: Bytes,
}

/// In-memory object store that signs and serves its own URLs.
///
/// Counts every sign/head/get call and can be told to misbehave in each
/// phase, which makes it the fake store for proxy tests and local runs.
#[derive(Default)]
pub struct MemoryStore {
    objects: RwLock<HashMap<String, StoredObject>>,
    sign_calls: AtomicUsize,
    head_calls: AtomicUsize,
    get_calls: AtomicUsize,
    fail_signing: bool,
    head_status: Option<u16>,
    hide_length: bool,
    get_status: Option<u16>,
    ignore_ranges: bool,
    fail_stream_after: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an object. An empty `content_type` is reported as absent.
    pub fn insert<D: Into<Bytes>>(&self, bucket: &str, path: &str, content_type: &str, data: D) {
        let key = ObjectLocator::new(bucket, path).to_string();
        self.objects.write().insert(
            key,
            StoredObject {
                content_type: content_type.to_string(),
                data: data.into(),
            },
        );
    }

    /// Refuse to sign anything.
    pub fn with_signing_failure(mut self) -> Self {
        self.fail_signing = true;
        self
    }

    /// Answer probes with this status.
    pub fn with_head_status(mut self, status: u16) -> Self {
        self.head_status = Some(status);
        self
    }

    /// Omit `Content-Length` from probe responses.
    pub fn without_content_length(mut self) -> Self {
        self.hide_length = true;
        self
    }

    /// Answer content requests with this status and no body.
    pub fn with_get_status(mut self, status: u16) -> Self {
        self.get_status = Some(status);
        self
    }

    /// Behave like a server without range support: always 200, whole body.
    pub fn ignoring_ranges(mut self) -> Self {
        self.ignore_ranges = true;
        self
    }

    /// Break every body stream after `bytes` bytes.
    pub fn failing_stream_after(mut self, bytes: usize) -> Self {
        self.fail_stream_after = Some(bytes);
        self
    }

    pub fn sign_calls(&self) -> usize {
        self.sign_calls.load(Ordering::SeqCst)
    }

    pub fn head_calls(&self) -> usize {
        self.head_calls.load(Ordering::SeqCst)
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    fn lookup(&self, url: &SignedUrl) -> Option<StoredObject> {
        let key = url
            .as_str()
            .strip_prefix(MEMORY_SCHEME)?
            .split('?')
            .next()?;
        self.objects.read().get(key).cloned()
    }

    fn body(&self, data: Bytes) -> ByteStream {
        let mut items: Vec<Result<Bytes, std::io::Error>> = Vec::new();
        let cut = self.fail_stream_after.unwrap_or(usize::MAX).min(data.len());

        let mut offset = 0;
        while offset < cut {
            let next = (offset + STREAM_CHUNK).min(cut);
            items.push(Ok(data.slice(offset..next)));
            offset = next;
        }
        if self.fail_stream_after.is_some() {
            items.push(Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "memory store stream interrupted",
            )));
        }

        Box::pin(futures::stream::iter(items))
    }
}

#[async_trait]
impl SignedUrlStore for MemoryStore {
    async fn sign_get(&self, locator: &ObjectLocator, expires_in_secs: u64) -> BlobResult<SignedUrl> {
        self.sign_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_signing {
            return Err(BlobError::invalid("signing disabled"));
        }
        let key = locator.to_string();
        if !self.objects.read().contains_key(&key) {
            return Err(BlobError::not_found(key));
        }

        Ok(SignedUrl::new(
            format!("{MEMORY_SCHEME}{key}?expires_in={expires_in_secs}"),
            expires_in_secs,
        ))
    }
}

#[async_trait]
impl ObjectFetcher for MemoryStore {
    async fn head(&self, url: &SignedUrl) -> BlobResult<ObjectHead> {
        self.head_calls.fetch_add(1, Ordering::SeqCst);

        let Some(object) = self.lookup(url) else {
            return Ok(ObjectHead {
                status: 404,
                ..ObjectHead::default()
            });
        };

        Ok(ObjectHead {
            status: self.head_status.unwrap_or(200),
            content_length: (!self.hide_length).then_some(object.data.len() as u64),
            content_type: Some(object.content_type).filter(|ct| !ct.is_empty()),
        })
    }

    async fn get(&self, url: &SignedUrl, range: Option<ByteRange>) -> BlobResult<FetchedObject> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(status) = self.get_status {
            return Ok(FetchedObject { status, body: None });
        }
        let Some(object) = self.lookup(url) else {
            return Ok(FetchedObject {
                status: 404,
                body: None,
            });
        };

        let size = object.data.len() as u64;
        match range.filter(|_| !self.ignore_ranges) {
            Some(range) if !range.is_satisfiable(size) => Ok(FetchedObject {
                status: 416,
                body: None,
            }),
            Some(range) => {
                let slice = object.data.slice(range.start as usize..=range.end as usize);
                Ok(FetchedObject {
                    status: 206,
                    body: Some(self.body(slice)),
                })
            }
            None => Ok(FetchedObject {
                status: 200,
                body: Some(self.body(object.data)),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    async fn collect(mut stream: ByteStream) -> Result<Vec<u8>, std::io::Error> {
        let mut out = Vec::new();
        while let Some(chunk) = stream.next().await {
            out.extend_from_slice(&chunk?);
        }
        Ok(out)
    }

    #[tokio::test]
    async fn serves_ranges_from_signed_urls() {
        let store = MemoryStore::new();
        let data: Vec<u8> = (0..=255u8).cycle().take(200_000).collect();
        store.insert("drills", "clip.mp4", "video/mp4", data.clone());

        let url = store
            .sign_get(&ObjectLocator::new("drills", "clip.mp4"), 60)
            .await
            .unwrap();
        let fetched = store.get(&url, Some(ByteRange::new(100, 150_099))).await.unwrap();

        assert_eq!(fetched.status, 206);
        let body = collect(fetched.body.unwrap()).await.unwrap();
        assert_eq!(body, data[100..=150_099]);
    }

    #[tokio::test]
    async fn unknown_urls_are_404() {
        let store = MemoryStore::new();
        let head = store.head(&SignedUrl::new("memory://nope/x", 60)).await.unwrap();
        assert_eq!(head.status, 404);
        assert!(!head.is_success());
    }

    #[tokio::test]
    async fn interrupted_streams_end_with_an_error() {
        let store = MemoryStore::new().failing_stream_after(10);
        store.insert("drills", "clip.mp4", "video/mp4", vec![1u8; 100]);

        let url = store
            .sign_get(&ObjectLocator::new("drills", "clip.mp4"), 60)
            .await
            .unwrap();
        let fetched = store.get(&url, None).await.unwrap();

        assert!(collect(fetched.body.unwrap()).await.is_err());
    }
}
