use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    BlobError, BlobResult, ObjectFetcher, ObjectLocator, ObjectMetadata, ProxyConfig, SignedUrl,
    SignedUrlStore,
};

/// An object whose signed URL and metadata are known
#[derive(Debug, Clone)]
pub struct ResolvedObject {
    pub locator: ObjectLocator,
    pub signed_url: SignedUrl,
    pub metadata: ObjectMetadata,
}

/// Signs an object and probes the signed URL for size and type
pub struct MetadataResolver {
    signer: Arc<dyn SignedUrlStore>,
    fetcher: Arc<dyn ObjectFetcher>,
    signed_url_ttl_secs: u64,
    default_content_type: String,
}

impl MetadataResolver {
    pub fn new(
        signer: Arc<dyn SignedUrlStore>,
        fetcher: Arc<dyn ObjectFetcher>,
        config: &ProxyConfig,
    ) -> Self {
        Self {
            signer,
            fetcher,
            signed_url_ttl_secs: config.signed_url_ttl_secs,
            default_content_type: config.default_content_type.clone(),
        }
    }

    /// Sign, then probe. A fresh URL is minted on every call.
    ///
    /// - signing failure or a non-success probe: `BlobError::NotFound`
    /// - a missing or zero `Content-Length`: `BlobError::SizeUnknown`
    pub async fn resolve(&self, locator: &ObjectLocator) -> BlobResult<ResolvedObject> {
        let signed_url = self
            .signer
            .sign_get(locator, self.signed_url_ttl_secs)
            .await
            .map_err(|e| {
                warn!(object = %locator, error = %e, "signed URL error");
                BlobError::not_found(locator.to_string())
            })?;

        let head = self.fetcher.head(&signed_url).await?;
        if !head.is_success() {
            warn!(object = %locator, status = head.status, "metadata probe failed");
            return Err(BlobError::not_found(locator.to_string()));
        }

        let size = match head.content_length {
            Some(size) if size > 0 => size,
            _ => {
                warn!(object = %locator, "probe reported no content length");
                return Err(BlobError::size_unknown(locator.to_string()));
            }
        };

        let content_type = head
            .content_type
            .filter(|ct| !ct.trim().is_empty())
            .unwrap_or_else(|| self.default_content_type.clone());

        debug!(object = %locator, size, content_type = %content_type, "resolved object metadata");

        Ok(ResolvedObject {
            locator: locator.clone(),
            signed_url,
            metadata: ObjectMetadata::new(size, content_type),
        })
    }
}
