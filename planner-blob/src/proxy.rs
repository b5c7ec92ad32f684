use std::sync::Arc;

use tracing::{debug, warn};

use crate::delivery::bounded_stream;
use crate::{
    BlobError, BlobResult, ByteStream, DeliveryPlan, MetadataResolver,
    ObjectFetcher, ObjectLocator, ObjectMetadata, ProxyConfig, RangeRequest, ResolvedObject,
    SignedUrlStore,
};

/// Media ready to be written to a client
pub struct OpenedMedia {
    pub plan: DeliveryPlan,
    pub metadata: ObjectMetadata,
    pub body: ByteStream,
}

impl OpenedMedia {
    pub fn status_code(&self) -> u16 {
        self.plan.status_code()
    }

    pub fn content_length(&self) -> u64 {
        self.plan.content_length()
    }

    /// `Content-Range` for partial responses.
    pub fn content_range(&self) -> Option<String> {
        self.plan.content_range()
    }
}

/// Range-aware proxy in front of a signed-URL object store.
///
/// Each call runs sign → probe → plan → fetch strictly in that order, and
/// every step can end the request early with a [`BlobError`].
pub struct MediaProxy {
    resolver: MetadataResolver,
    fetcher: Arc<dyn ObjectFetcher>,
    config: ProxyConfig,
}

impl MediaProxy {
    pub fn new<S, F>(signer: S, fetcher: F, config: ProxyConfig) -> Self
    where
        S: SignedUrlStore + 'static,
        F: ObjectFetcher + 'static,
    {
        Self::from_shared(Arc::new(signer), Arc::new(fetcher), config)
    }

    /// Build from already shared collaborators, e.g. one store acting as both.
    pub fn from_shared(
        signer: Arc<dyn SignedUrlStore>,
        fetcher: Arc<dyn ObjectFetcher>,
        config: ProxyConfig,
    ) -> Self {
        Self {
            resolver: MetadataResolver::new(signer, Arc::clone(&fetcher), &config),
            fetcher,
            config,
        }
    }

    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    pub async fn resolve(&self, locator: &ObjectLocator) -> BlobResult<ResolvedObject> {
        self.resolver.resolve(locator).await
    }

    pub fn plan(&self, resolved: &ResolvedObject, range_header: Option<&str>) -> DeliveryPlan {
        let request = RangeRequest::parse(range_header, resolved.metadata.size);
        if request.is_malformed() {
            debug!(object = %resolved.locator, header = ?range_header, "malformed range, serving whole object");
        }
        DeliveryPlan::new(&resolved.metadata, request, self.config.chunk_size)
    }

    /// Fetch the planned bytes from the signed URL.
    pub async fn fetch(&self, resolved: &ResolvedObject, plan: DeliveryPlan) -> BlobResult<OpenedMedia> {
        if let DeliveryPlan::Unsatisfiable { total_size } = plan {
            return Err(BlobError::Unsatisfiable { total_size });
        }

        let upstream_range = plan.upstream_range();
        let fetched = self.fetcher.get(&resolved.signed_url, upstream_range).await?;
        let key = resolved.locator.to_string();

        if !fetched.is_success() {
            warn!(object = %key, status = fetched.status, "upstream fetch failed");
            return Err(BlobError::upstream(fetched.status, key));
        }

        // A 200 to a ranged request is only usable when the window starts at 0.
        if let Some(range) = upstream_range {
            if !fetched.is_partial() && range.start != 0 {
                warn!(object = %key, status = fetched.status, range = %range, "upstream ignored range");
                return Err(BlobError::upstream(fetched.status, key));
            }
        }

        let Some(body) = fetched.body else {
            warn!(object = %key, "upstream returned no body");
            return Err(BlobError::upstream(fetched.status, key));
        };

        Ok(OpenedMedia {
            body: bounded_stream(body, plan.content_length()),
            metadata: resolved.metadata.clone(),
            plan,
        })
    }

    /// Resolve, plan and fetch in one go.
    pub async fn open(&self, locator: &ObjectLocator, range_header: Option<&str>) -> BlobResult<OpenedMedia> {
        let resolved = self.resolve(locator).await?;
        let plan = self.plan(&resolved, range_header);
        self.fetch(&resolved, plan).await
    }
}
