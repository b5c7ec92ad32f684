use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, RANGE};
use reqwest::{Client, Response};

use crate::{BlobError, BlobResult, ByteRange, FetchedObject, ObjectFetcher, ObjectHead, SignedUrl};

/// Configuration for the upstream HTTP client
#[derive(Debug, Clone)]
pub struct HttpFetcherConfig {
    /// Connection establishment limit. Bodies are long-lived streams, so no
    /// total request timeout is applied.
    pub connect_timeout: Duration,
    pub user_agent: Option<String>,
}

impl Default for HttpFetcherConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            user_agent: None,
        }
    }
}

/// Fetches signed URLs over HTTP with reqwest
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> BlobResult<Self> {
        Self::with_config(HttpFetcherConfig::default())
    }

    pub fn with_config(config: HttpFetcherConfig) -> BlobResult<Self> {
        let user_agent = config
            .user_agent
            .unwrap_or_else(|| concat!("planner-blob/", env!("CARGO_PKG_VERSION")).to_string());

        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .user_agent(user_agent)
            .build()
            .map_err(BlobError::backend)?;

        Ok(Self { client })
    }

    /// Reuse an existing client (and its connection pool).
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn header_str(response: &Response, name: reqwest::header::HeaderName) -> Option<String> {
        response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim().to_string())
    }
}

#[async_trait]
impl ObjectFetcher for HttpFetcher {
    async fn head(&self, url: &SignedUrl) -> BlobResult<ObjectHead> {
        let response = self
            .client
            .head(url.as_str())
            .send()
            .await
            .map_err(BlobError::backend)?;

        // `Response::content_length` reports the (empty) HEAD body, so read
        // the header itself.
        let content_length = Self::header_str(&response, CONTENT_LENGTH).and_then(|v| v.parse().ok());
        let content_type = Self::header_str(&response, CONTENT_TYPE);

        Ok(ObjectHead {
            status: response.status().as_u16(),
            content_length,
            content_type,
        })
    }

    async fn get(&self, url: &SignedUrl, range: Option<ByteRange>) -> BlobResult<FetchedObject> {
        let mut request = self.client.get(url.as_str());
        if let Some(range) = range {
            request = request.header(RANGE, range.to_header_value());
        }

        let response = request.send().await.map_err(BlobError::backend)?;
        let status = response.status().as_u16();
        if !response.status().is_success() {
            return Ok(FetchedObject { status, body: None });
        }

        // Dropping this stream drops the connection, which aborts the transfer.
        let body = response
            .bytes_stream()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e));

        Ok(FetchedObject {
            status,
            body: Some(Box::pin(body)),
        })
    }
}
