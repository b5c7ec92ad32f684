use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{BlobError, BlobResult, ObjectLocator, SignedUrl, SignedUrlStore};

/// Supabase project settings
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://abc.supabase.co`
    pub url: String,
    /// Service role key; bypasses row-level security
    pub service_role_key: String,
}

impl SupabaseConfig {
    pub fn new<U: Into<String>, K: Into<String>>(url: U, service_role_key: K) -> Self {
        Self {
            url: url.into(),
            service_role_key: service_role_key.into(),
        }
    }
}

#[derive(Serialize)]
struct SignRequest {
    #[serde(rename = "expiresIn")]
    expires_in: u64,
}

#[derive(Deserialize)]
struct SignResponse {
    #[serde(rename = "signedURL")]
    signed_url: Option<String>,
}

/// Signs downloads through the Supabase Storage REST API
#[derive(Clone)]
pub struct SupabaseStorage {
    client: Client,
    storage_url: Url,
    service_role_key: String,
}

impl SupabaseStorage {
    pub fn new(config: SupabaseConfig) -> BlobResult<Self> {
        let client = Client::builder().build().map_err(BlobError::backend)?;
        Self::with_client(client, config)
    }

    pub fn with_client(client: Client, config: SupabaseConfig) -> BlobResult<Self> {
        let base = config.url.trim_end_matches('/');
        let storage_url = Url::parse(&format!("{}/storage/v1", base))
            .map_err(|e| BlobError::invalid(format!("invalid Supabase URL `{}`: {}", config.url, e)))?;

        Ok(Self {
            client,
            storage_url,
            service_role_key: config.service_role_key,
        })
    }

    /// `POST` target for signing one object.
    fn sign_endpoint(&self, locator: &ObjectLocator) -> BlobResult<Url> {
        let mut endpoint = self.storage_url.clone();
        endpoint
            .path_segments_mut()
            .map_err(|_| BlobError::invalid("Supabase URL cannot be a base"))?
            .pop_if_empty()
            .extend(["object", "sign", locator.bucket.as_str()])
            .extend(locator.path.split('/').filter(|s| !s.is_empty()));
        Ok(endpoint)
    }

    /// The API answers with a path relative to `/storage/v1`.
    fn absolute_signed_url(&self, relative: &str) -> BlobResult<String> {
        let joined = format!(
            "{}/{}",
            self.storage_url.as_str().trim_end_matches('/'),
            relative.trim_start_matches('/')
        );
        Url::parse(&joined)
            .map(|u| u.to_string())
            .map_err(|e| BlobError::invalid(format!("invalid signed URL: {}", e)))
    }
}

#[async_trait]
impl SignedUrlStore for SupabaseStorage {
    async fn sign_get(&self, locator: &ObjectLocator, expires_in_secs: u64) -> BlobResult<SignedUrl> {
        let endpoint = self.sign_endpoint(locator)?;

        let response = self
            .client
            .post(endpoint)
            .bearer_auth(&self.service_role_key)
            .header("apikey", &self.service_role_key)
            .json(&SignRequest {
                expires_in: expires_in_secs,
            })
            .send()
            .await
            .map_err(BlobError::backend)?;

        let status = response.status();
        if !status.is_success() {
            debug!(object = %locator, status = status.as_u16(), "Supabase refused to sign");
            return Err(BlobError::upstream(status.as_u16(), locator.to_string()));
        }

        let body: SignResponse = response.json().await.map_err(BlobError::backend)?;
        let relative = body
            .signed_url
            .filter(|s| !s.is_empty())
            .ok_or_else(|| BlobError::not_found(locator.to_string()))?;

        Ok(SignedUrl::new(self.absolute_signed_url(&relative)?, expires_in_secs))
    }
}
