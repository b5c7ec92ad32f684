/// Configuration for the media proxy
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Largest window served for a single range request
    pub chunk_size: u64,

    /// Validity of each signed URL, in seconds
    pub signed_url_ttl_secs: u64,

    /// MIME type used when the store reports none
    pub default_content_type: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1_000_000,     // 1MB
            signed_url_ttl_secs: 3600, // 1 hour
            default_content_type: crate::types::DEFAULT_CONTENT_TYPE.to_string(),
        }
    }
}

impl ProxyConfig {
    /// Create a new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the range chunk cap (values below one byte are raised to one)
    pub fn with_chunk_size(mut self, bytes: u64) -> Self {
        self.chunk_size = bytes.max(1);
        self
    }

    /// Set the signed URL lifetime
    pub fn with_signed_url_ttl(mut self, secs: u64) -> Self {
        self.signed_url_ttl_secs = secs;
        self
    }

    pub fn with_default_content_type<S: Into<String>>(mut self, content_type: S) -> Self {
        self.default_content_type = content_type.into();
        self
    }
}
