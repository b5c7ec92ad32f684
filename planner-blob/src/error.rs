use thiserror::Error;

/// Result type for media operations
pub type BlobResult<T> = Result<T, BlobError>;

/// Errors that can occur while resolving or fetching media
#[derive(Error, Debug)]
pub enum BlobError {
    /// The object could not be signed or probed.
    #[error("Object not found: {key}")]
    NotFound { key: String },

    /// The probe succeeded but reported no usable size.
    #[error("Unable to determine size of {key}")]
    SizeUnknown { key: String },

    #[error("Range not satisfiable for object of {total_size} bytes")]
    Unsatisfiable { total_size: u64 },

    /// The store answered a content request with an unexpected status.
    #[error("Upstream returned status {status} for {key}")]
    Upstream { status: u16, key: String },

    #[error("Invalid request: {message}")]
    Invalid { message: String },

    #[error("Storage backend error: {source}")]
    Backend {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl BlobError {
    /// Create a backend error from any error type
    pub fn backend<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend {
            source: Box::new(error),
        }
    }

    pub fn invalid<S: Into<String>>(message: S) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    pub fn not_found<S: Into<String>>(key: S) -> Self {
        Self::NotFound { key: key.into() }
    }

    pub fn size_unknown<S: Into<String>>(key: S) -> Self {
        Self::SizeUnknown { key: key.into() }
    }

    pub fn upstream<S: Into<String>>(status: u16, key: S) -> Self {
        Self::Upstream {
            status,
            key: key.into(),
        }
    }
}
