//! # planner-blob: range-aware media delivery
//!
//! `planner-blob` serves drill videos and images that live in a remote object
//! store which hands out signed, time-limited URLs. It knows nothing about
//! HTTP servers; the web layer asks it for an [`OpenedMedia`] and writes that
//! out.
//!
//! ## Flow
//!
//! ```text
//! ObjectLocator ──sign──▶ SignedUrl ──HEAD──▶ ObjectMetadata
//!                                                  │
//!                     Range header ──parse──▶ RangeRequest
//!                                                  │
//!                                            DeliveryPlan ──GET──▶ ByteStream
//! ```
//!
//! - **Range parsing** ([`RangeRequest::parse`]) is pure and total: a missing
//!   header asks for the whole object, an unreadable one is served the same way.
//! - **Validation** ([`ByteRange::is_satisfiable`]) rejects windows outside
//!   the object before anything is fetched.
//! - **Chunk capping** ([`ByteRange::capped`]) bounds each partial response
//!   so players scrub with many small requests.
//! - **Streaming** hands back the upstream body as a [`ByteStream`] bounded to
//!   the advertised length; dropping it aborts the upstream transfer.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use planner_blob::{MediaProxy, MemoryStore, ObjectLocator, ProxyConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> planner_blob::BlobResult<()> {
//! let store = Arc::new(MemoryStore::new());
//! store.insert("drills", "warmup.mp4", "video/mp4", vec![0u8; 4096]);
//!
//! let proxy = MediaProxy::from_shared(store.clone(), store, ProxyConfig::default());
//! let media = proxy
//!     .open(&ObjectLocator::new("drills", "warmup.mp4"), Some("bytes=0-1023"))
//!     .await?;
//!
//! assert_eq!(media.status_code(), 206);
//! assert_eq!(media.content_range().as_deref(), Some("bytes 0-1023/4096"));
//! # Ok(())
//! # }
//! ```

mod config;
pub mod delivery;
mod error;
mod http;
pub mod media;
mod memory;
mod proxy;
pub mod range;
mod resolver;
pub mod store;
mod supabase;
mod types;

pub use config::ProxyConfig;
pub use delivery::{bounded_stream, DeliveryPlan};
pub use error::{BlobError, BlobResult};
pub use http::{HttpFetcher, HttpFetcherConfig};
pub use media::MediaType;
pub use memory::MemoryStore;
pub use proxy::{MediaProxy, OpenedMedia};
pub use range::{unsatisfied_content_range, ByteRange, RangeRequest};
pub use resolver::{MetadataResolver, ResolvedObject};
pub use store::{FetchedObject, ObjectFetcher, ObjectHead, SignedUrlStore};
pub use supabase::{SupabaseConfig, SupabaseStorage};
pub use types::{ByteStream, ObjectLocator, ObjectMetadata, SignedUrl, DEFAULT_CONTENT_TYPE};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        BlobError, BlobResult, ByteRange, MediaProxy, ObjectFetcher, ObjectLocator, OpenedMedia,
        ProxyConfig, RangeRequest, SignedUrlStore,
    };
}
