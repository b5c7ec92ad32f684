//! Turning resolved metadata plus a range request into what gets sent.

use futures::StreamExt;

use crate::{unsatisfied_content_range, ByteRange, ByteStream, ObjectMetadata, RangeRequest};

/// How a request will be answered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryPlan {
    /// 200 with the whole object
    Full { metadata: ObjectMetadata },
    /// 206 with a chunk-capped window
    Partial {
        range: ByteRange,
        metadata: ObjectMetadata,
    },
    /// 416, nothing is fetched
    Unsatisfiable { total_size: u64 },
}

impl DeliveryPlan {
    /// Decide the response shape. Malformed range headers are served as
    /// whole-object requests.
    pub fn new(metadata: &ObjectMetadata, request: RangeRequest, chunk_size: u64) -> Self {
        match request.range() {
            None => DeliveryPlan::Full {
                metadata: metadata.clone(),
            },
            Some(range) if !range.is_satisfiable(metadata.size) => DeliveryPlan::Unsatisfiable {
                total_size: metadata.size,
            },
            Some(range) => DeliveryPlan::Partial {
                range: range.capped(chunk_size),
                metadata: metadata.clone(),
            },
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            DeliveryPlan::Full { .. } => 200,
            DeliveryPlan::Partial { .. } => 206,
            DeliveryPlan::Unsatisfiable { .. } => 416,
        }
    }

    /// Bytes the response body will carry.
    pub fn content_length(&self) -> u64 {
        match self {
            DeliveryPlan::Full { metadata } => metadata.size,
            DeliveryPlan::Partial { range, .. } => range.len(),
            DeliveryPlan::Unsatisfiable { .. } => 0,
        }
    }

    /// `Content-Range` for partial and unsatisfiable answers.
    pub fn content_range(&self) -> Option<String> {
        match self {
            DeliveryPlan::Partial { range, metadata } => Some(range.content_range(metadata.size)),
            DeliveryPlan::Unsatisfiable { total_size } => Some(unsatisfied_content_range(*total_size)),
            DeliveryPlan::Full { .. } => None,
        }
    }

    /// Range to request upstream; `None` fetches the whole object.
    pub fn upstream_range(&self) -> Option<ByteRange> {
        match self {
            DeliveryPlan::Partial { range, .. } => Some(*range),
            _ => None,
        }
    }
}

/// Pass through at most `limit` bytes of `inner`, then drop it.
///
/// Ending short of `limit` is reported as `UnexpectedEof`, since the
/// response headers have already promised `limit` bytes.
pub fn bounded_stream(mut inner: ByteStream, limit: u64) -> ByteStream {
    let stream = async_stream::stream! {
        let mut remaining = limit;
        while remaining > 0 {
            match inner.next().await {
                Some(Ok(mut chunk)) => {
                    if chunk.len() as u64 > remaining {
                        chunk.truncate(remaining as usize);
                    }
                    remaining -= chunk.len() as u64;
                    if !chunk.is_empty() {
                        yield Ok(chunk);
                    }
                }
                Some(Err(e)) => {
                    yield Err(e);
                    return;
                }
                None => {
                    yield Err(std::io::Error::new(
                        std::io::ErrorKind::UnexpectedEof,
                        format!("upstream body ended {} bytes early", remaining),
                    ));
                    return;
                }
            }
        }
    };
    Box::pin(stream)
}
