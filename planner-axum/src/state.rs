use std::sync::Arc;

use planner_blob::MediaProxy;

/// Shared, read-only state behind the media routes
pub struct MediaState {
    pub proxy: Arc<MediaProxy>,
}

impl Clone for MediaState {
    fn clone(&self) -> Self {
        Self {
            proxy: Arc::clone(&self.proxy),
        }
    }
}

impl MediaState {
    pub fn new(proxy: MediaProxy) -> Self {
        Self {
            proxy: Arc::new(proxy),
        }
    }

    pub fn from_shared(proxy: Arc<MediaProxy>) -> Self {
        Self { proxy }
    }
}
