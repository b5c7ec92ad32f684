use std::time::Duration;

use planner_blob::media::{proxy_media_url, DEFAULT_MEDIA_MOUNT};
use planner_blob::{HttpFetcherConfig, ProxyConfig};
use planner_core::PlannerConfigSnapshot;

/// HTTP-facing settings, read from the dotted configuration keys
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Browser origin allowed by CORS
    pub frontend_url: String,
    /// Where the media proxy is nested
    pub media_mount: String,
    pub proxy: ProxyConfig,
    pub connect_timeout: Duration,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            frontend_url: "http://localhost:5173".to_string(),
            media_mount: DEFAULT_MEDIA_MOUNT.to_string(),
            proxy: ProxyConfig::default(),
            connect_timeout: HttpFetcherConfig::default().connect_timeout,
        }
    }
}

impl ServerSettings {
    /// Overlay configured values onto the defaults.
    pub fn from_config(config: &PlannerConfigSnapshot) -> Self {
        let defaults = Self::default();

        let mut proxy = defaults.proxy.clone();
        if let Some(chunk) = config.get_u64("media.chunk_size") {
            proxy = proxy.with_chunk_size(chunk);
        }
        if let Some(ttl) = config.get_u64("media.signed_url_ttl") {
            proxy = proxy.with_signed_url_ttl(ttl);
        }

        let media_mount = config
            .get_string("media.mount")
            .map(|m| normalize_mount(&m))
            .unwrap_or(defaults.media_mount);

        Self {
            host: config.get_string("http.host").unwrap_or(defaults.host),
            port: config.get_u16("http.port").unwrap_or(defaults.port),
            frontend_url: config.get_string("frontend.url").unwrap_or(defaults.frontend_url),
            media_mount,
            proxy,
            connect_timeout: config
                .get_u64("http.connect_timeout_secs")
                .map(Duration::from_secs)
                .unwrap_or(defaults.connect_timeout),
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Public URL of `bucket/path` behind this server's media mount.
    pub fn media_url(&self, api_base: &str, bucket: &str, path: &str) -> String {
        proxy_media_url(api_base, &self.media_mount, bucket, path)
    }

    pub fn fetcher_config(&self) -> HttpFetcherConfig {
        HttpFetcherConfig {
            connect_timeout: self.connect_timeout,
            ..HttpFetcherConfig::default()
        }
    }
}

fn normalize_mount(mount: &str) -> String {
    let trimmed = mount.trim().trim_matches('/');
    if trimmed.is_empty() {
        DEFAULT_MEDIA_MOUNT.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planner_core::PlannerConfig;

    #[test]
    fn defaults_without_configuration() {
        let settings = ServerSettings::from_config(&PlannerConfig::new().snapshot());
        assert_eq!(settings.addr(), "127.0.0.1:3000");
        assert_eq!(settings.media_mount, "/api/media");
        assert_eq!(settings.proxy.chunk_size, 1_000_000);
        assert_eq!(settings.proxy.signed_url_ttl_secs, 3600);
    }

    #[test]
    fn configured_values_override_defaults() {
        let config = PlannerConfig::from_vars([
            ("HTTP_HOST", "0.0.0.0"),
            ("HTTP_PORT", "8080"),
            ("FRONTEND_URL", "https://planner.example.com"),
            ("PLANNER__MEDIA__CHUNK_SIZE", "524288"),
            ("PLANNER__MEDIA__MOUNT", "media/"),
            ("PLANNER__HTTP__CONNECT_TIMEOUT_SECS", "3"),
        ]);

        let settings = ServerSettings::from_config(&config.snapshot());
        assert_eq!(settings.addr(), "0.0.0.0:8080");
        assert_eq!(settings.frontend_url, "https://planner.example.com");
        assert_eq!(settings.proxy.chunk_size, 524_288);
        assert_eq!(settings.media_mount, "/media");
        assert_eq!(settings.fetcher_config().connect_timeout, Duration::from_secs(3));
        assert_eq!(
            settings.media_url("https://planner.example.com", "drills", "a/clip.mp4"),
            "https://planner.example.com/media/drills/a/clip.mp4"
        );
    }
}
