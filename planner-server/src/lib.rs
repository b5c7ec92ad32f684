use std::sync::Arc;

use planner_axum::{PlannerApp, ServerSettings};
use planner_blob::{HttpFetcher, MediaProxy, SupabaseConfig, SupabaseStorage};
use planner_core::PlannerConfigSnapshot;
use tracing::info;

/// Wire the Supabase-backed media proxy into the HTTP app.
pub fn build(config: &PlannerConfigSnapshot) -> anyhow::Result<PlannerApp> {
    let settings = ServerSettings::from_config(config);

    let supabase = SupabaseConfig::new(
        config.require("supabase.url")?,
        config.require("supabase.service_role_key")?,
    );
    let signer = SupabaseStorage::new(supabase)?;
    let fetcher = HttpFetcher::with_config(settings.fetcher_config())?;

    info!(
        mount = %settings.media_mount,
        chunk_size = settings.proxy.chunk_size,
        ttl = settings.proxy.signed_url_ttl_secs,
        "media proxy configured"
    );

    let proxy = MediaProxy::new(signer, fetcher, settings.proxy.clone());
    Ok(PlannerApp::new(settings).use_media(Arc::new(proxy)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use planner_core::PlannerConfig;

    #[test]
    fn build_requires_supabase_credentials() {
        let config = PlannerConfig::from_vars([("SUPABASE_URL", "https://abc.supabase.co")]);
        let err = build(&config.snapshot()).err().unwrap();
        assert!(err.to_string().contains("supabase.service_role_key"));
    }

    #[test]
    fn build_with_credentials_uses_configured_mount() {
        let config = PlannerConfig::from_vars([
            ("SUPABASE_URL", "https://abc.supabase.co"),
            ("SUPABASE_SERVICE_ROLE_KEY", "service-key"),
            ("PLANNER__MEDIA__MOUNT", "/media"),
        ]);
        let app = build(&config.snapshot()).unwrap();
        assert_eq!(app.settings.media_mount, "/media");
    }
}
