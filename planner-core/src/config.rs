//! # Planner Configuration
//!
//! A minimal string key/value store with dotted keys, in the spirit of
//! `app.set()` / `app.get()`:
//!
//! ```rust
//! use planner_core::PlannerConfig;
//! let mut config = PlannerConfig::new();
//!
//! config.set("media.chunk_size", "1000000");
//! assert_eq!(config.get("media.chunk_size"), Some("1000000"));
//! ```
//!
//! ## Environment
//! [`PlannerConfig::from_env`] maps the deployment variables the backend has
//! always used to dotted keys:
//!
//! | variable                    | key                          |
//! |-----------------------------|------------------------------|
//! | `HTTP_HOST`                 | `http.host`                  |
//! | `HTTP_PORT` / `PORT`        | `http.port`                  |
//! | `FRONTEND_URL`              | `frontend.url`               |
//! | `SUPABASE_URL`              | `supabase.url`               |
//! | `SUPABASE_SERVICE_ROLE_KEY` | `supabase.service_role_key`  |
//!
//! Anything else can be overridden with the `PLANNER__` prefix, where `__`
//! separates key segments:
//!
//! ```bash
//! export PLANNER__MEDIA__CHUNK_SIZE=2000000   # media.chunk_size
//! ```

use std::collections::HashMap;

/// Prefix for generic overrides (`PLANNER__A__B` → `a.b`).
pub const ENV_PREFIX: &str = "PLANNER__";

const WELL_KNOWN_VARS: &[(&str, &str)] = &[
    ("HTTP_HOST", "http.host"),
    ("PORT", "http.port"),
    ("HTTP_PORT", "http.port"),
    ("FRONTEND_URL", "frontend.url"),
    ("SUPABASE_URL", "supabase.url"),
    ("SUPABASE_SERVICE_ROLE_KEY", "supabase.service_role_key"),
];

#[derive(Debug, Default, Clone)]
pub struct PlannerConfig {
    values: HashMap<String, String>,
}

impl PlannerConfig {
    /// Create an empty config store.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Build a config from the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Build a config from arbitrary `(name, value)` pairs.
    ///
    /// Well-known names are applied first so that a `PLANNER__` override
    /// for the same key always wins.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let vars: Vec<(String, String)> = vars
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_string(), v.into()))
            .collect();

        let mut config = Self::new();

        for (name, key) in WELL_KNOWN_VARS {
            if let Some((_, value)) = vars.iter().find(|(k, _)| k == name) {
                config.set(*key, value.clone());
            }
        }

        for (name, value) in &vars {
            if let Some(stripped) = name.strip_prefix(ENV_PREFIX) {
                let normalized = stripped.to_lowercase().replace("__", ".");
                if !normalized.is_empty() {
                    config.set(normalized, value.clone());
                }
            }
        }

        config
    }

    /// Set a configuration key to a string value.
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.values.insert(key.into(), value.into());
    }

    /// Get a configuration value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn snapshot(&self) -> PlannerConfigSnapshot {
        PlannerConfigSnapshot::new(self.values.clone())
    }
}

/// Read-only view with typed getters.
#[derive(Debug, Clone, Default)]
pub struct PlannerConfigSnapshot {
    map: HashMap<String, String>,
}

impl PlannerConfigSnapshot {
    pub(crate) fn new(map: HashMap<String, String>) -> Self {
        Self { map }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(|s| s.as_str())
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.trim().parse::<u64>().ok())
    }

    pub fn get_u16(&self, key: &str) -> Option<u16> {
        self.get(key).and_then(|v| v.trim().parse::<u16>().ok())
    }

    /// Value for `key`, or an error naming the missing key.
    pub fn require(&self, key: &str) -> anyhow::Result<&str> {
        self.get(key)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| anyhow::anyhow!("missing required configuration `{key}`"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_known_variables_map_to_dotted_keys() {
        let config = PlannerConfig::from_vars([
            ("SUPABASE_URL", "https://abc.supabase.co"),
            ("SUPABASE_SERVICE_ROLE_KEY", "service-key"),
            ("HTTP_PORT", "3000"),
            ("UNRELATED", "ignored"),
        ]);

        assert_eq!(config.get("supabase.url"), Some("https://abc.supabase.co"));
        assert_eq!(config.get("supabase.service_role_key"), Some("service-key"));
        assert_eq!(config.get("http.port"), Some("3000"));
        assert!(!config.has("unrelated"));
    }

    #[test]
    fn prefixed_overrides_win() {
        let config = PlannerConfig::from_vars([
            ("HTTP_PORT", "3000"),
            ("PLANNER__HTTP__PORT", "4000"),
            ("PLANNER__MEDIA__CHUNK_SIZE", "2000000"),
        ]);

        let snap = config.snapshot();
        assert_eq!(snap.get_u16("http.port"), Some(4000));
        assert_eq!(snap.get_u64("media.chunk_size"), Some(2_000_000));
    }

    #[test]
    fn require_reports_missing_and_empty_keys() {
        let mut config = PlannerConfig::new();
        config.set("supabase.url", "");

        let snap = config.snapshot();
        let err = snap.require("supabase.url").unwrap_err();
        assert!(err.to_string().contains("supabase.url"));
        assert!(snap.require("supabase.service_role_key").is_err());
    }

    #[test]
    fn typed_getters_reject_garbage() {
        let mut config = PlannerConfig::new();
        config.set("media.chunk_size", "lots");
        config.set("http.port", "70000");

        let snap = config.snapshot();
        assert_eq!(snap.get_u64("media.chunk_size"), None);
        assert_eq!(snap.get_u16("http.port"), None);
    }
}
