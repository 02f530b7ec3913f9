//! # CORS Module
//!
//! Gateway-level CORS settings.
//!
//! Callers either pass an explicit [`CorsConfig`] or set the
//! `allow_all_origins` flag. The explicit configuration always wins; the flag
//! only selects [`CorsConfig::permissive`] when nothing explicit is given.
//!
//! The same settings are rendered two ways:
//! - as the `x-amazon-apigateway-cors` extension on the document (body variant)
//! - as the `CorsConfiguration` property of the Api resource (routed variant)

use serde::Deserialize;
use serde_json::{json, Map, Value};

/// Cross-origin resource sharing settings for the whole gateway
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct CorsConfig {
    #[serde(default)]
    pub allow_origins: Vec<String>,
    #[serde(default)]
    pub allow_methods: Vec<String>,
    #[serde(default)]
    pub allow_headers: Vec<String>,
    #[serde(default)]
    pub expose_headers: Vec<String>,
    /// Preflight cache duration in seconds
    #[serde(default)]
    pub max_age: Option<u32>,
    #[serde(default)]
    pub allow_credentials: Option<bool>,
}

impl CorsConfig {
    /// Any origin, any method, any header
    pub fn permissive() -> Self {
        CorsConfig {
            allow_origins: vec!["*".into()],
            allow_methods: vec!["*".into()],
            allow_headers: vec!["*".into()],
            ..CorsConfig::default()
        }
    }

    /// Pick the effective configuration: explicit first, then the
    /// permissive default if `allow_all_origins` is set, else none.
    pub fn resolve(explicit: Option<&CorsConfig>, allow_all_origins: bool) -> Option<CorsConfig> {
        match explicit {
            Some(config) => Some(config.clone()),
            None if allow_all_origins => Some(CorsConfig::permissive()),
            None => None,
        }
    }

    /// Body of the `x-amazon-apigateway-cors` document extension
    pub fn to_extension(&self) -> Value {
        self.render([
            "allowOrigins",
            "allowMethods",
            "allowHeaders",
            "exposeHeaders",
            "maxAge",
            "allowCredentials",
        ])
    }

    /// Value of the Api resource's `CorsConfiguration` property
    pub fn to_resource_property(&self) -> Value {
        self.render([
            "AllowOrigins",
            "AllowMethods",
            "AllowHeaders",
            "ExposeHeaders",
            "MaxAge",
            "AllowCredentials",
        ])
    }

    fn render(&self, keys: [&str; 6]) -> Value {
        let mut out = Map::new();
        let lists = [
            &self.allow_origins,
            &self.allow_methods,
            &self.allow_headers,
            &self.expose_headers,
        ];
        for (key, list) in keys.iter().zip(lists) {
            if !list.is_empty() {
                out.insert(key.to_string(), json!(list));
            }
        }
        if let Some(max_age) = self.max_age {
            out.insert(keys[4].to_string(), json!(max_age));
        }
        if let Some(creds) = self.allow_credentials {
            out.insert(keys[5].to_string(), json!(creds));
        }
        Value::Object(out)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_wins_over_allow_all() {
        let explicit = CorsConfig {
            allow_origins: vec!["https://example.com".into()],
            ..CorsConfig::default()
        };
        let resolved = CorsConfig::resolve(Some(&explicit), true).unwrap();
        assert_eq!(resolved, explicit);
        assert_ne!(resolved, CorsConfig::permissive());
    }

    #[test]
    fn test_allow_all_uses_permissive() {
        assert_eq!(CorsConfig::resolve(None, true), Some(CorsConfig::permissive()));
        assert_eq!(CorsConfig::resolve(None, false), None);
    }

    #[test]
    fn test_render_both_casings() {
        let config = CorsConfig {
            allow_origins: vec!["https://a.test".into()],
            max_age: Some(600),
            allow_credentials: Some(true),
            ..CorsConfig::default()
        };
        assert_eq!(
            config.to_extension(),
            json!({ "allowOrigins": ["https://a.test"], "maxAge": 600, "allowCredentials": true })
        );
        assert_eq!(
            config.to_resource_property(),
            json!({ "AllowOrigins": ["https://a.test"], "MaxAge": 600, "AllowCredentials": true })
        );
    }
}
