//! Configuration schema definitions.
//!
//! These are the raw, deserialized shapes of `devproxy.toml`. Nothing here
//! is validated beyond what serde checks; `validation.rs` turns a
//! `RawConfig` into the immutable `DevConfig`.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

/// Root of the configuration file.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawConfig {
    /// Compile-time constants: identifier → literal value.
    pub define: BTreeMap<String, toml::Value>,

    /// Module resolution settings.
    pub resolve: ResolveConfig,

    /// Development server settings, including proxy rules.
    pub server: ServerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Module resolution settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ResolveConfig {
    /// Alias prefix → directory, relative to the configuration file.
    pub alias: BTreeMap<String, PathBuf>,
}

/// Development server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Must be set explicitly before origin rewriting or unverified TLS
    /// is accepted on any proxy rule.
    pub development: bool,

    /// Bind address (e.g., "127.0.0.1:5173").
    pub bind_address: String,

    /// Directory served for requests no proxy rule claims.
    pub static_root: Option<PathBuf>,

    /// Upstream timeouts.
    pub timeouts: TimeoutConfig,

    /// Path prefix → proxy rule.
    pub proxy: BTreeMap<String, ProxyRuleConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            development: false,
            bind_address: "127.0.0.1:5173".to_string(),
            static_root: None,
            timeouts: TimeoutConfig::default(),
            proxy: BTreeMap::new(),
        }
    }
}

/// A single `server.proxy` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ProxyRuleConfig {
    /// Upstream origin (e.g., "http://10.3.0.182:5000").
    pub target: String,

    /// Rewrite `Host`/`Origin` to the upstream's own origin.
    #[serde(default, alias = "changeOrigin")]
    pub change_origin: bool,

    /// Verify the upstream's TLS certificate.
    #[serde(default = "default_secure")]
    pub secure: bool,

    /// Replacement for the matched prefix before forwarding.
    #[serde(default)]
    pub rewrite: Option<String>,

    /// Extra headers sent with every forwarded request.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

fn default_secure() -> bool {
    true
}

/// Timeout configuration for upstream calls.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Total time for one upstream request/response in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bundler_style_keys() {
        let raw: RawConfig = toml::from_str(
            r#"
            [define]
            __APP_VERSION__ = "0.1.1"

            [resolve.alias]
            "@" = "./src"

            [server.proxy."/api"]
            target = "http://10.3.0.182:5000"
            changeOrigin = true
            secure = false
            "#,
        )
        .unwrap();

        assert_eq!(raw.define.len(), 1);
        assert_eq!(raw.resolve.alias["@"], PathBuf::from("./src"));
        let rule = &raw.server.proxy["/api"];
        assert!(rule.change_origin);
        assert!(!rule.secure);
        assert!(rule.rewrite.is_none());
    }

    #[test]
    fn defaults_are_strict() {
        let raw: RawConfig = toml::from_str(
            r#"
            [server.proxy."/api"]
            target = "http://localhost:5000"
            "#,
        )
        .unwrap();

        assert!(!raw.server.development);
        assert_eq!(raw.server.timeouts.request_secs, 30);
        let rule = &raw.server.proxy["/api"];
        assert!(!rule.change_origin);
        assert!(rule.secure);
    }
}
