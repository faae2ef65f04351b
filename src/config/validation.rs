//! Configuration validation and assembly.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Build the three rule tables from the raw config
//! - Gate development-only proxy behavior
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Runs before any listener is bound; a failed assembly serves nothing

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::alias::AliasTable;
use crate::config::schema::{RawConfig, TimeoutConfig};
use crate::config::DevConfig;
use crate::define::ConstantTable;
use crate::routing::{ProxyRouter, ProxyRule};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("define: '{0}' is not a valid substitution token")]
    InvalidIdentifier(String),

    #[error("define: '{0}' collides with a reserved word or global binding")]
    ReservedIdentifier(String),

    #[error("define: '{0}' is bound more than once")]
    DuplicateConstant(String),

    #[error("define: value of '{identifier}' has no JSON literal form ({reason})")]
    UnserializableLiteral { identifier: String, reason: String },

    #[error("resolve.alias: '{0}' is not a valid alias prefix")]
    InvalidAliasPrefix(String),

    #[error("resolve.alias: prefix '{0}' is declared more than once")]
    DuplicateAlias(String),

    #[error("server.proxy: path prefix '{0}' must start with '/'")]
    InvalidPathPrefix(String),

    #[error("server.proxy: path prefix '{0}' is declared more than once")]
    DuplicateProxyPrefix(String),

    #[error("server.proxy.\"{prefix}\": invalid target '{target}': {reason}")]
    InvalidProxyTarget {
        prefix: String,
        target: String,
        reason: String,
    },

    #[error("server.proxy.\"{prefix}\": invalid header '{name}'")]
    InvalidProxyHeader { prefix: String, name: String },

    #[error("server.proxy.\"{0}\": change_origin/secure=false require server.development = true")]
    InsecureRuleOutsideDevelopment(String),

    #[error("server.bind_address: '{0}' is not a socket address")]
    InvalidBindAddress(String),

    #[error("server.timeouts: {0} must be greater than zero")]
    InvalidTimeout(&'static str),
}

/// Development server settings after validation.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub development: bool,
    pub bind_address: SocketAddr,
    /// Absolute directory for pass-through requests.
    pub static_root: Option<PathBuf>,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

/// Assemble the immutable configuration from its raw form.
///
/// `config_dir` is the directory of the configuration file; alias targets
/// and the static root are resolved against it.
pub fn assemble(raw: &RawConfig, config_dir: &Path) -> Result<DevConfig, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let define = build_define(raw, &mut errors);
    let alias = build_alias(raw, config_dir, &mut errors);
    let server = build_server(raw, config_dir, &mut errors);
    let proxy = build_proxy(raw, &mut errors);

    match server {
        Some(server) if errors.is_empty() => Ok(DevConfig {
            define,
            alias,
            proxy,
            server,
            observability: raw.observability.clone(),
        }),
        _ => Err(errors),
    }
}

fn build_define(raw: &RawConfig, errors: &mut Vec<ValidationError>) -> ConstantTable {
    let mut table = ConstantTable::new();
    for (identifier, value) in &raw.define {
        let result = toml_to_json(value)
            .map_err(|reason| ValidationError::UnserializableLiteral {
                identifier: identifier.clone(),
                reason,
            })
            .and_then(|json| table.bind(identifier, json));
        if let Err(e) = result {
            errors.push(e);
        }
    }
    table
}

fn build_alias(raw: &RawConfig, config_dir: &Path, errors: &mut Vec<ValidationError>) -> AliasTable {
    let mut table = AliasTable::new(config_dir);
    for (prefix, target) in &raw.resolve.alias {
        if let Err(e) = table.register(prefix, target) {
            errors.push(e);
        }
    }
    table
}

fn build_server(
    raw: &RawConfig,
    config_dir: &Path,
    errors: &mut Vec<ValidationError>,
) -> Option<ServerSettings> {
    let server = &raw.server;
    let TimeoutConfig { connect_secs, request_secs } = server.timeouts;

    if connect_secs == 0 {
        errors.push(ValidationError::InvalidTimeout("connect_secs"));
    }
    if request_secs == 0 {
        errors.push(ValidationError::InvalidTimeout("request_secs"));
    }

    let bind_address = match server.bind_address.parse::<SocketAddr>() {
        Ok(addr) => addr,
        Err(_) => {
            errors.push(ValidationError::InvalidBindAddress(server.bind_address.clone()));
            return None;
        }
    };

    Some(ServerSettings {
        development: server.development,
        bind_address,
        static_root: server
            .static_root
            .as_ref()
            .map(|root| crate::alias::normalize(&config_dir.join(root))),
        connect_timeout: Duration::from_secs(connect_secs),
        request_timeout: Duration::from_secs(request_secs),
    })
}

fn build_proxy(raw: &RawConfig, errors: &mut Vec<ValidationError>) -> ProxyRouter {
    let mut rules = Vec::new();
    for (prefix, rule) in &raw.server.proxy {
        let compiled = ProxyRule::from_config(prefix, rule);
        if (rule.change_origin || !rule.secure) && !raw.server.development {
            errors.push(ValidationError::InsecureRuleOutsideDevelopment(prefix.clone()));
        }
        match compiled {
            Ok(rule) => rules.push(rule),
            Err(e) => errors.push(e),
        }
    }

    match ProxyRouter::new(rules) {
        Ok(router) => router,
        Err(e) => {
            errors.push(e);
            ProxyRouter::default()
        }
    }
}

/// Convert a TOML value into the JSON value it stands for.
fn toml_to_json(value: &toml::Value) -> Result<serde_json::Value, String> {
    use serde_json::Value as Json;

    Ok(match value {
        toml::Value::String(s) => Json::String(s.clone()),
        toml::Value::Integer(i) => Json::from(*i),
        toml::Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(Json::Number)
            .ok_or_else(|| format!("non-finite number {f}"))?,
        toml::Value::Boolean(b) => Json::Bool(*b),
        toml::Value::Datetime(dt) => return Err(format!("datetime {dt}")),
        toml::Value::Array(items) => {
            Json::Array(items.iter().map(toml_to_json).collect::<Result<_, _>>()?)
        }
        toml::Value::Table(table) => Json::Object(
            table
                .iter()
                .map(|(k, v)| toml_to_json(v).map(|v| (k.clone(), v)))
                .collect::<Result<_, _>>()?,
        ),
    })
}
