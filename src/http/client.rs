//! Upstream HTTP clients.
//!
//! Each proxy rule owns a dedicated `reqwest::Client`, so disabling
//! certificate checks for one rule can never affect another rule or any
//! other outbound call.

use thiserror::Error;

use crate::config::ServerSettings;
use crate::routing::{ProxyRouter, ProxyRule};

/// Per-request failure talking to an upstream.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("upstream connection failed: {0}")]
    Connect(#[source] reqwest::Error),

    #[error("upstream request failed: {0}")]
    Transport(#[source] reqwest::Error),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            UpstreamError::Timeout(e)
        } else if e.is_connect() {
            UpstreamError::Connect(e)
        } else {
            UpstreamError::Transport(e)
        }
    }
}

/// Clients in the same order as the router's rules.
#[derive(Debug, Clone, Default)]
pub struct UpstreamClients {
    clients: Vec<reqwest::Client>,
}

impl UpstreamClients {
    /// Build one client per rule.
    pub fn build(router: &ProxyRouter, settings: &ServerSettings) -> Result<Self, reqwest::Error> {
        let clients = router
            .rules()
            .iter()
            .map(|rule| build_client(rule, settings))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { clients })
    }

    /// The client for the rule at `index` in the router these clients were
    /// built from.
    pub fn for_rule(&self, index: usize) -> &reqwest::Client {
        &self.clients[index]
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

fn build_client(rule: &ProxyRule, settings: &ServerSettings) -> Result<reqwest::Client, reqwest::Error> {
    if !rule.secure() {
        tracing::warn!(
            prefix = %rule.path_prefix(),
            upstream = %rule.upstream(),
            "TLS certificate verification disabled for this proxy rule"
        );
    }

    reqwest::Client::builder()
        .connect_timeout(settings.connect_timeout)
        .timeout(settings.request_timeout)
        .danger_accept_invalid_certs(!rule.secure())
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_str;
    use std::path::Path;

    #[test]
    fn builds_one_client_per_rule() {
        let config = load_str(
            r#"
            [server]
            development = true

            [server.proxy."/api"]
            target = "http://general:5000"

            [server.proxy."/api/auth"]
            target = "https://auth:6000"
            secure = false
            "#,
            Path::new("/"),
        )
        .unwrap();

        let clients = UpstreamClients::build(&config.proxy, &config.server).unwrap();
        assert_eq!(clients.len(), config.proxy.rules().len());
        assert!(!clients.is_empty());
    }
}
