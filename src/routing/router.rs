//! Proxy rule lookup.
//!
//! # Responsibilities
//! - Store compiled proxy rules
//! - Look up the rule governing a request path
//! - Compute the upstream URL for a matched request
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Longest prefix wins; declaration order never matters
//! - Explicit no-match (`None`) means pass-through, never a default upstream

use axum::body::Body;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Request};
use url::Url;

use crate::config::{ProxyRuleConfig, ValidationError};
use crate::routing::matcher::{Matcher, PathPrefixMatcher};

/// A validated `server.proxy` entry.
#[derive(Debug, Clone)]
pub struct ProxyRule {
    matcher: PathPrefixMatcher,
    upstream: Url,
    change_origin: bool,
    secure: bool,
    rewrite: Option<String>,
    headers: HeaderMap,
}

impl ProxyRule {
    /// Validate one rule declaration.
    pub fn from_config(prefix: &str, config: &ProxyRuleConfig) -> Result<Self, ValidationError> {
        if !prefix.starts_with('/') {
            return Err(ValidationError::InvalidPathPrefix(prefix.to_string()));
        }

        let invalid_target = |reason: &str| ValidationError::InvalidProxyTarget {
            prefix: prefix.to_string(),
            target: config.target.clone(),
            reason: reason.to_string(),
        };

        let upstream = Url::parse(&config.target).map_err(|e| invalid_target(&e.to_string()))?;
        if !matches!(upstream.scheme(), "http" | "https") {
            return Err(invalid_target("scheme must be http or https"));
        }
        if upstream.host_str().is_none() {
            return Err(invalid_target("missing host"));
        }
        if upstream.query().is_some() || upstream.fragment().is_some() {
            return Err(invalid_target("query and fragment are not allowed"));
        }

        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let invalid_header = || ValidationError::InvalidProxyHeader {
                prefix: prefix.to_string(),
                name: name.clone(),
            };
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid_header())?;
            let value = HeaderValue::from_str(value).map_err(|_| invalid_header())?;
            headers.insert(name, value);
        }

        Ok(Self {
            matcher: PathPrefixMatcher::new(prefix),
            upstream,
            change_origin: config.change_origin,
            secure: config.secure,
            rewrite: config.rewrite.clone(),
            headers,
        })
    }

    pub fn path_prefix(&self) -> &str {
        self.matcher.prefix()
    }

    pub fn upstream(&self) -> &Url {
        &self.upstream
    }

    pub fn change_origin(&self) -> bool {
        self.change_origin
    }

    pub fn secure(&self) -> bool {
        self.secure
    }

    /// Extra headers to set on forwarded requests.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// `host[:port]` of the upstream, as sent in a rewritten `Host` header.
    pub fn upstream_authority(&self) -> String {
        let host = self.upstream.host_str().unwrap_or_default();
        match self.upstream.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        }
    }

    /// Upstream URL for a request path and optional query.
    ///
    /// The upstream's own base path is prepended; `rewrite`, when set,
    /// replaces the matched prefix first.
    pub fn forward_url(&self, path: &str, query: Option<&str>) -> Url {
        let path = match (&self.rewrite, path.strip_prefix(self.path_prefix())) {
            (Some(replacement), Some(rest)) => format!("{replacement}{rest}"),
            _ => path.to_string(),
        };

        let base = self.upstream.path().trim_end_matches('/');
        let joined = if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        };

        let mut url = self.upstream.clone();
        url.set_path(&joined);
        url.set_query(query);
        url
    }
}

/// Compiled proxy rules, longest prefix first.
#[derive(Debug, Clone, Default)]
pub struct ProxyRouter {
    rules: Vec<ProxyRule>,
}

impl ProxyRouter {
    /// Compile rules; identical prefixes are rejected.
    pub fn new(mut rules: Vec<ProxyRule>) -> Result<Self, ValidationError> {
        rules.sort_by(|a, b| {
            b.path_prefix()
                .len()
                .cmp(&a.path_prefix().len())
                .then_with(|| a.path_prefix().cmp(b.path_prefix()))
        });

        if let Some(dup) = rules
            .windows(2)
            .find(|pair| pair[0].path_prefix() == pair[1].path_prefix())
        {
            return Err(ValidationError::DuplicateProxyPrefix(
                dup[0].path_prefix().to_string(),
            ));
        }

        for rule in &rules {
            tracing::debug!(
                prefix = %rule.path_prefix(),
                upstream = %rule.upstream(),
                change_origin = rule.change_origin(),
                secure = rule.secure(),
                "Proxy rule compiled"
            );
        }

        Ok(Self { rules })
    }

    /// The rule governing `path`, if any.
    pub fn match_path(&self, path: &str) -> Option<&ProxyRule> {
        self.rules.iter().find(|rule| rule.matcher.matches_path(path))
    }

    /// The rule governing a request, with its position in [`ProxyRouter::rules`].
    pub fn match_request(&self, req: &Request<Body>) -> Option<(usize, &ProxyRule)> {
        self.rules
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.matcher.matches(req))
    }

    pub fn rules(&self) -> &[ProxyRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
