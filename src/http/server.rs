//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create Axum Router with the dispatch handler
//! - Wire up middleware (tracing, request ID)
//! - Dispatch requests to a proxy rule or the pass-through handler
//! - Forward matched requests to their upstream
//!
//! # Per-request states
//! ```text
//! Received → PrefixMatched? ─ yes → Forward → UpstreamResponded → Relay
//!                           │                └ UpstreamFailed   → GatewayError (502/504)
//!                           └ no  → PassThrough (static root or 404)
//! ```

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceExt;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::DevConfig;
use crate::http::client::{UpstreamClients, UpstreamError};
use crate::http::request::build_upstream_request;
use crate::http::response::{gateway_error, relay};
use crate::http::X_REQUEST_ID;
use crate::observability::metrics;
use crate::routing::ProxyRule;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<DevConfig>,
    pub clients: Arc<UpstreamClients>,
    pub static_files: Option<ServeDir>,
}

/// Development HTTP server.
pub struct HttpServer {
    router: Router,
    config: Arc<DevConfig>,
}

impl HttpServer {
    /// Create a server for an assembled configuration.
    ///
    /// Fails only if an upstream client cannot be constructed.
    pub fn new(config: Arc<DevConfig>) -> Result<Self, reqwest::Error> {
        let clients = Arc::new(UpstreamClients::build(&config.proxy, &config.server)?);
        let static_files = config.server.static_root.as_ref().map(ServeDir::new);

        let state = AppState {
            config: config.clone(),
            clients,
            static_files,
        };

        Ok(Self {
            router: Self::build_router(state),
            config,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .fallback(dispatch)
            .with_state(state)
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
    }

    /// The fully layered router, for embedding or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            proxy_rules = self.config.proxy.rules().len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Route every request to its proxy rule or to pass-through.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    match state.config.proxy.match_request(&request) {
        Some((index, rule)) => {
            let client = state.clients.for_rule(index);
            proxy_request(client, rule, request).await
        }
        None => pass_through(&state, request).await,
    }
}

/// Forward one request and relay the answer.
///
/// The upstream call lives inside this future: if the client disconnects,
/// the server drops the future and the upstream request is aborted with it.
async fn proxy_request(
    client: &reqwest::Client,
    rule: &ProxyRule,
    request: Request<Body>,
) -> Response {
    let start_time = Instant::now();
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let (parts, body) = request.into_parts();
    let method = parts.method.to_string();
    let url = rule.forward_url(parts.uri.path(), parts.uri.query());
    let upstream = rule.upstream_authority();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %parts.uri.path(),
        upstream = %url,
        "Proxying request"
    );

    let result = build_upstream_request(client, rule, url, &parts, body, &request_id)
        .send()
        .await;

    match result {
        Ok(response) => {
            let status = response.status();
            tracing::debug!(request_id = %request_id, status = %status, "Upstream responded");
            metrics::record_request(&method, status.as_u16(), &upstream, start_time);
            relay(response)
        }
        Err(e) => {
            let error = UpstreamError::from(e);
            let response = gateway_error(&error);
            tracing::warn!(
                request_id = %request_id,
                upstream = %upstream,
                status = %response.status(),
                error = %error,
                "Upstream error"
            );
            metrics::record_request(&method, response.status().as_u16(), &upstream, start_time);
            response
        }
    }
}

/// Hand a request no rule claims to the static handler.
async fn pass_through(state: &AppState, request: Request<Body>) -> Response {
    metrics::record_passthrough(request.method().as_str());

    match &state.static_files {
        Some(files) => match files.clone().oneshot(request).await {
            Ok(response) => response.into_response(),
            Err(never) => match never {},
        },
        None => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}
