//! Startup orchestration.
//!
//! # Order
//! 1. Configuration is already assembled (any error aborted before here)
//! 2. Metrics exporter, if enabled
//! 3. Upstream clients (inside `HttpServer::new`)
//! 4. Listener bound last, so traffic only arrives when ready

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::DevConfig;
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;

/// Run the dev server until a shutdown signal arrives.
///
/// `bind_override` replaces `server.bind_address` when given.
pub async fn serve(
    config: Arc<DevConfig>,
    bind_override: Option<SocketAddr>,
) -> Result<(), Box<dyn std::error::Error>> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    for rule in config.proxy.rules() {
        if rule.change_origin() || !rule.secure() {
            tracing::warn!(
                prefix = %rule.path_prefix(),
                "Development-only proxy rule active; never expose this server publicly"
            );
        }
    }

    let server = HttpServer::new(config.clone())?;

    let addr = bind_override.unwrap_or(config.server.bind_address);
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::shutdown_requested().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;
    Ok(())
}
