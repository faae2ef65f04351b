//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing)
//!     → routing (proxy rule or pass-through)
//!     → request.rs (rewrite headers, stream body)
//!     → client.rs (per-rule upstream client)
//!     → response.rs (relay, or 502/504)
//!     → Send to client
//! ```

pub mod client;
pub mod request;
pub mod response;
pub mod server;

use axum::http::HeaderName;

/// Correlation header set on every request and response.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

pub use client::{UpstreamClients, UpstreamError};
pub use server::HttpServer;
