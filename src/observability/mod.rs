//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Config assembly and the proxy handler produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Developer console (stdout)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every log line of a proxied request
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
