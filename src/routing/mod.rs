//! Proxy routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → router.rs (rule lookup, longest prefix first)
//!     → matcher.rs (path prefix test)
//!     → Return: matched ProxyRule or pass-through
//!
//! Rule Compilation (at startup):
//!     [server.proxy] entries
//!     → validate target URL, headers
//!     → sort by prefix length
//!     → freeze as immutable ProxyRouter
//! ```
//!
//! # Design Decisions
//! - Rules compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same path always matches same rule

pub mod matcher;
pub mod router;

pub use router::{ProxyRouter, ProxyRule};
