//! Development server and build configuration engine.
//!
//! One TOML file declares three independent subsystems, assembled once into
//! an immutable [`DevConfig`]:
//!
//! - [`define`]: compile-time constants substituted into source text
//! - [`alias`]: symbolic import prefixes mapped to directories
//! - [`routing`] + [`http`]: the development proxy that forwards API calls
//!   to a remote upstream

pub mod alias;
pub mod config;
pub mod define;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::{load_config, DevConfig};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
