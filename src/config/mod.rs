//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! devproxy.toml
//!     → loader.rs (read & deserialize into RawConfig)
//!     → validation.rs (semantic checks, build rule tables)
//!     → DevConfig (validated, immutable)
//!     → shared via Arc to the dev server and build-side consumers
//! ```
//!
//! # Design Decisions
//! - Config is immutable once assembled; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_str, ConfigError};
pub use schema::{ObservabilityConfig, ProxyRuleConfig, RawConfig, ServerConfig, TimeoutConfig};
pub use validation::{assemble, ServerSettings, ValidationError};

use crate::alias::AliasTable;
use crate::define::ConstantTable;
use crate::routing::ProxyRouter;

/// The assembled configuration handed to every consumer.
#[derive(Debug, Clone)]
pub struct DevConfig {
    /// Constant injector table.
    pub define: ConstantTable,
    /// Alias resolver table.
    pub alias: AliasTable,
    /// Development proxy rules.
    pub proxy: ProxyRouter,
    /// Dev server settings.
    pub server: ServerSettings,
    pub observability: ObservabilityConfig,
}
