//! Module alias subsystem.
//!
//! # Data Flow
//! ```text
//! [resolve.alias] (prefix → relative dir)
//!     → resolver.rs (join onto config file dir, normalize)
//!     → AliasTable (immutable after assembly)
//!     → resolve_import("@/x") at module-resolution time
//! ```
//!
//! # Design Decisions
//! - Anchored at the config file, never the importer or the cwd
//! - Prefixes match a whole leading path segment
//! - Missing targets surface at first use, not at startup

pub mod resolver;

pub use resolver::{normalize, AliasRule, AliasTable, ResolutionError};
