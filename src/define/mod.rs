//! Constant injection subsystem.
//!
//! # Data Flow
//! ```text
//! [define] table (identifier → TOML value)
//!     → binding.rs (validate identifier, serialize to JSON literal)
//!     → ConstantTable (immutable after assembly)
//!     → substitute.rs (whole-token replacement in every source file)
//! ```
//!
//! # Design Decisions
//! - Substitution is textual and whole-program, not scoped to one file
//! - Tokens are matched on identifier boundaries; member access and
//!   assignment targets are skipped
//! - Values are fixed literals from the config file, never read from a
//!   package manifest at build time

pub mod binding;
pub mod substitute;

pub use binding::{BindingEntry, ConstantTable};
pub use substitute::Substituter;
