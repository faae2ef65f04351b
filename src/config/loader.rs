//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::RawConfig;
use crate::config::validation::{assemble, ValidationError};
use crate::config::DevConfig;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load, validate and assemble configuration from a TOML file.
///
/// Relative paths in the file resolve against the file's own directory,
/// never the working directory.
pub fn load_config(path: &Path) -> Result<DevConfig, ConfigError> {
    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };

    let path = fs::canonicalize(path).map_err(io_err)?;
    let content = fs::read_to_string(&path).map_err(io_err)?;
    let config_dir = path.parent().unwrap_or_else(|| Path::new("/"));

    load_str(&content, config_dir)
}

/// Parse and assemble configuration text as if it lived in `config_dir`.
pub fn load_str(content: &str, config_dir: &Path) -> Result<DevConfig, ConfigError> {
    let raw: RawConfig = toml::from_str(content)?;
    assemble(&raw, config_dir).map_err(ConfigError::Validation)
}
