//! devproxy command-line entry point.
//!
//! ```text
//!                     ┌──────────────────────────────────────────────┐
//!   devproxy.toml ───▶│ config::load_config → assemble → DevConfig  │
//!                     └───────┬───────────────┬───────────────┬──────┘
//!                             │               │               │
//!                             ▼               ▼               ▼
//!                       define (build)   alias (build)   proxy (dev server)
//!                                                              │
//!     Browser ──▶ listener ──▶ dispatch ──▶ rule? ─ yes ──▶ upstream
//!                                            └── no ──▶ static root / 404
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use devproxy::config::{load_config, ConfigError};
use devproxy::lifecycle::startup;
use devproxy::observability::logging;
use devproxy::DevConfig;

#[derive(Parser)]
#[command(name = "devproxy")]
#[command(about = "Development proxy and build configuration for a front-end app", long_about = None)]
struct Cli {
    /// Configuration file; relative paths inside it resolve against its directory.
    #[arg(short, long, default_value = "devproxy.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the development server
    Serve {
        /// Override server.bind_address
        #[arg(short, long)]
        bind: Option<SocketAddr>,
    },
    /// Validate the configuration and print a summary
    Check,
    /// Print a source file with constants substituted
    Define { file: PathBuf },
    /// Print the path an aliased import specifier resolves to
    Resolve { specifier: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Config errors must reach the console before anything else happens,
    // so logging starts with the default level until the file is read.
    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            logging::init_logging("info");
            report_config_error(&cli.config, &e);
            std::process::exit(1);
        }
    };
    logging::init_logging(&config.observability.log_level);
    tracing::info!(path = %cli.config.display(), "Configuration loaded");

    match cli.command {
        Commands::Serve { bind } => startup::serve(Arc::new(config), bind).await?,
        Commands::Check => print_summary(&config),
        Commands::Define { file } => {
            let source = std::fs::read_to_string(&file)?;
            print!("{}", config.define.apply(&source));
        }
        Commands::Resolve { specifier } => match config.alias.locate(&specifier)? {
            Some(path) => println!("{}", path.display()),
            None => {
                eprintln!("'{specifier}' does not use a configured alias");
                std::process::exit(2);
            }
        },
    }

    Ok(())
}

fn report_config_error(path: &std::path::Path, error: &ConfigError) {
    match error {
        ConfigError::Validation(errors) => {
            tracing::error!(path = %path.display(), count = errors.len(), "Invalid configuration");
            for e in errors {
                eprintln!("  - {e}");
            }
        }
        other => tracing::error!(path = %path.display(), error = %other, "Failed to load configuration"),
    }
}

fn print_summary(config: &DevConfig) {
    println!("define:");
    for entry in config.define.entries() {
        println!("  {} = {}", entry.identifier, entry.literal);
    }
    println!("resolve.alias:");
    for rule in config.alias.rules() {
        println!("  {} -> {}", rule.prefix, rule.target.display());
    }
    println!("server.proxy:");
    for rule in config.proxy.rules() {
        println!(
            "  {} -> {} (change_origin={}, secure={})",
            rule.path_prefix(),
            rule.upstream(),
            rule.change_origin(),
            rule.secure()
        );
    }
}
