pub mod commands;
pub mod query;
pub mod scan;
pub mod serve;

use std::path::Path;
use crate::config::{parse_config, parser::validate_semantics, ScannerConfig};
use crate::errors::ScannerError;

pub use commands::{Cli, Commands, ConfigArgs};

/// Load the config file (or defaults) and apply command-line overrides.
pub async fn load_config(args: &ConfigArgs) -> Result<ScannerConfig, ScannerError> {
    let mut config = match &args.config {
        Some(path) => parse_config(Path::new(path)).await?,
        None => ScannerConfig::default(),
    };

    if let Some(db) = &args.db {
        config.server.database = db.clone();
    }
    if let Some(backend) = args.backend {
        config.audit.backend = backend;
    }
    if let Some(mode) = args.mode {
        config.audit.mode = mode;
    }

    validate_semantics(&config)?;
    Ok(config)
}
