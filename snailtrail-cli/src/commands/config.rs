//! Configuration inspection command.

use std::path::{Path, PathBuf};

use clap::Args;
use snailtrail::TrailConfig;

use crate::error::CliError;

/// Arguments for `snailtrail config`.
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// INI file with a [trail] section (defaults apply when omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Load the configuration the same way `replay` would and print it.
pub fn run(args: ConfigArgs) -> Result<(), CliError> {
    let config = load_config(args.config.as_deref())?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

/// Load from `path`, or fall back to defaults.
pub fn load_config(path: Option<&Path>) -> Result<TrailConfig, CliError> {
    match path {
        Some(path) => Ok(TrailConfig::load(path)?),
        None => Ok(TrailConfig::default()),
    }
}
