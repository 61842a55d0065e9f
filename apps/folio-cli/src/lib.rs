//! Shared pieces of the folio binaries: config loading and the HTTP router.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use folio_core::config::Config;

pub mod server;

#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
    /// Directory holding config.toml; relative data paths resolve against it
    #[arg(long, env = "FOLIO_CONFIG_DIR", default_value = ".")]
    pub config_dir: PathBuf,
}

impl ConfigArgs {
    pub fn load(&self) -> Result<Config> {
        Config::load_from(&self.config_dir).map_err(|e| {
            tracing::error!(dir = %self.config_dir.display(), error = %e, "failed to load config");
            e
        })
    }
}
