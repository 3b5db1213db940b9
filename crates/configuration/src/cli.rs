use crate::error::ConfigError;
use crate::load_config;
use crate::settings::Config;
use std::path::PathBuf;

/// Command-line overrides shared by every binary.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigArgs {
    /// Path to a TOML configuration file. Defaults to `config.toml` if present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the `<SYMBOL>_values.csv` price files.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
}

impl ConfigArgs {
    /// Loads the configuration and applies the command-line overrides on top.
    pub fn load(&self) -> Result<Config, ConfigError> {
        let mut config = load_config(self.config.as_deref())?;
        if let Some(directory) = &self.data_dir {
            config.data.directory = directory.clone();
        }
        config.validate()?;
        Ok(config)
    }
}
