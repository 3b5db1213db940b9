use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
#[cfg(feature = "clap")]
pub mod cli;
pub mod error;
pub mod settings;
pub mod telemetry;

// Re-export the core types to provide a clean public API.
#[cfg(feature = "clap")]
pub use cli::ConfigArgs;
pub use settings::{Config, DataSettings, LoggingSettings, ServerSettings};
pub use telemetry::init_tracing;

/// Prefix of the environment variables that override file settings,
/// e.g. `CRYPTOSTATS__DATA__DIRECTORY=/srv/prices`.
pub const ENV_PREFIX: &str = "CRYPTOSTATS";

/// Loads the application configuration.
///
/// Built-in defaults are overlaid by the TOML file at `path` (or by an
/// optional `config.toml` in the working directory when `path` is `None`),
/// which is in turn overlaid by `CRYPTOSTATS__SECTION__KEY` environment
/// variables.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    load_with_environment(path, environment())
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

fn load_with_environment(
    path: Option<&Path>,
    environment: config::Environment,
) -> Result<Config, ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name("config").required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(environment)
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}
