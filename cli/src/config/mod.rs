use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

pub mod app;
pub mod limits;
pub mod validation;

pub use app::AppConfig;
pub use validation::{ConfigLoadResult, ConfigValidationError};

/// Prefix of environment variables that override file values, e.g.
/// `WAKFU_THEME_CACHE_TTL_SECONDS=60` or `WAKFU_THEME_LOGGING__LEVEL=debug`.
pub const ENV_PREFIX: &str = "WAKFU_THEME";

/// Default configuration file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Loads configuration from `config.toml` (or `path`) and the environment.
///
/// The default file is optional so the tool works out of the box; an
/// explicitly given `path` must exist. Environment entries override file
/// values. The result is validated before it is returned.
pub fn load_config(path: Option<&Path>) -> ConfigLoadResult {
    dotenv::dotenv().ok();
    let env_source = Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true);

    let file_source = match path {
        Some(path) => File::from(path).required(true),
        None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    load_from(
        Config::builder()
            .add_source(file_source)
            .add_source(env_source),
    )
}

/// Loads configuration from one file only, ignoring the environment.
pub fn load_config_file(path: &Path) -> ConfigLoadResult {
    load_from(Config::builder().add_source(File::from(path).required(true)))
}

fn load_from(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> ConfigLoadResult {
    let config = match builder.build() {
        Ok(config) => config,
        Err(e) => {
            return ConfigLoadResult::LoadError(format!(
                "Configuration loading failed: {e}. Please check your config.toml file and environment variables."
            ));
        }
    };

    match config.try_deserialize::<AppConfig>() {
        Ok(app_config) => {
            if let Err(validation_errors) = app_config.validate() {
                return ConfigLoadResult::ValidationError(validation_errors);
            }
            ConfigLoadResult::Success(Box::new(app_config))
        }
        Err(e) => ConfigLoadResult::DeserializeError(format!("Failed to deserialize config: {e}")),
    }
}

/// Additional logging configuration
#[derive(Debug, Deserialize, Default, Clone)]
pub struct LoggingConfig {
    level: Option<String>,
    file: Option<String>,
}

impl LoggingConfig {
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or("info")
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }
}
