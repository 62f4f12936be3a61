//! Configuration for the demo server.

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use request_logger::LoggerSettings;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Settings for the request logging middleware.
    #[serde(default)]
    pub request_log: LoggerSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is not set.
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_level() -> String {
    "info,request_logger=debug".to_string()
}

impl Config {
    /// Load configuration from `config.toml` (if present) and environment
    /// variables (`REQLOG__SECTION__KEY`, which take precedence).
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Same as [`Config::load`] with an explicit file path.
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        let config = ConfigLoader::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port() as i64)?
            .set_default("logging.level", default_level())?
            .set_default("request_log.skip_paths", vec!["/health"])?
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("REQLOG")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("request_log.skip_paths")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
