//! Configuration loading from file and environment.

use std::path::Path;

use config::{Config, Environment, File};

use crate::config::settings::Settings;
use crate::error::{AppError, AppResult};

/// Environment variable prefix for configuration overrides.
const ENV_PREFIX: &str = "CHRONOD";

/// Separator for nested keys in environment variables, e.g.
/// `CHRONOD_SERVER__PORT=8080`.
const ENV_SEPARATOR: &str = "__";

/// Default configuration file, loaded when present.
const DEFAULT_CONFIG_FILE: &str = "config/chronod";

/// Loads [`Settings`] from an optional TOML file plus `CHRONOD_*` environment
/// overrides. Every field has a default, so running with no configuration at
/// all is valid.
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load(config_file: Option<&Path>) -> AppResult<Settings> {
        let mut builder = Config::builder();

        builder = match config_file {
            Some(path) => builder.add_source(File::from(path)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX).separator(ENV_SEPARATOR),
        );

        let config = builder.build().map_err(|e| AppError::Configuration {
            key: "config".to_string(),
            source: anyhow::Error::from(e),
        })?;

        config
            .try_deserialize()
            .map_err(|e| AppError::Configuration {
                key: "settings".to_string(),
                source: anyhow::Error::from(e),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_settings_from_toml_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            r#"
            [application]
            name = "chronod-test"

            [server]
            host = "0.0.0.0"
            port = 9090

            [logger]
            level = "debug"
            format = "json"
            "#
        )
        .unwrap();

        let settings = ConfigLoader::load(Some(file.path())).unwrap();
        assert_eq!(settings.application.name, "chronod-test");
        assert_eq!(settings.server.address(), "0.0.0.0:9090");
        assert_eq!(settings.logger.level, "debug");
        assert_eq!(settings.logger.format, "json");
    }

    #[test]
    fn missing_optional_file_falls_back_to_defaults() {
        let settings = ConfigLoader::load(None).unwrap();
        assert_eq!(settings.server.port, 3000);
    }

    #[test]
    fn unreadable_file_is_a_configuration_error() {
        let err = ConfigLoader::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, AppError::Configuration { .. }));
    }
}
