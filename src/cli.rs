//! Command line interface.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{ConfigLoader, Settings};
use crate::error::AppResult;

/// HTTP cron-job scheduling service.
#[derive(Debug, Parser)]
#[command(name = "chronod", version, about)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, env = "CHRONOD_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override the configured listen host
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Override the configured listen port
    #[arg(long, value_name = "PORT")]
    pub port: Option<u16>,
}

impl Cli {
    /// Loads settings from file/environment and applies CLI overrides.
    pub fn into_settings(self) -> AppResult<Settings> {
        let mut settings = ConfigLoader::load(self.config.as_deref())?;
        if let Some(host) = self.host {
            settings.server.host = host;
        }
        if let Some(port) = self.port {
            settings.server.port = port;
        }
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_overrides_win_over_defaults() {
        let cli = Cli::parse_from(["chronod", "--host", "0.0.0.0", "--port", "4444"]);
        let settings = cli.into_settings().unwrap();
        assert_eq!(settings.server.address(), "0.0.0.0:4444");
    }

    #[test]
    fn no_arguments_is_valid() {
        let cli = Cli::parse_from(["chronod"]);
        let settings = cli.into_settings().unwrap();
        assert_eq!(settings.server.port, 3000);
    }
}
