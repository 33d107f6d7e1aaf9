//! Configuration initialization and hierarchy management

use std::path::{Path, PathBuf};

use tracing::info;

use crate::adapters::toml_config::DEFAULT_CONFIG_FILE;
use crate::adapters::{AppConfig, ConfigError};
use crate::cli::Cli;

/// Settings given on the command line; `None` leaves the lower layers alone
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOverrides {
    pub config_file: Option<PathBuf>,
    pub log_level: Option<String>,
    pub overwrite: bool,
}

impl From<&Cli> for CliOverrides {
    fn from(cli: &Cli) -> Self {
        Self {
            config_file: cli.config.clone(),
            log_level: cli.log_level.clone(),
            overwrite: cli.overwrite,
        }
    }
}

/// Initialize configuration hierarchy following precedence: CLI > Env > File > Defaults
pub fn initialize_configuration_hierarchy(cli: &Cli) -> Result<AppConfig, ConfigError> {
    layer_configuration(
        &CliOverrides::from(cli),
        Path::new(DEFAULT_CONFIG_FILE),
        |var| std::env::var(var).ok(),
    )
}

/// Build the effective configuration.
///
/// An explicit config file must exist; the default one is read only if present.
pub fn layer_configuration<F>(
    cli: &CliOverrides,
    default_file: &Path,
    env: F,
) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    // Step 1 + 2: defaults, then the config file
    let mut config = match &cli.config_file {
        Some(path) => AppConfig::from_file(path)?,
        None if default_file.exists() => AppConfig::from_file(default_file)?,
        None => {
            info!("No config file loaded, using defaults");
            AppConfig::default()
        }
    };

    // Step 3: environment variables
    let env_overrides = config.apply_env(env)?;
    if env_overrides > 0 {
        info!("Applied {} environment variable overrides", env_overrides);
    }

    // Step 4: CLI arguments
    let mut cli_overrides = 0;
    if let Some(level) = &cli.log_level {
        info!("CLI override: log_level = {}", level);
        config.set("log_level", level)?;
        cli_overrides += 1;
    }
    if cli.overwrite {
        info!("CLI override: overwrite = true");
        config.overwrite = true;
        cli_overrides += 1;
    }
    if cli_overrides > 0 {
        info!("Applied {} CLI configuration overrides", cli_overrides);
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults_without_file() {
        let temp = TempDir::new().unwrap();
        let config = layer_configuration(
            &CliOverrides::default(),
            &temp.path().join(DEFAULT_CONFIG_FILE),
            no_env,
        )
        .unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let cli = CliOverrides {
            config_file: Some(temp.path().join("absent.toml")),
            ..CliOverrides::default()
        };
        let result = layer_configuration(&cli, &temp.path().join(DEFAULT_CONFIG_FILE), no_env);
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_precedence_cli_over_env_over_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(
            &file,
            "[reelroute]\nlog_level = \"warn\"\nvideo_codec = \"libx265\"\naudio_codec = \"opus\"\n",
        )
        .unwrap();

        let vars: HashMap<&str, &str> = [
            ("REELROUTE_LOG_LEVEL", "error"),
            ("REELROUTE_AUDIO_CODEC", "flac"),
        ]
        .into_iter()
        .collect();
        let cli = CliOverrides {
            log_level: Some("debug".to_string()),
            ..CliOverrides::default()
        };

        let config =
            layer_configuration(&cli, &file, |var| vars.get(var).map(|v| v.to_string())).unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.audio_codec, "flac");
        assert_eq!(config.video_codec, "libx265");
        assert!(!config.overwrite);
    }

    #[test]
    fn test_invalid_cli_level_is_rejected() {
        let temp = TempDir::new().unwrap();
        let cli = CliOverrides {
            log_level: Some("chatty".to_string()),
            ..CliOverrides::default()
        };
        let result = layer_configuration(&cli, &temp.path().join(DEFAULT_CONFIG_FILE), no_env);
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }
}
