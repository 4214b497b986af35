//! Configuration loading.
//!
//! Sources, lowest precedence first:
//! 1. built-in defaults (`ProbeConfig::default`)
//! 2. a config file: the explicit path, or `probe.{toml,yaml,json}` in the
//!    working directory when present
//! 3. environment variables prefixed with `PROBE_` (e.g. `PROBE_BASE_URL`)

use std::collections::HashMap;
use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use probe_application::{ProbeConfig, ProbeError};
use thiserror::Error;

const DEFAULT_CONFIG_NAME: &str = "probe";
const ENV_PREFIX: &str = "PROBE";

/// Errors raised while loading the configuration.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A source is missing or could not be parsed into `ProbeConfig`.
    #[error("failed to load configuration: {0}")]
    Source(#[from] ConfigError),

    /// The merged configuration failed validation.
    #[error(transparent)]
    Invalid(#[from] ProbeError),
}

/// Loads and validates the probe configuration.
///
/// # Errors
///
/// Returns `SettingsError::Source` if an explicit file is missing or a
/// source cannot be parsed, and `SettingsError::Invalid` if the merged
/// configuration is invalid.
pub fn load_config(file: Option<&Path>) -> Result<ProbeConfig, SettingsError> {
    build_config(file, None)
}

/// Same as [`load_config`] but reads variables from `env` instead of the
/// process environment.
///
/// # Errors
///
/// See [`load_config`].
pub fn load_config_with_env(
    file: Option<&Path>,
    env: HashMap<String, String>,
) -> Result<ProbeConfig, SettingsError> {
    build_config(file, Some(env))
}

fn build_config(
    file: Option<&Path>,
    env: Option<HashMap<String, String>>,
) -> Result<ProbeConfig, SettingsError> {
    let file_source = match file {
        Some(path) => File::from(path).required(true),
        None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
    };

    let config = Config::builder()
        .add_source(file_source)
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .source(env),
        )
        .build()
        .and_then(|c| c.try_deserialize::<ProbeConfig>())?;

    config.validate()?;
    tracing::debug!(
        base_url = %config.base_url,
        timeout_ms = ?config.timeout_ms,
        "configuration loaded"
    );
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use probe_application::DEFAULT_BASE_URL;
    use std::error::Error as _;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_without_sources() {
        let config = load_config_with_env(None, HashMap::new()).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_ms, None);
        assert!(!config.stop_on_failure);
    }

    #[test]
    fn test_environment_overrides() {
        let config = load_config_with_env(
            None,
            env(&[
                ("PROBE_BASE_URL", "http://127.0.0.1:9000/"),
                ("PROBE_TIMEOUT_MS", "1500"),
                ("PROBE_STOP_ON_FAILURE", "true"),
            ]),
        )
        .unwrap();

        assert_eq!(config.base_url, "http://127.0.0.1:9000/");
        assert_eq!(config.timeout_ms, Some(1500));
        assert!(config.stop_on_failure);
    }

    #[test]
    fn test_file_then_environment() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "base_url = \"http://localhost:8080/api\"").unwrap();
        writeln!(file, "user_agent = \"probe-ci\"").unwrap();

        let config = load_config_with_env(
            Some(file.path()),
            env(&[("PROBE_USER_AGENT", "probe-override")]),
        )
        .unwrap();

        assert_eq!(config.base_url, "http://localhost:8080/api");
        assert_eq!(config.user_agent, "probe-override");
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config_with_env(Some(&dir.path().join("absent.toml")), HashMap::new())
            .unwrap_err();
        assert!(matches!(err, SettingsError::Source(_)));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_unparseable_value_keeps_config_error() {
        let err = load_config_with_env(None, env(&[("PROBE_TIMEOUT_MS", "soon")])).unwrap_err();
        assert!(matches!(err, SettingsError::Source(_)));
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let result = load_config_with_env(None, env(&[("PROBE_BASE_URL", "ftp://nope/")]));
        assert!(matches!(result, Err(SettingsError::Invalid(ProbeError::Config(_)))));

        let result = load_config_with_env(None, env(&[("PROBE_TIMEOUT_MS", "0")]));
        assert!(matches!(result, Err(SettingsError::Invalid(ProbeError::Config(_)))));
    }
}
