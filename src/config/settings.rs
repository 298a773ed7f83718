use std::path::PathBuf;
use tracing::info;

use super::agent::AgentConfig;
use super::types::{Environment, LogLevel};
use super::validation::{ErrorCollector, FieldErrorKind, ValidationError};

pub const CONFIG_PATH_ENV: &str = "DEVNET_INSPECTOR_CONFIG";
pub const ENVIRONMENT_ENV: &str = "DEVNET_INSPECTOR_ENVIRONMENT";
pub const SCAN_INTERVAL_ENV: &str = "DEVNET_INSPECTOR_SCAN_INTERVAL";
pub const LOG_LEVEL_ENV: &str = "DEVNET_INSPECTOR_LOG_LEVEL";

/// Location of the agent config file: `DEVNET_INSPECTOR_CONFIG` when set,
/// otherwise `config.yaml` under the platform config directory
pub fn config_path() -> PathBuf {
    if let Ok(custom_path) = std::env::var(CONFIG_PATH_ENV) {
        if !custom_path.is_empty() {
            return PathBuf::from(custom_path);
        }
    }
    default_config_path()
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("devnet-inspector")
        .join("config.yaml")
}

/// Apply overrides from the process environment
pub fn apply_env_overrides(config: &mut AgentConfig) -> Result<Vec<&'static str>, ValidationError> {
    apply_overrides(config, |key| std::env::var(key).ok())
}

/// Apply `DEVNET_INSPECTOR_*` overrides read through `lookup`.
///
/// All overrides are applied to a copy first; `config` changes only if every
/// one of them is valid. Returns the variables that were applied.
pub fn apply_overrides<F>(
    config: &mut AgentConfig,
    lookup: F,
) -> Result<Vec<&'static str>, ValidationError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut candidate = config.clone();
    let mut errors = ErrorCollector::new();
    let mut applied = Vec::new();

    if let Some(val) = lookup(ENVIRONMENT_ENV) {
        match val.parse::<Environment>() {
            Ok(environment) => {
                candidate.set_environment(environment);
                applied.push(ENVIRONMENT_ENV);
            }
            Err(e) => errors.push(
                "environment",
                FieldErrorKind::InvalidEnum,
                format!("{} (from {})", e, ENVIRONMENT_ENV),
            ),
        }
    }

    if let Some(val) = lookup(SCAN_INTERVAL_ENV) {
        match val.trim().parse::<i64>() {
            Ok(n) => match u32::try_from(n) {
                Ok(n) => match candidate.set_scan_interval(n) {
                    Ok(()) => applied.push(SCAN_INTERVAL_ENV),
                    Err(err) => errors.extend(err),
                },
                Err(_) => errors.push(
                    "scan_interval",
                    FieldErrorKind::OutOfRange,
                    "must be between 1 and 86400",
                ),
            },
            Err(_) => errors.push(
                "scan_interval",
                FieldErrorKind::WrongType,
                format!("{} must be an integer, got '{}'", SCAN_INTERVAL_ENV, val),
            ),
        }
    }

    if let Some(val) = lookup(LOG_LEVEL_ENV) {
        match val.parse::<LogLevel>() {
            Ok(level) => {
                candidate.set_log_level(level);
                applied.push(LOG_LEVEL_ENV);
            }
            Err(e) => errors.push(
                "log_level",
                FieldErrorKind::InvalidEnum,
                format!("{} (from {})", e, LOG_LEVEL_ENV),
            ),
        }
    }

    errors.finish(())?;
    *config = candidate;

    for var in &applied {
        info!("Applied configuration override from {}", var);
    }
    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config_path() {
        let path = default_config_path();
        assert!(path.ends_with("devnet-inspector/config.yaml"));
    }

    #[test]
    fn test_overrides_applied() {
        let mut config = AgentConfig::new(Environment::Dev);
        let applied = apply_overrides(
            &mut config,
            lookup_from(&[
                (ENVIRONMENT_ENV, "prod"),
                (SCAN_INTERVAL_ENV, "120"),
                (LOG_LEVEL_ENV, "debug"),
            ]),
        )
        .unwrap();

        assert_eq!(applied.len(), 3);
        assert_eq!(config.environment(), Environment::Prod);
        assert_eq!(config.scan_interval(), 120);
        assert_eq!(config.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_no_overrides_is_noop() {
        let mut config = AgentConfig::new(Environment::Qa);
        let applied = apply_overrides(&mut config, |_| None).unwrap();
        assert!(applied.is_empty());
        assert_eq!(config, AgentConfig::new(Environment::Qa));
    }

    #[test]
    fn test_bad_override_leaves_config_untouched() {
        let mut config = AgentConfig::new(Environment::Dev);
        let err = apply_overrides(
            &mut config,
            lookup_from(&[
                (ENVIRONMENT_ENV, "prod"),
                (SCAN_INTERVAL_ENV, "0"),
                (LOG_LEVEL_ENV, "chatty"),
            ]),
        )
        .unwrap_err();

        assert_eq!(err.fields(), vec!["scan_interval", "log_level"]);
        assert_eq!(config, AgentConfig::new(Environment::Dev));
    }

    #[test]
    fn test_non_numeric_scan_interval() {
        let mut config = AgentConfig::new(Environment::Dev);
        let err = apply_overrides(&mut config, lookup_from(&[(SCAN_INTERVAL_ENV, "soon")]))
            .unwrap_err();
        assert_eq!(err.errors()[0].kind, FieldErrorKind::WrongType);
    }
}
