//! The DevNet Inspector agent configuration record.
//!
//! An [`AgentConfig`] is valid from the moment it exists: the mapping factory
//! checks every field in one pass and each mutator validates a copy before
//! committing, so a failed call leaves the instance untouched.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::{debug, warn};
use validator::Validate;

use super::raw;
use super::target::Target;
use super::types::{Environment, LogLevel};
use super::validation::{rule_violation, ErrorCollector, FieldErrorKind, ValidationError, FIELD_ORDER};

pub const DEFAULT_SCAN_INTERVAL: u32 = 60;
pub const MIN_SCAN_INTERVAL: u32 = 1;
/// One day
pub const MAX_SCAN_INTERVAL: u32 = 86_400;

const SCAN_INTERVAL_RANGE_MESSAGE: &str = "must be between 1 and 86400";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct AgentConfig {
    environment: Environment,
    #[validate(range(min = 1, max = 86400, message = "must be between 1 and 86400"))]
    scan_interval: u32,
    #[validate(custom(function = "validate_modules"))]
    modules: Vec<String>,
    log_level: LogLevel,
    targets: Vec<Target>,
}

fn validate_modules(modules: &[String]) -> Result<(), validator::ValidationError> {
    let blank: Vec<String> = modules
        .iter()
        .enumerate()
        .filter(|(_, name)| name.trim().is_empty())
        .map(|(i, _)| i.to_string())
        .collect();

    if blank.is_empty() {
        return Ok(());
    }
    Err(rule_violation(
        "empty",
        format!(
            "module names must not be empty (index {})",
            blank.join(", ")
        ),
    ))
}

impl AgentConfig {
    /// A configuration for `environment` with every other field at its default
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            scan_interval: DEFAULT_SCAN_INTERVAL,
            modules: Vec::new(),
            log_level: LogLevel::default(),
            targets: Vec::new(),
        }
    }

    /// Build from an untyped mapping, reporting every invalid field at once
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        let map = match value.as_object() {
            Some(map) => map,
            None => {
                return Err(ValidationError::single(
                    "",
                    FieldErrorKind::WrongType,
                    format!("configuration must be a mapping, got {}", raw::type_name(value)),
                ));
            }
        };

        for key in map.keys() {
            if !FIELD_ORDER.contains(&key.as_str()) {
                warn!(key = %key, "Ignoring unknown configuration key");
            }
        }

        let mut errors = ErrorCollector::new();

        let environment = match map.get("environment") {
            None => {
                errors.push("environment", FieldErrorKind::Missing, "field is required");
                None
            }
            Some(value) => raw::string(value, "environment", &mut errors).and_then(|s| {
                s.parse::<Environment>()
                    .map_err(|e| errors.push("environment", FieldErrorKind::InvalidEnum, e.to_string()))
                    .ok()
            }),
        };

        let scan_interval = match present(map.get("scan_interval")) {
            None => Some(DEFAULT_SCAN_INTERVAL),
            Some(value) => raw::integer::<u32>(
                value,
                "scan_interval",
                SCAN_INTERVAL_RANGE_MESSAGE,
                &mut errors,
            ),
        };

        let mut modules = Vec::new();
        if let Some(items) =
            present(map.get("modules")).and_then(|v| raw::list(v, "modules", &mut errors))
        {
            for (i, item) in items.iter().enumerate() {
                let path = format!("modules[{}]", i);
                if let Some(name) = raw::string(item, &path, &mut errors) {
                    let name = name.trim();
                    if name.is_empty() {
                        errors.push(path, FieldErrorKind::Empty, "module name must not be empty");
                    } else {
                        modules.push(name.to_string());
                    }
                }
            }
        }

        let log_level = match present(map.get("log_level")) {
            None => Some(LogLevel::default()),
            Some(value) => raw::string(value, "log_level", &mut errors).and_then(|s| {
                s.parse::<LogLevel>()
                    .map_err(|e| errors.push("log_level", FieldErrorKind::InvalidEnum, e.to_string()))
                    .ok()
            }),
        };

        let mut targets = Vec::new();
        if let Some(items) =
            present(map.get("targets")).and_then(|v| raw::list(v, "targets", &mut errors))
        {
            for (i, item) in items.iter().enumerate() {
                match Target::from_value(item) {
                    Ok(target) => targets.push(target),
                    Err(err) => errors.extend_prefixed(&format!("targets[{}]", i), err),
                }
            }
        }

        // The fallbacks below only survive into the result when no error was
        // recorded for that field.
        let candidate = AgentConfig {
            environment: environment.unwrap_or(Environment::Dev),
            scan_interval: scan_interval.unwrap_or(DEFAULT_SCAN_INTERVAL),
            modules,
            log_level: log_level.unwrap_or_default(),
            targets,
        };
        if let Err(err) = candidate.validate() {
            errors.extend(err.into());
        }

        let config = errors.finish(candidate)?;
        debug!(
            environment = %config.environment,
            targets = config.targets.len(),
            "Agent configuration constructed"
        );
        Ok(config)
    }

    /// Re-check every field constraint
    pub fn check(&self) -> Result<(), ValidationError> {
        let mut errors = ErrorCollector::new();
        if let Err(err) = self.validate() {
            errors.extend(err.into());
        }
        for (i, target) in self.targets.iter().enumerate() {
            if let Err(err) = target.validate() {
                errors.extend_prefixed(&format!("targets[{}]", i), err.into());
            }
        }
        errors.finish(())
    }

    /// Apply `mutate` to a copy and commit it only if the copy is still valid
    fn update<F>(&mut self, mutate: F) -> Result<(), ValidationError>
    where
        F: FnOnce(&mut AgentConfig),
    {
        let mut candidate = self.clone();
        mutate(&mut candidate);
        candidate.check()?;
        *self = candidate;
        Ok(())
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn scan_interval(&self) -> u32 {
        self.scan_interval
    }

    pub fn modules(&self) -> &[String] {
        &self.modules
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn set_environment(&mut self, environment: Environment) {
        self.environment = environment;
    }

    pub fn set_scan_interval(&mut self, scan_interval: u32) -> Result<(), ValidationError> {
        self.update(|c| c.scan_interval = scan_interval)
    }

    pub fn set_modules<I, S>(&mut self, modules: I) -> Result<(), ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let modules: Vec<String> = modules
            .into_iter()
            .map(|m| {
                let name: String = m.into();
                name.trim().to_string()
            })
            .collect();
        self.update(|c| c.modules = modules)
    }

    pub fn set_log_level(&mut self, log_level: LogLevel) {
        self.log_level = log_level;
    }

    /// Targets are validated on construction, so replacing the list cannot fail
    pub fn set_targets(&mut self, targets: Vec<Target>) {
        self.targets = targets;
    }

    /// Validate and append a target. Duplicates are kept.
    pub fn add_target(&mut self, host: impl Into<String>, port: u16) -> Result<(), ValidationError> {
        let target = Target::new(host, port)?;
        debug!(endpoint = %target, "Adding monitoring target");
        self.targets.push(target);
        Ok(())
    }

    /// Remove every target equal to `(host, port)`. Returns how many were
    /// removed; an absent pair is not an error.
    pub fn remove_target(&mut self, host: &str, port: u16) -> usize {
        let before = self.targets.len();
        self.targets.retain(|t| !t.matches(host, port));
        let removed = before - self.targets.len();
        if removed > 0 {
            debug!(host = host, port = port, removed = removed, "Removed monitoring target");
        } else {
            debug!(host = host, port = port, "No matching target to remove");
        }
        removed
    }

    /// Targets as plain `(host, port)` pairs
    pub fn get_targets_as_tuples(&self) -> Vec<(String, u16)> {
        self.targets.iter().map(Target::as_tuple).collect()
    }
}

/// Optional keys set to null fall back to their defaults
fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

impl TryFrom<Value> for AgentConfig {
    type Error = ValidationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        AgentConfig::from_value(&value)
    }
}

impl<'de> Deserialize<'de> for AgentConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        AgentConfig::from_value(&value).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for AgentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "AgentConfig(")?;
        writeln!(f, "    environment={},", self.environment)?;
        writeln!(f, "    scan_interval={},", self.scan_interval)?;
        writeln!(f, "    modules={:?},", self.modules)?;
        writeln!(f, "    log_level={},", self.log_level)?;
        writeln!(f, "    targets={:?}", self.get_targets_as_tuples())?;
        write!(f, ")")
    }
}
