use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use validator::Validate;

use super::raw;
use super::validation::{rule_violation, ErrorCollector, FieldErrorKind, ValidationError};

pub(crate) const PORT_RANGE_MESSAGE: &str = "must be between 1 and 65535";

/// A monitored endpoint. Immutable once built; always holds a trimmed,
/// non-empty host and a port in 1..=65535.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Validate)]
pub struct Target {
    #[validate(custom(function = "validate_host"))]
    host: String,
    #[validate(range(min = 1, message = "must be between 1 and 65535"))]
    port: u16,
}

fn validate_host(host: &str) -> Result<(), validator::ValidationError> {
    if host.trim().is_empty() {
        return Err(rule_violation("empty", "host must not be empty"));
    }
    Ok(())
}

impl Target {
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self, ValidationError> {
        let host: String = host.into();
        let target = Self {
            host: host.trim().to_string(),
            port,
        };
        target.validate()?;
        Ok(target)
    }

    /// Build from an untyped entry: either a `[host, port]` pair or a
    /// `{"host": .., "port": ..}` mapping. Error paths are relative to the entry.
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        let mut errors = ErrorCollector::new();

        let (host, port) = match value {
            Value::Array(pair) if pair.len() == 2 => (Some(&pair[0]), Some(&pair[1])),
            Value::Object(map) => (map.get("host"), map.get("port")),
            other => {
                return Err(ValidationError::single(
                    "",
                    FieldErrorKind::MalformedTarget,
                    format!(
                        "target must be a [host, port] pair or a mapping with host and port, got {}",
                        describe_entry(other)
                    ),
                ));
            }
        };

        // host is checked in full before port so errors come out host-first
        let host = match host {
            None => {
                errors.push("host", FieldErrorKind::Missing, "field is required");
                None
            }
            Some(value) => raw::string(value, "host", &mut errors).filter(|host| {
                match validate_host(host) {
                    Ok(()) => true,
                    Err(err) => {
                        errors.push("host", FieldErrorKind::Empty, err.message.unwrap_or_default());
                        false
                    }
                }
            }),
        };

        let port: Option<u16> = match port {
            None => {
                errors.push("port", FieldErrorKind::Missing, "field is required");
                None
            }
            Some(value) => raw::integer(value, "port", PORT_RANGE_MESSAGE, &mut errors),
        };

        match (host, port) {
            (Some(host), Some(port)) => match Target::new(host, port) {
                Ok(target) => errors.finish(target),
                Err(err) => {
                    errors.extend(err);
                    Err(errors.into_error())
                }
            },
            (None, Some(0)) => {
                errors.push("port", FieldErrorKind::OutOfRange, PORT_RANGE_MESSAGE);
                Err(errors.into_error())
            }
            _ => Err(errors.into_error()),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Whether this target is exactly `(host, port)`, comparing the trimmed host
    pub fn matches(&self, host: &str, port: u16) -> bool {
        self.host == host.trim() && self.port == port
    }

    pub fn as_tuple(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

fn describe_entry(value: &Value) -> String {
    match value {
        Value::Array(items) => format!("list of {} element(s)", items.len()),
        other => raw::type_name(other).to_string(),
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl<S: Into<String>> TryFrom<(S, u16)> for Target {
    type Error = ValidationError;

    fn try_from((host, port): (S, u16)) -> Result<Self, Self::Error> {
        Target::new(host, port)
    }
}

impl From<Target> for (String, u16) {
    fn from(target: Target) -> Self {
        (target.host, target.port)
    }
}

/// Targets are written as `[host, port]` arrays in every format
impl Serialize for Target {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.host, self.port).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Target {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Target::from_value(&value).map_err(serde::de::Error::custom)
    }
}
