//! JSON and YAML encodings of the agent configuration, and file persistence

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

use super::agent::AgentConfig;
use crate::{InspectorError, InspectorResult};

const JSON_INDENT: &[u8] = b"    ";

/// On-disk encoding, chosen from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    /// Format for `path` by extension (`.json` / `.yaml`, case-insensitive)
    pub fn from_path(path: impl AsRef<Path>) -> InspectorResult<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("json") => Ok(ConfigFormat::Json),
            Some("yaml") => Ok(ConfigFormat::Yaml),
            _ => Err(InspectorError::unsupported_format(path)),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            ConfigFormat::Yaml => "yaml",
        }
    }

    pub fn encode(&self, config: &AgentConfig) -> InspectorResult<String> {
        match self {
            ConfigFormat::Json => {
                let mut buf = Vec::new();
                let formatter = serde_json::ser::PrettyFormatter::with_indent(JSON_INDENT);
                let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
                config
                    .serialize(&mut serializer)
                    .map_err(|e| InspectorError::persistence("encode json", e))?;
                String::from_utf8(buf).map_err(|e| {
                    InspectorError::persistence(
                        "encode json",
                        std::io::Error::new(std::io::ErrorKind::InvalidData, e),
                    )
                })
            }
            ConfigFormat::Yaml => serde_yaml::to_string(config)
                .map_err(|e| InspectorError::persistence("encode yaml", e)),
        }
    }

    /// Parse `text` into a mapping, then run it through the validating constructor
    pub fn decode(&self, text: &str) -> InspectorResult<AgentConfig> {
        let value = self.parse(text)?;
        Ok(AgentConfig::from_value(&value)?)
    }

    fn parse(&self, text: &str) -> InspectorResult<Value> {
        match self {
            ConfigFormat::Json => serde_json::from_str(text)
                .map_err(|e| InspectorError::persistence("parse json", e)),
            ConfigFormat::Yaml => serde_yaml::from_str(text)
                .map_err(|e| InspectorError::persistence("parse yaml", e)),
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl std::str::FromStr for ConfigFormat {
    type Err = InspectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ConfigFormat::Json),
            "yaml" => Ok(ConfigFormat::Yaml),
            other => Err(InspectorError::unsupported_format(format!("*.{}", other))),
        }
    }
}

impl AgentConfig {
    /// Pretty JSON with 4-space indentation; targets as `[host, port]`
    pub fn to_json(&self) -> InspectorResult<String> {
        ConfigFormat::Json.encode(self)
    }

    /// Block-style YAML; targets as `[host, port]` sequences
    pub fn to_yaml(&self) -> InspectorResult<String> {
        ConfigFormat::Yaml.encode(self)
    }

    pub fn from_json_str(text: &str) -> InspectorResult<Self> {
        ConfigFormat::Json.decode(text)
    }

    pub fn from_yaml_str(text: &str) -> InspectorResult<Self> {
        ConfigFormat::Yaml.decode(text)
    }

    /// Write to `path` as JSON or YAML depending on its extension
    pub fn save(&self, path: impl AsRef<Path>) -> InspectorResult<()> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let content = format.encode(self)?;

        std::fs::write(path, content).map_err(|e| {
            InspectorError::persistence(format!("write {}", path.display()), e)
        })?;

        info!(path = %path.display(), format = %format, "Saved agent configuration");
        Ok(())
    }

    /// Read `path` (format by extension) and validate it like any other mapping
    pub fn load(path: impl AsRef<Path>) -> InspectorResult<Self> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;

        let content = std::fs::read_to_string(path).map_err(|e| {
            InspectorError::persistence(format!("read {}", path.display()), e)
        })?;
        debug!(path = %path.display(), bytes = content.len(), "Read configuration file");

        let value = format.parse(&content).map_err(|e| match e {
            InspectorError::Persistence { source, .. } => {
                InspectorError::persistence(format!("parse {}", path.display()), source)
            }
            other => other,
        })?;
        let config = AgentConfig::from_value(&value)?;

        info!(path = %path.display(), format = %format, "Loaded agent configuration");
        Ok(config)
    }
}
