#![allow(dead_code)]

use anyhow::Result;
use serde_json::{json, Value};
use std::path::PathBuf;
use tempfile::TempDir;

/// Mapping used by the startup example: every field set
pub fn full_mapping() -> Value {
    json!({
        "environment": "dev",
        "scan_interval": 60,
        "modules": ["network", "system"],
        "log_level": "DEBUG",
        "targets": [["192.168.1.1", 8080]]
    })
}

/// Temporary directory holding config files for one test
pub struct TestWorkspace {
    dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Result<Self> {
        Ok(Self {
            dir: TempDir::new()?,
        })
    }

    pub fn path(&self, file_name: &str) -> PathBuf {
        self.dir.path().join(file_name)
    }

    /// Write raw file content, bypassing the config API
    pub fn write(&self, file_name: &str, content: &str) -> Result<PathBuf> {
        let path = self.path(file_name);
        std::fs::write(&path, content)?;
        Ok(path)
    }
}
