use anyhow::Result;
use serde_json::json;

use devnet_inspector::config::{AgentConfig, Environment, FieldErrorKind, LogLevel};
use devnet_inspector::logging::init_test_logging;
mod common;

#[test]
fn test_defaults_for_minimal_mapping() -> Result<()> {
    let _ = init_test_logging();

    let config = AgentConfig::from_value(&json!({
        "environment": "dev",
        "targets": [["192.168.1.1", 8080], ["example.com", 443]]
    }))?;

    assert_eq!(config.environment(), Environment::Dev);
    assert_eq!(config.scan_interval(), 60);
    assert_eq!(config.log_level(), LogLevel::Info);
    assert!(config.modules().is_empty());
    assert_eq!(
        config.get_targets_as_tuples(),
        vec![
            ("192.168.1.1".to_string(), 8080),
            ("example.com".to_string(), 443),
        ]
    );
    Ok(())
}

#[test]
fn test_full_mapping() -> Result<()> {
    let config = AgentConfig::from_value(&common::full_mapping())?;

    assert_eq!(config.modules(), ["network", "system"]);
    assert_eq!(config.log_level(), LogLevel::Debug);
    assert_eq!(config.targets().len(), 1);
    assert_eq!(config.targets()[0].host(), "192.168.1.1");
    assert_eq!(config.targets()[0].port(), 8080);
    Ok(())
}

#[test]
fn test_negative_scan_interval_names_field() {
    let err = AgentConfig::from_value(&json!({
        "environment": "dev",
        "scan_interval": -1,
        "targets": [["192.168.1.1", 8080]]
    }))
    .unwrap_err();

    assert!(err.names("scan_interval"));
    assert!(!err.names("targets"));
}

#[test]
fn test_invalid_environment_names_field() {
    let err = AgentConfig::from_value(&json!({
        "environment": "invalid_env",
        "scan_interval": 60,
        "targets": [["192.168.1.1", 8080]]
    }))
    .unwrap_err();

    assert_eq!(err.fields(), vec!["environment"]);
    assert_eq!(err.errors()[0].kind, FieldErrorKind::InvalidEnum);
}

#[test]
fn test_scan_interval_boundaries() {
    for (value, ok) in [(0, false), (1, true), (86400, true), (86401, false)] {
        let result = AgentConfig::from_value(&json!({"environment": "prod", "scan_interval": value}));
        assert_eq!(result.is_ok(), ok, "scan_interval={}", value);
    }
}

#[test]
fn test_port_boundaries() {
    for (port, ok) in [(0, false), (1, true), (65535, true), (65536, false)] {
        let result = AgentConfig::from_value(&json!({
            "environment": "prod",
            "targets": [{"host": "h", "port": port}]
        }));
        match result {
            Ok(_) => assert!(ok, "port={} should fail", port),
            Err(err) => {
                assert!(!ok, "port={} should pass", port);
                assert_eq!(err.fields(), vec!["targets[0].port"]);
            }
        }
    }
}

#[test]
fn test_blank_hosts_rejected() {
    for host in ["", " ", "\t"] {
        let err = AgentConfig::from_value(&json!({
            "environment": "qa",
            "targets": [[host, 80]]
        }))
        .unwrap_err();
        assert_eq!(err.fields(), vec!["targets[0].host"]);
        assert_eq!(err.errors()[0].kind, FieldErrorKind::Empty);
    }
}

#[test]
fn test_original_environment_spellings_accepted() -> Result<()> {
    let config = AgentConfig::from_value(&json!({"environment": "devnet"}))?;
    assert_eq!(config.environment(), Environment::Dev);

    let config = AgentConfig::from_value(&json!({"environment": "QA", "log_level": "warning"}))?;
    assert_eq!(config.environment(), Environment::Qa);
    assert_eq!(config.log_level(), LogLevel::Warning);
    Ok(())
}

#[test]
fn test_all_errors_reported_together() {
    let err = AgentConfig::from_value(&json!({
        "environment": 3,
        "scan_interval": "fast",
        "modules": [""],
        "log_level": "TRACE",
        "targets": [["h"], {"host": "h"}]
    }))
    .unwrap_err();

    for field in ["environment", "scan_interval", "modules", "log_level", "targets"] {
        assert!(err.names(field), "{} should be reported: {}", field, err);
    }

    let kinds: Vec<FieldErrorKind> = err.errors().iter().map(|e| e.kind).collect();
    assert!(kinds.contains(&FieldErrorKind::WrongType));
    assert!(kinds.contains(&FieldErrorKind::Empty));
    assert!(kinds.contains(&FieldErrorKind::InvalidEnum));
    assert!(kinds.contains(&FieldErrorKind::MalformedTarget));
    assert!(kinds.contains(&FieldErrorKind::Missing));
}

#[test]
fn test_add_remove_round_trip() -> Result<()> {
    let mut config = AgentConfig::from_value(&common::full_mapping())?;
    let before = config.get_targets_as_tuples();

    config.add_target("h", 9000)?;
    assert_eq!(config.targets().len(), before.len() + 1);

    config.remove_target("h", 9000);
    assert_eq!(config.get_targets_as_tuples(), before);

    config.remove_target("not-there", 1);
    assert_eq!(config.get_targets_as_tuples(), before);
    Ok(())
}
