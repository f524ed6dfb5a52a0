// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Switchboard configuration system.

use std::io::Write;

use switchboard_config::diagnostic::ConfigError;
use switchboard_config::model::SwitchboardConfig;
use switchboard_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};

const IDENTIFIERS: &str = r#"
[platform]
api_key = "k-123"
account_id = "acc-9"
phone_id = "ph-4"
server = "s12"
"#;

/// Valid TOML with every section deserializes successfully.
#[test]
fn valid_toml_deserializes_into_config() {
    let toml = r#"
[platform]
api_key = "k-123"
account_id = "acc-9"
phone_id = "ph-4"
server = "s12"
web_url = "https://chat.example.test"
country_code = "1"

[retry]
max_attempts = 5
base_delay_ms = 200
max_delay_ms = 1000
request_timeout_secs = 10

[browser]
session_file = "/tmp/session.json"
headless = false
executable = "/usr/bin/chromium"
navigation_timeout_secs = 45
navigation_settle_ms = 3000
filter_settle_ms = 800
scroll_settle_ms = 600
overlay_settle_ms = 250
max_scroll_iterations = 12

[log]
level = "debug"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.platform.api_key.as_deref(), Some("k-123"));
    assert_eq!(config.platform.server.as_deref(), Some("s12"));
    assert_eq!(config.platform.web_url, "https://chat.example.test");
    assert_eq!(config.platform.country_code, "1");
    assert_eq!(config.retry.max_attempts, 5);
    assert_eq!(config.retry.base_delay_ms, 200);
    assert_eq!(config.browser.session_file, "/tmp/session.json");
    assert!(!config.browser.headless);
    assert_eq!(config.browser.executable.as_deref(), Some("/usr/bin/chromium"));
    assert_eq!(config.browser.max_scroll_iterations, 12);
    assert_eq!(config.log.level, "debug");
}

/// Missing sections fall back to defaults.
#[test]
fn missing_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert!(config.platform.api_key.is_none());
    assert_eq!(config.platform.country_code, "55");
    assert_eq!(config.retry.max_attempts, 3);
    assert_eq!(config.retry.base_delay_ms, 1000);
    assert_eq!(config.retry.max_delay_ms, 8000);
    assert!(config.browser.headless);
    assert_eq!(config.browser.navigation_settle_ms, 5000);
    assert_eq!(config.browser.max_scroll_iterations, 30);
    assert!(config.browser.session_file.ends_with("session.json"));
    assert_eq!(config.log.level, "info");
}

/// Dotted overrides (what the env provider produces) reach nested fields.
#[test]
fn dotted_override_reaches_platform_section() {
    use figment::{
        providers::{Format, Serialized, Toml},
        Figment,
    };

    let config: SwitchboardConfig = Figment::new()
        .merge(Serialized::defaults(SwitchboardConfig::default()))
        .merge(Toml::string(IDENTIFIERS))
        .merge(("platform.api_key", "from-env"))
        .merge(("browser.session_file", "/run/session.json"))
        .extract()
        .expect("should merge overrides");

    assert_eq!(config.platform.api_key.as_deref(), Some("from-env"));
    assert_eq!(config.platform.account_id.as_deref(), Some("acc-9"));
    assert_eq!(config.browser.session_file, "/run/session.json");
}

/// Unknown keys produce a diagnostic with a suggestion.
#[test]
fn unknown_key_suggests_correction() {
    let toml = format!("{IDENTIFIERS}\n[browser]\nheadles = true\n");

    let errors = load_and_validate_str(&toml).expect_err("should reject unknown key");
    let found = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, valid_keys, .. }
            if key == "headles"
                && suggestion.as_deref() == Some("headless")
                && valid_keys.contains("session_file"))
    });
    assert!(found, "expected UnknownKey for `headles`, got: {errors:?}");
}

/// Unknown top-level sections are rejected.
#[test]
fn unknown_section_rejected() {
    let err = load_config_from_str("[telemetry]\nenabled = true\n")
        .expect_err("unknown section should be rejected");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("telemetry"),
        "got: {err_str}"
    );
}

/// Wrong value types are reported as InvalidType.
#[test]
fn invalid_type_reported() {
    let toml = format!("{IDENTIFIERS}\n[retry]\nmax_attempts = \"three\"\n");
    let errors = load_and_validate_str(&toml).expect_err("should reject invalid type");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key.contains("max_attempts"))),
        "got: {errors:?}"
    );
}

/// Without the platform identifiers, validation fails with one error per identifier.
#[test]
fn missing_identifiers_are_fatal() {
    let errors = load_and_validate_str("").expect_err("identifiers are required");
    let count = errors
        .iter()
        .filter(|e| matches!(e, ConfigError::MissingIdentifier { .. }))
        .count();
    assert_eq!(count, 4);
}

/// A complete file on disk loads and validates.
#[test]
fn load_and_validate_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{IDENTIFIERS}\n[log]\nlevel = \"warn\"\n").unwrap();

    let config = load_and_validate_path(file.path()).expect("file config should validate");
    assert_eq!(config.log.level, "warn");
    assert_eq!(
        config.platform.resolved_api_url().as_deref(),
        Some("https://s12.switchboard-chat.app/api")
    );
}

/// ConfigError renders through miette.
#[test]
fn config_error_renders_with_miette() {
    use miette::GraphicalReportHandler;

    let error = ConfigError::MissingIdentifier {
        key: "server".to_string(),
        env_var: "SWITCHBOARD_SERVER".to_string(),
    };

    let mut buf = String::new();
    GraphicalReportHandler::new()
        .render_report(&mut buf, &error)
        .expect("should render without error");
    assert!(buf.contains("platform.server"));
}
