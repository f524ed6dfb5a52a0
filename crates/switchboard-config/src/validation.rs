// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes:
//! required platform identifiers, URL shapes, and timing bounds.

use crate::diagnostic::ConfigError;
use crate::model::SwitchboardConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &SwitchboardConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let platform = &config.platform;
    let identifiers = [
        ("api_key", &platform.api_key),
        ("account_id", &platform.account_id),
        ("phone_id", &platform.phone_id),
        ("server", &platform.server),
    ];
    for (key, value) in identifiers {
        if value.as_deref().is_none_or(|v| v.trim().is_empty()) {
            errors.push(ConfigError::MissingIdentifier {
                key: key.to_string(),
                env_var: format!("SWITCHBOARD_{}", key.to_uppercase()),
            });
        }
    }

    if let Some(api_url) = platform.api_base_url.as_deref() {
        check_http_url("platform.api_base_url", api_url, &mut errors);
    }
    check_http_url("platform.web_url", &platform.web_url, &mut errors);

    if platform.country_code.is_empty()
        || !platform.country_code.chars().all(|c| c.is_ascii_digit())
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "platform.country_code must be digits only, got `{}`",
                platform.country_code
            ),
        });
    }

    let retry = &config.retry;
    if retry.max_attempts == 0 {
        errors.push(ConfigError::Validation {
            message: "retry.max_attempts must be at least 1".to_string(),
        });
    }
    if retry.base_delay_ms > retry.max_delay_ms {
        errors.push(ConfigError::Validation {
            message: format!(
                "retry.base_delay_ms ({}) must not exceed retry.max_delay_ms ({})",
                retry.base_delay_ms, retry.max_delay_ms
            ),
        });
    }
    if retry.request_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "retry.request_timeout_secs must be greater than 0".to_string(),
        });
    }

    let browser = &config.browser;
    if browser.session_file.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "browser.session_file must not be empty".to_string(),
        });
    }
    if browser.navigation_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "browser.navigation_timeout_secs must be greater than 0".to_string(),
        });
    }
    if browser.max_scroll_iterations == 0 {
        errors.push(ConfigError::Validation {
            message: "browser.max_scroll_iterations must be at least 1".to_string(),
        });
    }

    const LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
    if !LEVELS.contains(&config.log.level.to_lowercase().as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "log.level `{}` is not one of {}",
                config.log.level,
                LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_http_url(key: &str, value: &str, errors: &mut Vec<ConfigError>) {
    match url::Url::parse(value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
        Ok(parsed) => errors.push(ConfigError::Validation {
            message: format!("{key} must use http or https, got `{}`", parsed.scheme()),
        }),
        Err(e) => errors.push(ConfigError::Validation {
            message: format!("{key} `{value}` is not a valid URL: {e}"),
        }),
    }
}
