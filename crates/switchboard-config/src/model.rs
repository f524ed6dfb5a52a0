// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Switchboard.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level Switchboard configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections default to sensible values; the platform
/// identifiers are checked by validation rather than by deserialization.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SwitchboardConfig {
    /// Platform account identity and endpoints.
    #[serde(default)]
    pub platform: PlatformConfig,

    /// Retry policy for the request client.
    #[serde(default)]
    pub retry: RetryConfig,

    /// Browser automation settings.
    #[serde(default)]
    pub browser: BrowserConfig,

    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

/// Platform account identity and endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PlatformConfig {
    /// API key sent as the `key` query parameter.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Account identifier sent as `account_id`.
    #[serde(default)]
    pub account_id: Option<String>,

    /// Phone line identifier sent as `phone_id`.
    #[serde(default)]
    pub phone_id: Option<String>,

    /// Server selector that picks the API host (e.g. `s12`).
    #[serde(default)]
    pub server: Option<String>,

    /// Explicit API base URL. When unset it is derived from `server`.
    #[serde(default)]
    pub api_base_url: Option<String>,

    /// Origin of the web app driven by the browser pipeline.
    #[serde(default = "default_web_url")]
    pub web_url: String,

    /// Country prefix prepended to domestic phone numbers.
    #[serde(default = "default_country_code")]
    pub country_code: String,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            account_id: None,
            phone_id: None,
            server: None,
            api_base_url: None,
            web_url: default_web_url(),
            country_code: default_country_code(),
        }
    }
}

impl PlatformConfig {
    /// Resolves the RPC endpoint URL.
    ///
    /// Returns `None` when neither `api_base_url` nor `server` is set.
    pub fn resolved_api_url(&self) -> Option<String> {
        if let Some(url) = self.api_base_url.as_deref().filter(|u| !u.trim().is_empty()) {
            return Some(url.trim().to_string());
        }
        self.server
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|server| format!("https://{server}.switchboard-chat.app/api"))
    }
}

fn default_web_url() -> String {
    "https://web.switchboard-chat.app".to_string()
}

fn default_country_code() -> String {
    "55".to_string()
}

/// Retry policy for outbound platform calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    /// Total attempts per call, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry, in milliseconds. Doubles per attempt.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Upper bound for any single retry delay, in milliseconds.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Per-attempt HTTP timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    8000
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Browser automation configuration.
///
/// The settle durations exist because the web app renders asynchronously
/// and exposes no completion signal.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BrowserConfig {
    /// Path to the session artifact written by the login flow.
    #[serde(default = "default_session_file")]
    pub session_file: String,

    /// Run Chromium without a visible window.
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Chromium executable. Auto-detected when unset.
    #[serde(default)]
    pub executable: Option<String>,

    /// Launch Chromium with `--no-sandbox` (needed when running as root in containers).
    #[serde(default)]
    pub no_sandbox: bool,

    /// Upper bound for a single page navigation, in seconds.
    #[serde(default = "default_navigation_timeout_secs")]
    pub navigation_timeout_secs: u64,

    /// Pause after the document commits, in milliseconds.
    #[serde(default = "default_navigation_settle_ms")]
    pub navigation_settle_ms: u64,

    /// Pause after each applied list filter, in milliseconds.
    #[serde(default = "default_filter_settle_ms")]
    pub filter_settle_ms: u64,

    /// Pause after each scroll step, in milliseconds.
    #[serde(default = "default_scroll_settle_ms")]
    pub scroll_settle_ms: u64,

    /// Pause after removing overlays, in milliseconds.
    #[serde(default = "default_overlay_settle_ms")]
    pub overlay_settle_ms: u64,

    /// Maximum scroll steps while lazy-loading a list or conversation.
    #[serde(default = "default_max_scroll_iterations")]
    pub max_scroll_iterations: u32,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            session_file: default_session_file(),
            headless: default_headless(),
            executable: None,
            no_sandbox: false,
            navigation_timeout_secs: default_navigation_timeout_secs(),
            navigation_settle_ms: default_navigation_settle_ms(),
            filter_settle_ms: default_filter_settle_ms(),
            scroll_settle_ms: default_scroll_settle_ms(),
            overlay_settle_ms: default_overlay_settle_ms(),
            max_scroll_iterations: default_max_scroll_iterations(),
        }
    }
}

impl BrowserConfig {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }
}

fn default_session_file() -> String {
    dirs::data_dir()
        .map(|p| p.join("switchboard").join("session.json"))
        .unwrap_or_else(|| std::path::PathBuf::from("session.json"))
        .to_string_lossy()
        .into_owned()
}

fn default_headless() -> bool {
    true
}

fn default_navigation_timeout_secs() -> u64 {
    60
}

fn default_navigation_settle_ms() -> u64 {
    5000
}

fn default_filter_settle_ms() -> u64 {
    1500
}

fn default_scroll_settle_ms() -> u64 {
    1200
}

fn default_overlay_settle_ms() -> u64 {
    500
}

fn default_max_scroll_iterations() -> u32 {
    30
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
