// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subcommand implementations.

use serde::Serialize;
use switchboard_api::PlatformClient;
use switchboard_browser::{ChatPipeline, SessionStore};
use switchboard_config::SwitchboardConfig;
use switchboard_core::SwitchboardError;
use switchboard_tools::{register_builtins, Backends, ToolOutput, ToolRegistry};

/// Builds the registry with every built-in tool wired to its backend.
pub fn build_registry(config: &SwitchboardConfig) -> Result<ToolRegistry, SwitchboardError> {
    let client = PlatformClient::from_config(&config.platform, &config.retry)?;
    let pipeline = ChatPipeline::from_config(config)?;
    let backends =
        Backends::new(client, pipeline).with_country_code(config.platform.country_code.clone());

    let mut registry = ToolRegistry::new();
    register_builtins(&mut registry, &backends);
    Ok(registry)
}

/// `switchboard tools`: tool definitions as pretty JSON.
pub fn run_tools(registry: &ToolRegistry) -> String {
    let defs = serde_json::Value::Array(registry.tool_definitions());
    serde_json::to_string_pretty(&defs).unwrap_or_else(|_| defs.to_string())
}

/// `switchboard call`: dispatches one tool call.
pub async fn run_call(registry: &ToolRegistry, tool: &str, input: Option<&str>) -> ToolOutput {
    let input = match input {
        Some(raw) => match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => return ToolOutput::error(format!("--input is not valid JSON: {e}")),
        },
        None => serde_json::json!({}),
    };
    registry.dispatch(tool, input).await
}

/// State of the saved browser session.
#[derive(Debug, Serialize)]
pub struct SessionReport {
    pub path: String,
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookies: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origins: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_storage_entries: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SessionReport {
    /// A session is usable when the artifact exists and parses.
    pub fn is_usable(&self) -> bool {
        self.exists && self.error.is_none()
    }
}

/// `switchboard session`: inspects the session artifact without launching
/// a browser.
pub async fn run_session(config: &SwitchboardConfig) -> Result<SessionReport, SwitchboardError> {
    let store = SessionStore::from_config(&config.platform, &config.browser)?;
    let mut report = SessionReport {
        path: store.session_file().display().to_string(),
        exists: store.exists(),
        cookies: None,
        origins: None,
        local_storage_entries: None,
        error: None,
    };
    if !report.exists {
        return Ok(report);
    }
    match store.load_artifact().await {
        Ok(artifact) => {
            report.cookies = Some(artifact.cookie_count());
            report.origins = Some(artifact.origin_count());
            report.local_storage_entries = Some(artifact.storage_entry_count());
        }
        Err(e) => report.error = Some(e.to_string()),
    }
    Ok(report)
}
