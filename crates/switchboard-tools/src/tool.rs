// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool trait and registry.
//!
//! The [`Tool`] trait is the interface every capability exposed to the
//! automated caller implements. The [`ToolRegistry`] looks tools up by name,
//! renders their definitions, and dispatches calls so that every failure
//! comes back as an error-flagged [`ToolOutput`] rather than an `Err`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use switchboard_core::SwitchboardError;
use tracing::{debug, info, warn};

/// Output from a tool invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOutput {
    /// Text returned to the caller (usually JSON).
    pub content: String,
    /// Whether the invocation failed.
    pub is_error: bool,
}

impl ToolOutput {
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: true,
        }
    }

    /// Pretty-printed JSON output.
    pub fn json(value: &serde_json::Value) -> Self {
        Self::success(serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()))
    }
}

/// A named capability with a JSON Schema for its input.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name, used for lookup.
    fn name(&self) -> &str;

    /// What the tool does, for the caller.
    fn description(&self) -> &str;

    /// JSON Schema describing the input object.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Invokes the tool with a JSON input object.
    async fn invoke(&self, input: serde_json::Value) -> Result<ToolOutput, SwitchboardError>;
}

/// Decodes a tool input object into its typed parameters.
pub fn parse_input<T: DeserializeOwned>(
    tool: &str,
    input: serde_json::Value,
) -> Result<T, SwitchboardError> {
    let input = if input.is_null() {
        serde_json::Value::Object(Default::default())
    } else {
        input
    };
    serde_json::from_value(input)
        .map_err(|e| SwitchboardError::InvalidInput(format!("{tool}: {e}")))
}

/// Registry of available tools, indexed by name.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Registers a tool under its `name()`, replacing any previous one.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// (name, description) pairs sorted by name.
    pub fn list(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<(&str, &str)> = self
            .tools
            .values()
            .map(|t| (t.name(), t.description()))
            .collect();
        entries.sort_by_key(|(name, _)| *name);
        entries
    }

    /// Tool definitions sorted by name, each shaped as
    /// `{ "name", "description", "input_schema" }`.
    pub fn tool_definitions(&self) -> Vec<serde_json::Value> {
        let mut defs: Vec<serde_json::Value> = self
            .tools
            .values()
            .map(|t| {
                serde_json::json!({
                    "name": t.name(),
                    "description": t.description(),
                    "input_schema": t.parameters_schema(),
                })
            })
            .collect();
        defs.sort_by(|a, b| {
            a["name"]
                .as_str()
                .unwrap_or("")
                .cmp(b["name"].as_str().unwrap_or(""))
        });
        defs
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Invokes `name` with `input`. Unknown tools and every tool failure are
    /// returned as error outputs carrying a descriptive message.
    pub async fn dispatch(&self, name: &str, input: serde_json::Value) -> ToolOutput {
        let Some(tool) = self.get(name) else {
            return ToolOutput::error(self.unknown_tool_message(name));
        };
        debug!(tool = name, "dispatching tool call");
        match tool.invoke(input).await {
            Ok(output) => output,
            Err(err) => {
                if err.is_precondition() {
                    info!(tool = name, error = %err, "tool call needs a fresh session");
                } else {
                    warn!(tool = name, error = %err, "tool call failed");
                }
                ToolOutput::error(err.to_string())
            }
        }
    }

    fn unknown_tool_message(&self, name: &str) -> String {
        let names: Vec<&str> = self.list().into_iter().map(|(n, _)| n).collect();
        let suggestion = names
            .iter()
            .map(|candidate| (*candidate, strsim::jaro_winkler(name, candidate)))
            .filter(|(_, score)| *score > 0.8)
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(candidate, _)| candidate);
        match suggestion {
            Some(candidate) => format!("unknown tool '{name}'. Did you mean '{candidate}'?"),
            None => format!("unknown tool '{name}'. Available: {}", names.join(", ")),
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
