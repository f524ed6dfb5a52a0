// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contact tools backed by the platform RPC endpoint.
//!
//! Phone numbers are normalized before every call; the platform's JSON
//! payload is returned pretty-printed.

use async_trait::async_trait;
use serde::Deserialize;
use switchboard_core::SwitchboardError;
use tracing::info;

use super::Backends;
use crate::tool::{parse_input, Tool, ToolOutput};

fn non_empty(field: &str, value: &str) -> Result<(), SwitchboardError> {
    if value.trim().is_empty() {
        return Err(SwitchboardError::InvalidInput(format!(
            "'{field}' must not be empty"
        )));
    }
    Ok(())
}

/// Sends a text message to a contact.
pub struct SendMessageTool {
    backends: Backends,
}

impl SendMessageTool {
    pub fn new(backends: Backends) -> Self {
        Self { backends }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SendMessageInput {
    phone: String,
    text: String,
}

#[async_trait]
impl Tool for SendMessageTool {
    fn name(&self) -> &str {
        "send_message"
    }

    fn description(&self) -> &str {
        "Send a text message to a contact by phone number"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "phone": {
                    "type": "string",
                    "description": "Contact phone number, with or without country code"
                },
                "text": {
                    "type": "string",
                    "description": "Message body"
                }
            },
            "required": ["phone", "text"]
        })
    }

    async fn invoke(&self, input: serde_json::Value) -> Result<ToolOutput, SwitchboardError> {
        let input: SendMessageInput = parse_input(self.name(), input)?;
        non_empty("text", &input.text)?;
        let phone = self.backends.phone(&input.phone)?;
        let payload = self.backends.client.send_message(&phone, &input.text).await?;
        info!(%phone, "message sent");
        Ok(ToolOutput::json(&payload))
    }
}

/// Looks up a contact's details.
pub struct GetContactTool {
    backends: Backends,
}

impl GetContactTool {
    pub fn new(backends: Backends) -> Self {
        Self { backends }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GetContactInput {
    phone: String,
}

#[async_trait]
impl Tool for GetContactTool {
    fn name(&self) -> &str {
        "get_contact"
    }

    fn description(&self) -> &str {
        "Get a contact's details by phone number"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "phone": {
                    "type": "string",
                    "description": "Contact phone number, with or without country code"
                }
            },
            "required": ["phone"]
        })
    }

    async fn invoke(&self, input: serde_json::Value) -> Result<ToolOutput, SwitchboardError> {
        let input: GetContactInput = parse_input(self.name(), input)?;
        let phone = self.backends.phone(&input.phone)?;
        let payload = self.backends.client.get_contact(&phone).await?;
        Ok(ToolOutput::json(&payload))
    }
}

/// Transfers a contact's chat to another department or operator.
pub struct TransferChatTool {
    backends: Backends,
}

impl TransferChatTool {
    pub fn new(backends: Backends) -> Self {
        Self { backends }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TransferChatInput {
    phone: String,
    department: String,
}

#[async_trait]
impl Tool for TransferChatTool {
    fn name(&self) -> &str {
        "transfer_chat"
    }

    fn description(&self) -> &str {
        "Transfer a contact's chat to a department or operator"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "phone": {
                    "type": "string",
                    "description": "Contact phone number, with or without country code"
                },
                "department": {
                    "type": "string",
                    "description": "Target department or operator identifier"
                }
            },
            "required": ["phone", "department"]
        })
    }

    async fn invoke(&self, input: serde_json::Value) -> Result<ToolOutput, SwitchboardError> {
        let input: TransferChatInput = parse_input(self.name(), input)?;
        non_empty("department", &input.department)?;
        let phone = self.backends.phone(&input.phone)?;
        let payload = self
            .backends
            .client
            .transfer_chat(&phone, input.department.trim())
            .await?;
        info!(%phone, department = input.department.trim(), "chat transferred");
        Ok(ToolOutput::json(&payload))
    }
}
