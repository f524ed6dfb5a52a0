// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat tools backed by the browser pipeline.
//!
//! Both return `{ "count", "chats" | "messages", "notes" }`.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use switchboard_browser::{DEFAULT_MESSAGE_LIMIT, MAX_MESSAGE_LIMIT};
use switchboard_core::types::MAX_LIST_LIMIT;
use switchboard_core::{FilterCriteria, SwitchboardError};

use super::Backends;
use crate::tool::{parse_input, Tool, ToolOutput};

/// Lists chats from the web app's chat list.
pub struct ListChatsTool {
    backends: Backends,
}

impl ListChatsTool {
    pub fn new(backends: Backends) -> Self {
        Self { backends }
    }
}

#[async_trait]
impl Tool for ListChatsTool {
    fn name(&self) -> &str {
        "list_chats"
    }

    fn description(&self) -> &str {
        "List chats from the web app, optionally filtered by status, flags, department, name or phone"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "status": {
                    "type": "string",
                    "enum": ["waiting", "in_service", "finished"],
                    "description": "Attendance status"
                },
                "unread_only": { "type": "boolean", "description": "Only chats with unread messages" },
                "archived": { "type": "boolean", "description": "Show archived chats" },
                "favorited": { "type": "boolean", "description": "Only favorited chats" },
                "order": {
                    "type": "string",
                    "enum": ["newest", "oldest"],
                    "description": "Sort order"
                },
                "department": { "type": "string", "description": "Department or assignee name" },
                "name": { "type": "string", "description": "Contact name contains" },
                "phone": { "type": "string", "description": "Contact phone contains" },
                "limit": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": MAX_LIST_LIMIT,
                    "description": "Maximum chats to return (default 20)"
                }
            }
        })
    }

    async fn invoke(&self, input: serde_json::Value) -> Result<ToolOutput, SwitchboardError> {
        let criteria: FilterCriteria = parse_input(self.name(), input)?;
        let listing = self.backends.pipeline.list_chats(&criteria).await?;
        Ok(ToolOutput::json(&json!({
            "count": listing.chats.len(),
            "chats": listing.chats,
            "notes": listing.notes,
        })))
    }
}

/// Reads recent messages of one chat.
pub struct ReadMessagesTool {
    backends: Backends,
}

impl ReadMessagesTool {
    pub fn new(backends: Backends) -> Self {
        Self { backends }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ReadMessagesInput {
    chat_id: String,
    #[serde(default)]
    limit: Option<usize>,
}

#[async_trait]
impl Tool for ReadMessagesTool {
    fn name(&self) -> &str {
        "read_messages"
    }

    fn description(&self) -> &str {
        "Read the most recent messages of a chat, oldest first"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "chat_id": {
                    "type": "string",
                    "description": "Chat identifier as returned by list_chats"
                },
                "limit": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": MAX_MESSAGE_LIMIT,
                    "description": "Maximum messages to return (default 50)"
                }
            },
            "required": ["chat_id"]
        })
    }

    async fn invoke(&self, input: serde_json::Value) -> Result<ToolOutput, SwitchboardError> {
        let input: ReadMessagesInput = parse_input(self.name(), input)?;
        let limit = input.limit.unwrap_or(DEFAULT_MESSAGE_LIMIT);
        let history = self
            .backends
            .pipeline
            .read_messages(&input.chat_id, limit)
            .await?;
        Ok(ToolOutput::json(&json!({
            "chat_id": history.chat_id,
            "count": history.messages.len(),
            "messages": history.messages,
            "notes": history.notes,
        })))
    }
}
