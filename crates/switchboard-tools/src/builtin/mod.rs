// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in tools.
//!
//! Contact tools go through the platform RPC client; chat tools drive the web
//! app through the browser pipeline.

pub mod chats;
pub mod contacts;

pub use chats::{ListChatsTool, ReadMessagesTool};
pub use contacts::{GetContactTool, SendMessageTool, TransferChatTool};

use std::sync::Arc;

use switchboard_api::PlatformClient;
use switchboard_browser::ChatPipeline;
use switchboard_core::phone::{normalize_with_prefix, DOMESTIC_PREFIX};
use switchboard_core::{PhoneNumber, SwitchboardError};

use crate::ToolRegistry;

/// Shared backends for the built-in tools.
#[derive(Clone)]
pub struct Backends {
    pub client: Arc<PlatformClient>,
    pub pipeline: Arc<ChatPipeline>,
    /// Prefix given to domestic phone numbers.
    pub country_code: String,
}

impl Backends {
    pub fn new(client: PlatformClient, pipeline: ChatPipeline) -> Self {
        Self {
            client: Arc::new(client),
            pipeline: Arc::new(pipeline),
            country_code: DOMESTIC_PREFIX.to_string(),
        }
    }

    pub fn with_country_code(mut self, country_code: impl Into<String>) -> Self {
        self.country_code = country_code.into();
        self
    }

    /// Normalizes a caller-supplied phone number. Inputs without any digit
    /// are rejected.
    pub(crate) fn phone(&self, input: &str) -> Result<PhoneNumber, SwitchboardError> {
        let phone = normalize_with_prefix(input, &self.country_code);
        if phone.as_str().is_empty() {
            return Err(SwitchboardError::InvalidInput(format!(
                "'{input}' is not a phone number"
            )));
        }
        Ok(phone)
    }
}

/// Registers all built-in tools into the given registry.
pub fn register_builtins(registry: &mut ToolRegistry, backends: &Backends) {
    registry.register(Arc::new(SendMessageTool::new(backends.clone())));
    registry.register(Arc::new(GetContactTool::new(backends.clone())));
    registry.register(Arc::new(TransferChatTool::new(backends.clone())));
    registry.register(Arc::new(ListChatsTool::new(backends.clone())));
    registry.register(Arc::new(ReadMessagesTool::new(backends.clone())));
}
