// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed wrappers for the platform actions Switchboard exposes directly.
//!
//! Each action has a fixed parameter transport required by the platform;
//! the [`RpcAction`] records it so callers cannot get it wrong.

use switchboard_core::PhoneNumber;

use crate::client::{CallOptions, PlatformClient, RequestOutcome};

/// Name and parameter placement of a platform action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RpcAction {
    pub name: &'static str,
    pub params_in_query: bool,
}

impl RpcAction {
    pub fn options(&self) -> CallOptions {
        CallOptions {
            max_attempts: None,
            params_in_query: self.params_in_query,
        }
    }
}

pub const SEND_MESSAGE: RpcAction = RpcAction {
    name: "send_message",
    params_in_query: false,
};

/// The contact lookup endpoint ignores form bodies.
pub const GET_CONTACT: RpcAction = RpcAction {
    name: "get_contact",
    params_in_query: true,
};

pub const TRANSFER_CHAT: RpcAction = RpcAction {
    name: "transfer_chat",
    params_in_query: false,
};

impl PlatformClient {
    /// Calls `action` with its required parameter placement.
    pub async fn invoke(&self, action: RpcAction, params: &[(&str, &str)]) -> RequestOutcome {
        self.call(action.name, params, action.options()).await
    }

    /// Sends a text message to `phone`.
    pub async fn send_message(&self, phone: &PhoneNumber, text: &str) -> RequestOutcome {
        self.invoke(SEND_MESSAGE, &[("phone", phone.as_str()), ("text", text)])
            .await
    }

    /// Looks up the contact registered under `phone`.
    pub async fn get_contact(&self, phone: &PhoneNumber) -> RequestOutcome {
        self.invoke(GET_CONTACT, &[("phone", phone.as_str())]).await
    }

    /// Moves the open chat with `phone` to another department.
    pub async fn transfer_chat(&self, phone: &PhoneNumber, department: &str) -> RequestOutcome {
        self.invoke(
            TRANSFER_CHAT,
            &[("phone", phone.as_str()), ("department", department)],
        )
        .await
    }
}
