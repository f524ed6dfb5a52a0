// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Switchboard.
//!
//! Provides the shared error type, the chat/contact domain types produced by
//! the request client and the browser pipeline, and phone normalization.

pub mod error;
pub mod phone;
pub mod types;

pub use error::SwitchboardError;
pub use phone::normalize;
pub use types::{
    ChatMessage, ChatOrder, ChatStatus, ChatSummary, FilterCriteria, PhoneNumber, SenderRole,
};
