// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turning raw page snapshots into domain records.
//!
//! The in-page scripts only collect strings; every interpretation (status
//! normalization, unread parsing, id precedence, date grouping, windowing)
//! happens here, as pure functions over the contents of a [`PageSnapshot`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use switchboard_core::types::AUDIO_PLACEHOLDER;
use switchboard_core::{ChatMessage, ChatStatus, ChatSummary, SenderRole, SwitchboardError};

/// A chat card as read from the list, before interpretation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawChatCard {
    pub name: String,
    pub status: String,
    pub unread: String,
    pub time: String,
    pub preview_title: Option<String>,
    pub preview_text: String,
    pub data_id: Option<String>,
    pub internal_id: Option<String>,
}

/// One node of a conversation, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConversationNode {
    /// A date-group separator.
    Date { label: String },
    Message {
        outgoing: bool,
        #[serde(default)]
        text: String,
        #[serde(default)]
        time: String,
        #[serde(default)]
        audio: bool,
    },
}

/// What a page showed at the moment it was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSnapshot {
    ChatList(Vec<RawChatCard>),
    Conversation(Vec<ConversationNode>),
}

impl PageSnapshot {
    /// Decodes the result of the chat-card script. `null` means the list
    /// container was not on the page.
    pub fn chat_list_from_value(value: Value) -> Result<Option<Self>, SwitchboardError> {
        decode::<Vec<RawChatCard>>(value, "chat cards").map(|cards| cards.map(Self::ChatList))
    }

    /// Decodes the result of the conversation script. `null` means the
    /// conversation container was not on the page.
    pub fn conversation_from_value(value: Value) -> Result<Option<Self>, SwitchboardError> {
        decode::<Vec<ConversationNode>>(value, "conversation")
            .map(|nodes| nodes.map(Self::Conversation))
    }
}

fn decode<T: serde::de::DeserializeOwned>(
    value: Value,
    what: &str,
) -> Result<Option<T>, SwitchboardError> {
    if value.is_null() {
        return Ok(None);
    }
    serde_json::from_value(value)
        .map(Some)
        .map_err(|e| SwitchboardError::Browser {
            message: format!("unexpected {what} snapshot shape: {e}"),
            source: Some(Box::new(e)),
        })
}

/// Where a chat id came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatIdSource {
    DataAttribute,
    InternalState,
    Unavailable,
}

/// Resolves a card's id: data attribute, then framework state, then empty.
pub fn resolve_chat_id(card: &RawChatCard) -> (String, ChatIdSource) {
    let non_empty = |v: &Option<String>| {
        v.as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    if let Some(id) = non_empty(&card.data_id) {
        (id, ChatIdSource::DataAttribute)
    } else if let Some(id) = non_empty(&card.internal_id) {
        (id, ChatIdSource::InternalState)
    } else {
        (String::new(), ChatIdSource::Unavailable)
    }
}

/// Parses the unread badge. Badges like "99+" count as their digits; anything
/// without leading digits is zero.
pub fn parse_unread(badge: &str) -> u32 {
    let digits: String = badge
        .trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().unwrap_or(0)
}

/// The full preview text from the `title` attribute when present, else the
/// visible (possibly truncated) text.
fn preview(card: &RawChatCard) -> String {
    card.preview_title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(card.preview_text.trim())
        .to_string()
}

/// Interprets chat cards in display order, truncated to `limit`.
pub fn extract_chats(cards: &[RawChatCard], limit: usize) -> Vec<ChatSummary> {
    cards
        .iter()
        .take(limit)
        .map(|card| ChatSummary {
            name: card.name.trim().to_string(),
            status: ChatStatus::from_label(&card.status),
            status_label: ChatStatus::display_label(&card.status),
            last_message: preview(card),
            last_activity: card.time.trim().to_string(),
            unread: parse_unread(&card.unread),
            chat_id: resolve_chat_id(card).0,
        })
        .collect()
}

/// Interprets a conversation, returning the trailing `limit` messages in
/// chronological order.
///
/// Each message takes the label of the nearest date separator above it.
/// Textless audio rows read as [`AUDIO_PLACEHOLDER`].
pub fn extract_messages(nodes: &[ConversationNode], limit: usize) -> Vec<ChatMessage> {
    let mut date = String::new();
    let mut messages = Vec::new();
    for node in nodes {
        match node {
            ConversationNode::Date { label } => date = label.trim().to_string(),
            ConversationNode::Message {
                outgoing,
                text,
                time,
                audio,
            } => {
                let text = text.trim();
                let text = if text.is_empty() && *audio {
                    AUDIO_PLACEHOLDER.to_string()
                } else {
                    text.to_string()
                };
                messages.push(ChatMessage {
                    sender: if *outgoing {
                        SenderRole::Operator
                    } else {
                        SenderRole::Counterpart
                    },
                    time: time.trim().to_string(),
                    date: date.clone(),
                    text,
                });
            }
        }
    }
    let start = messages.len().saturating_sub(limit);
    messages.split_off(start)
}
