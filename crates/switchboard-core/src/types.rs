// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the request client, the browser pipeline, and tools.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Hard cap on the number of chats a single list call may return.
pub const MAX_LIST_LIMIT: usize = 100;

/// Number of chats returned when the caller does not ask for a specific count.
pub const DEFAULT_LIST_LIMIT: usize = 20;

/// Body text substituted for voice notes that carry no text content.
pub const AUDIO_PLACEHOLDER: &str = "[audio]";

/// A canonical digit-only phone number including the country prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(pub String);

impl PhoneNumber {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Attendance status of a chat as shown in the web app.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ChatStatus {
    Waiting,
    InService,
    Finished,
    /// A label the web app rendered that is not one of the known statuses.
    Unknown,
}

impl ChatStatus {
    /// Parses the label rendered on a chat card.
    ///
    /// The list view abbreviates "In service" to "In serv." on narrow cards.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim().to_lowercase();
        match label.as_str() {
            "waiting" => Self::Waiting,
            "in service" | "in serv." | "in serv" => Self::InService,
            "finished" => Self::Finished,
            _ => Self::Unknown,
        }
    }

    /// Text to show for a rendered `label`: the full label of a known status,
    /// or the trimmed text itself when the status is not recognized.
    pub fn display_label(label: &str) -> String {
        match Self::from_label(label) {
            Self::Unknown => label.trim().to_string(),
            known => known.label().to_string(),
        }
    }

    /// Human-readable label, as the web app spells it out in full.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Waiting => "Waiting",
            Self::InService => "In service",
            Self::Finished => "Finished",
            Self::Unknown => "Unknown",
        }
    }
}

/// Ordering applied to the chat list.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ChatOrder {
    Newest,
    Oldest,
}

/// Filters recognized by the chat list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterCriteria {
    #[serde(deserialize_with = "filterable_status")]
    pub status: Option<ChatStatus>,
    pub unread_only: bool,
    pub archived: bool,
    pub favorited: bool,
    pub order: Option<ChatOrder>,
    /// Department or assignee name, matched against the filter labels.
    pub department: Option<String>,
    /// Contact-name substring.
    pub name: Option<String>,
    /// Phone-number substring.
    pub phone: Option<String>,
    /// Requested number of chats; capped at [`MAX_LIST_LIMIT`].
    pub limit: Option<usize>,
}

impl FilterCriteria {
    /// Number of chats to collect, after applying the default and the hard cap.
    pub fn effective_limit(&self) -> usize {
        self.limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(1, MAX_LIST_LIMIT)
    }

    /// True when no filter would change the default listing.
    pub fn is_unfiltered(&self) -> bool {
        self.status.is_none()
            && !self.unread_only
            && !self.archived
            && !self.favorited
            && self.order.is_none()
            && self.department.as_deref().is_none_or(|d| d.trim().is_empty())
            && self.name.as_deref().is_none_or(|n| n.trim().is_empty())
            && self.phone.as_deref().is_none_or(|p| p.trim().is_empty())
    }
}

/// `unknown` only describes rendered cards; the list view has no such filter.
fn filterable_status<'de, D>(deserializer: D) -> Result<Option<ChatStatus>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Option::<ChatStatus>::deserialize(deserializer)? {
        Some(ChatStatus::Unknown) => Err(serde::de::Error::custom(
            "status filter must be one of waiting, in_service, finished",
        )),
        status => Ok(status),
    }
}

/// One entry of a chat listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSummary {
    pub name: String,
    pub status: ChatStatus,
    /// Status text as rendered, with abbreviations spelled out.
    pub status_label: String,
    pub last_message: String,
    /// Free text as rendered by the web app ("10:42", "Yesterday").
    pub last_activity: String,
    pub unread: u32,
    /// Opaque chat identifier; empty when it could not be recovered.
    pub chat_id: String,
}

/// Who sent a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SenderRole {
    /// The account operator (outgoing message).
    Operator,
    /// The contact on the other side (incoming message).
    Counterpart,
}

/// One message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: SenderRole,
    /// Free text as rendered next to the bubble.
    pub time: String,
    /// Date-group separator the message appears under ("Today", "03/05/2026").
    pub date: String,
    /// Message text, or [`AUDIO_PLACEHOLDER`] for voice notes.
    pub text: String,
}
