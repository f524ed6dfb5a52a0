// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Snapshot fixtures in the shape the page scripts return.

use serde_json::{json, Value};

/// Chat card `index`, named "Contact {index}" with id "chat-{index}".
pub fn chat_card(index: usize) -> Value {
    json!({
        "name": format!("Contact {index}"),
        "status": if index % 2 == 0 { "Waiting" } else { "In serv." },
        "unread": if index % 3 == 0 { "2" } else { "" },
        "time": "10:42",
        "preview_title": format!("Full preview of message {index}"),
        "preview_text": "Full preview of mes…",
        "data_id": format!("chat-{index}"),
        "internal_id": null,
    })
}

/// A chat card with no data attribute, only a framework-state id (or none).
pub fn chat_card_without_data_id(name: &str, internal_id: Option<&str>) -> Value {
    json!({
        "name": name,
        "status": "Finished",
        "unread": "",
        "time": "Yesterday",
        "preview_title": null,
        "preview_text": "bye",
        "data_id": null,
        "internal_id": internal_id,
    })
}

pub fn message_row(outgoing: bool, text: &str, time: &str) -> Value {
    json!({ "kind": "message", "outgoing": outgoing, "text": text, "time": time, "audio": false })
}

pub fn audio_row(outgoing: bool, time: &str) -> Value {
    json!({ "kind": "message", "outgoing": outgoing, "text": "", "time": time, "audio": true })
}

pub fn date_separator(label: &str) -> Value {
    json!({ "kind": "date", "label": label })
}

/// A conversation of `days` date groups with `per_day` alternating messages
/// each, texts "d{day}-m{n}".
pub fn conversation(days: usize, per_day: usize) -> Vec<Value> {
    let mut nodes = Vec::new();
    for day in 0..days {
        nodes.push(date_separator(&format!("Day {day}")));
        for n in 0..per_day {
            nodes.push(message_row(
                n % 2 == 1,
                &format!("d{day}-m{n}"),
                &format!("{:02}:{:02}", 9 + n / 60, n % 60),
            ));
        }
    }
    nodes
}
