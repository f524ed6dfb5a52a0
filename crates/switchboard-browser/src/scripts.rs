// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! DOM selectors and the in-page scripts that use them.
//!
//! Every script is an arrow function taking one JSON argument. Selectors are
//! passed in as arguments so that all knowledge of the web app's markup lives
//! in [`selectors`].

use serde_json::{json, Value};

/// Markup of the chat web app.
pub mod selectors {
    pub const CHAT_LIST: &str = "[data-testid='chat-list']";
    pub const CHAT_CARD: &str = "[data-testid='chat-card']";
    pub const CARD_NAME: &str = "[data-testid='chat-card-name']";
    pub const CARD_STATUS: &str = "[data-testid='chat-card-status']";
    pub const CARD_UNREAD: &str = "[data-testid='chat-card-unread']";
    pub const CARD_TIME: &str = "[data-testid='chat-card-time']";
    pub const CARD_PREVIEW: &str = "[data-testid='chat-card-preview']";
    pub const CARD_ID_ATTRIBUTE: &str = "data-chat-id";

    pub const NAME_FILTER: &str = "input[name='contact-name']";
    pub const PHONE_FILTER: &str = "input[name='contact-phone']";
    pub const STATUS_FILTER: &str = "select[name='status']";
    pub const ORDER_FILTER: &str = "select[name='order']";
    pub const UNREAD_TOGGLE: &str = "[data-filter='unread']";
    pub const ARCHIVED_TOGGLE: &str = "[data-filter='archived']";
    pub const FAVORITE_TOGGLE: &str = "[data-filter='favorite']";
    pub const DEPARTMENT_LABELS: &str = "[data-filter='department'] label";

    /// Transient overlays that intercept clicks and scrolling.
    pub const OVERLAYS: &[&str] = &[
        "[data-overlay='notification-permission']",
        ".notification-permission-modal",
        ".modal-backdrop",
    ];

    pub const CONVERSATION: &str = "[data-testid='conversation']";
    pub const MESSAGE_ROW: &str = "[data-testid='message']";
    pub const DATE_SEPARATOR: &str = "[data-testid='date-separator']";
    pub const MESSAGE_TEXT: &str = "[data-testid='message-text']";
    pub const MESSAGE_TIME: &str = "[data-testid='message-time']";
    pub const AUDIO_MARKER: &str = "audio, [data-testid='audio-player']";
    /// Class carried by rows the operator sent.
    pub const OUTGOING_CLASS: &str = "message-out";
}

/// Wraps a script and its argument into an evaluable expression.
pub fn call(script: &str, args: &Value) -> String {
    format!("({script})({args})")
}

/// Number of elements matching `item` inside `container`, or `null` when the
/// container is absent.
pub const COUNT_ITEMS: &str = r#"(args) => {
  const container = document.querySelector(args.container);
  if (!container) return null;
  return container.querySelectorAll(args.item).length;
}"#;

/// Sets a text input through the native value setter so framework-controlled
/// inputs observe the change, then presses Enter in it. The form itself is
/// never submitted.
pub const APPLY_TEXT_FILTER: &str = r#"(args) => {
  const input = document.querySelector(args.selector);
  if (!input) return { applied: false };
  const setter = Object.getOwnPropertyDescriptor(HTMLInputElement.prototype, "value").set;
  setter.call(input, args.value);
  input.dispatchEvent(new Event("input", { bubbles: true }));
  const enter = { key: "Enter", code: "Enter", keyCode: 13, bubbles: true };
  input.dispatchEvent(new KeyboardEvent("keydown", enter));
  input.dispatchEvent(new KeyboardEvent("keyup", enter));
  return { applied: true };
}"#;

/// Picks a select option by value, falling back to a case-insensitive match
/// on the option text.
pub const APPLY_SELECT_FILTER: &str = r#"(args) => {
  const select = document.querySelector(args.selector);
  if (!select) return { applied: false };
  const wanted = String(args.label).trim().toLowerCase();
  const option = Array.from(select.options).find((o) =>
    o.value === args.value || o.textContent.trim().toLowerCase() === wanted);
  if (!option) return { applied: false };
  const setter = Object.getOwnPropertyDescriptor(HTMLSelectElement.prototype, "value").set;
  setter.call(select, option.value);
  select.dispatchEvent(new Event("change", { bubbles: true }));
  return { applied: true, matched: option.textContent.trim() };
}"#;

/// Clicks a toggle unless it is a checkbox that is already checked.
pub const APPLY_TOGGLE_FILTER: &str = r#"(args) => {
  const toggle = document.querySelector(args.selector);
  if (!toggle) return { applied: false };
  const box = toggle.matches("input[type=checkbox]") ? toggle : toggle.querySelector("input[type=checkbox]");
  if (!(box && box.checked)) toggle.click();
  return { applied: true };
}"#;

/// Clicks the department label matching exactly (case-insensitive), else the
/// first label containing the wanted text.
pub const APPLY_DEPARTMENT_FILTER: &str = r#"(args) => {
  const labels = Array.from(document.querySelectorAll(args.selector));
  if (labels.length === 0) return { applied: false };
  const wanted = String(args.value).trim().toLowerCase();
  const text = (el) => el.textContent.trim();
  const exact = labels.find((l) => text(l).toLowerCase() === wanted);
  const target = exact || labels.find((l) => text(l).toLowerCase().includes(wanted));
  if (!target) return { applied: false };
  target.click();
  return { applied: true, matched: text(target), exact: Boolean(exact) };
}"#;

/// Removes every element matching any overlay selector. Returns the count.
pub const REMOVE_OVERLAYS: &str = r#"(args) => {
  let removed = 0;
  for (const selector of args.selectors) {
    for (const el of document.querySelectorAll(selector)) {
      el.remove();
      removed += 1;
    }
  }
  document.body && (document.body.style.overflow = "");
  return removed;
}"#;

/// Scrolls a container to its bottom. Returns false when it is absent.
pub const SCROLL_TO_BOTTOM: &str = r#"(args) => {
  const container = document.querySelector(args.container);
  if (!container) return false;
  container.scrollTop = container.scrollHeight;
  container.dispatchEvent(new Event("scroll", { bubbles: true }));
  return true;
}"#;

/// A point inside the container to aim wheel events at, or `null`.
pub const WHEEL_TARGET: &str = r#"(args) => {
  const container = document.querySelector(args.container);
  if (!container) return null;
  const rect = container.getBoundingClientRect();
  return { x: rect.left + rect.width / 2, y: rect.top + Math.min(rect.height / 2, 200) };
}"#;

/// Reads every chat card in the list, in display order.
///
/// The id falls back to the framework's fiber tree when the data attribute is
/// missing; that lookup depends on the web app's internals.
pub const READ_CHAT_CARDS: &str = r#"(args) => {
  const container = document.querySelector(args.container);
  if (!container) return null;
  const text = (root, selector) => {
    const el = root.querySelector(selector);
    return el ? el.textContent.trim() : "";
  };
  const internalId = (el) => {
    const key = Object.keys(el).find((k) =>
      k.startsWith("__reactFiber$") || k.startsWith("__reactInternalInstance$"));
    let fiber = key ? el[key] : null;
    for (let depth = 0; fiber && depth < 15; depth += 1, fiber = fiber.return) {
      const props = fiber.memoizedProps || {};
      const chat = props.chat || props.item || {};
      const id = props.chatId ?? chat.id ?? chat._id;
      if (id !== undefined && id !== null && id !== "") return String(id);
    }
    return null;
  };
  return Array.from(container.querySelectorAll(args.card)).map((card) => {
    const preview = card.querySelector(args.preview);
    let internal = null;
    try { internal = internalId(card); } catch (e) { internal = null; }
    return {
      name: text(card, args.name),
      status: text(card, args.status),
      unread: text(card, args.unread),
      time: text(card, args.time),
      preview_title: preview ? preview.getAttribute("title") : null,
      preview_text: preview ? preview.textContent.trim() : "",
      data_id: card.getAttribute(args.id_attribute),
      internal_id: internal,
    };
  });
}"#;

/// Walks date separators and message rows top to bottom.
pub const READ_CONVERSATION: &str = r#"(args) => {
  const container = document.querySelector(args.container);
  if (!container) return null;
  const nodes = container.querySelectorAll(`${args.row}, ${args.separator}`);
  return Array.from(nodes).map((node) => {
    if (node.matches(args.separator)) {
      return { kind: "date", label: node.textContent.trim() };
    }
    const body = node.querySelector(args.text);
    const time = node.querySelector(args.time);
    return {
      kind: "message",
      outgoing: node.classList.contains(args.outgoing_class),
      text: body ? body.textContent.trim() : "",
      time: time ? time.textContent.trim() : "",
      audio: Boolean(node.querySelector(args.audio)),
    };
  });
}"#;

pub fn count_chat_cards() -> String {
    call(
        COUNT_ITEMS,
        &json!({ "container": selectors::CHAT_LIST, "item": selectors::CHAT_CARD }),
    )
}

pub fn count_messages() -> String {
    call(
        COUNT_ITEMS,
        &json!({ "container": selectors::CONVERSATION, "item": selectors::MESSAGE_ROW }),
    )
}

pub fn scroll_chat_list() -> String {
    call(SCROLL_TO_BOTTOM, &json!({ "container": selectors::CHAT_LIST }))
}

pub fn conversation_wheel_target() -> String {
    call(WHEEL_TARGET, &json!({ "container": selectors::CONVERSATION }))
}

pub fn remove_overlays() -> String {
    call(REMOVE_OVERLAYS, &json!({ "selectors": selectors::OVERLAYS }))
}

pub fn read_chat_cards() -> String {
    call(
        READ_CHAT_CARDS,
        &json!({
            "container": selectors::CHAT_LIST,
            "card": selectors::CHAT_CARD,
            "name": selectors::CARD_NAME,
            "status": selectors::CARD_STATUS,
            "unread": selectors::CARD_UNREAD,
            "time": selectors::CARD_TIME,
            "preview": selectors::CARD_PREVIEW,
            "id_attribute": selectors::CARD_ID_ATTRIBUTE,
        }),
    )
}

pub fn read_conversation() -> String {
    call(
        READ_CONVERSATION,
        &json!({
            "container": selectors::CONVERSATION,
            "row": selectors::MESSAGE_ROW,
            "separator": selectors::DATE_SEPARATOR,
            "text": selectors::MESSAGE_TEXT,
            "time": selectors::MESSAGE_TIME,
            "audio": selectors::AUDIO_MARKER,
            "outgoing_class": selectors::OUTGOING_CLASS,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_filter_submits_once_through_the_input() {
        assert!(APPLY_TEXT_FILTER.contains("\"keydown\""));
        assert!(!APPLY_TEXT_FILTER.contains("submit("));
        assert!(!APPLY_TEXT_FILTER.contains("requestSubmit"));
    }

    #[test]
    fn call_wraps_script_and_json_argument() {
        let expr = call("(args) => args.a", &json!({ "a": "it's" }));
        assert_eq!(expr, r#"((args) => args.a)({"a":"it's"})"#);
    }

    #[test]
    fn builders_embed_their_selectors() {
        assert!(count_chat_cards().contains(selectors::CHAT_LIST));
        assert!(count_messages().contains(selectors::MESSAGE_ROW));
        assert!(read_chat_cards().contains(selectors::CARD_ID_ATTRIBUTE));
        assert!(read_conversation().contains(selectors::OUTGOING_CLASS));
        assert!(remove_overlays().contains(".modal-backdrop"));
    }

    #[test]
    fn builders_are_distinguishable() {
        // The scripted test driver routes on these prefixes.
        assert!(read_chat_cards().starts_with(&format!("({READ_CHAT_CARDS})")));
        assert!(read_conversation().starts_with(&format!("({READ_CONVERSATION})")));
        assert_ne!(count_chat_cards(), count_messages());
    }
}
