// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pipeline behavior against the scripted web app.

use std::sync::Arc;

use switchboard_browser::scripts::{self, selectors};
use switchboard_browser::{ChatPipeline, PipelineTiming};
use switchboard_core::types::AUDIO_PLACEHOLDER;
use switchboard_core::{ChatOrder, ChatStatus, FilterCriteria, SenderRole, SwitchboardError};
use switchboard_test_utils::fixtures::{
    audio_row, chat_card, chat_card_without_data_id, conversation, date_separator, message_row,
};
use switchboard_test_utils::{PageEvent, ScriptedApp, ScriptedLauncher};

const WEB_URL: &str = "https://web.switchboard-chat.app";

fn pipeline(launcher: &ScriptedLauncher, max_scroll_iterations: u32) -> ChatPipeline {
    ChatPipeline::new(
        Arc::new(launcher.clone()),
        WEB_URL,
        PipelineTiming::immediate(max_scroll_iterations),
    )
    .unwrap()
}

fn cards(n: usize) -> Vec<serde_json::Value> {
    (0..n).map(chat_card).collect()
}

#[tokio::test]
async fn default_listing_stops_at_default_limit() {
    let launcher = ScriptedLauncher::new(ScriptedApp::new().with_chat_cards(cards(25), 10));
    let listing = pipeline(&launcher, 30)
        .list_chats(&FilterCriteria::default())
        .await
        .unwrap();

    assert_eq!(listing.chats.len(), 20);
    assert!(listing.notes.is_empty(), "{:?}", listing.notes);
    assert_eq!(listing.chats[0].name, "Contact 0");
    assert_eq!(listing.chats[0].chat_id, "chat-0");
    assert_eq!(listing.chats[0].unread, 2);
    assert_eq!(listing.chats[1].status, ChatStatus::InService);
    assert_eq!(listing.chats[1].last_message, "Full preview of message 1");

    assert_eq!(
        launcher.events()[0],
        PageEvent::Navigate(format!("{WEB_URL}/chats"))
    );
    assert_eq!(launcher.count(&PageEvent::ScrollList), 1);
    assert_eq!(launcher.count(&PageEvent::RemoveOverlays), 1);
    assert_eq!(launcher.opened(), 1);
    assert_eq!(launcher.closed(), 1);
}

#[tokio::test]
async fn oversized_limit_is_capped_at_one_hundred() {
    let launcher = ScriptedLauncher::new(ScriptedApp::new().with_chat_cards(cards(150), 30));
    let criteria = FilterCriteria {
        unread_only: true,
        limit: Some(150),
        ..FilterCriteria::default()
    };
    let listing = pipeline(&launcher, 30).list_chats(&criteria).await.unwrap();

    assert_eq!(listing.chats.len(), 100);
    assert_eq!(launcher.count(&PageEvent::ScrollList), 3);
    assert_eq!(
        launcher.filter_selectors(),
        vec![selectors::UNREAD_TOGGLE.to_string()]
    );
}

#[tokio::test]
async fn filters_apply_in_fixed_order() {
    let launcher = ScriptedLauncher::new(
        ScriptedApp::new()
            .with_chat_cards(cards(3), 10)
            .with_departments(&["Sales", "Support"]),
    );
    let criteria = FilterCriteria {
        department: Some("support".into()),
        favorited: true,
        archived: true,
        unread_only: true,
        order: Some(ChatOrder::Newest),
        status: Some(ChatStatus::Waiting),
        phone: Some("5581".into()),
        name: Some("Maria".into()),
        limit: None,
    };
    let listing = pipeline(&launcher, 30).list_chats(&criteria).await.unwrap();

    assert_eq!(
        launcher.filter_selectors(),
        [
            selectors::NAME_FILTER,
            selectors::PHONE_FILTER,
            selectors::STATUS_FILTER,
            selectors::ORDER_FILTER,
            selectors::UNREAD_TOGGLE,
            selectors::ARCHIVED_TOGGLE,
            selectors::FAVORITE_TOGGLE,
            selectors::DEPARTMENT_LABELS,
        ]
        .map(str::to_string)
    );
    assert!(listing.notes.is_empty(), "{:?}", listing.notes);

    let events = launcher.events();
    let last_filter = events
        .iter()
        .rposition(|e| matches!(e, PageEvent::Department(_)))
        .unwrap();
    let overlays = events
        .iter()
        .position(|e| *e == PageEvent::RemoveOverlays)
        .unwrap();
    assert!(last_filter < overlays, "overlays are removed after filtering");
}

#[tokio::test]
async fn missing_filter_control_is_skipped_with_note() {
    let launcher = ScriptedLauncher::new(
        ScriptedApp::new()
            .with_chat_cards(cards(5), 10)
            .without_control(selectors::ARCHIVED_TOGGLE),
    );
    let criteria = FilterCriteria {
        archived: true,
        favorited: true,
        ..FilterCriteria::default()
    };
    let listing = pipeline(&launcher, 30).list_chats(&criteria).await.unwrap();

    assert_eq!(listing.chats.len(), 5);
    assert_eq!(listing.notes.len(), 1);
    assert!(listing.notes[0].contains("archived"));
    assert_eq!(launcher.filter_selectors().len(), 2);
}

#[tokio::test]
async fn department_substring_match_is_noted() {
    let launcher = ScriptedLauncher::new(
        ScriptedApp::new()
            .with_chat_cards(cards(2), 10)
            .with_departments(&["Customer Support", "Sales"]),
    );
    let criteria = FilterCriteria {
        department: Some("support".into()),
        ..FilterCriteria::default()
    };
    let listing = pipeline(&launcher, 30).list_chats(&criteria).await.unwrap();
    assert_eq!(listing.notes.len(), 1);
    assert!(listing.notes[0].contains("Customer Support"));
}

#[tokio::test]
async fn unknown_department_is_skipped() {
    let launcher = ScriptedLauncher::new(
        ScriptedApp::new()
            .with_chat_cards(cards(2), 10)
            .with_departments(&["Sales"]),
    );
    let criteria = FilterCriteria {
        department: Some("Billing".into()),
        ..FilterCriteria::default()
    };
    let listing = pipeline(&launcher, 30).list_chats(&criteria).await.unwrap();
    assert_eq!(listing.chats.len(), 2);
    assert!(listing.notes[0].contains("department"));
}

#[tokio::test]
async fn scrolling_stops_after_two_steps_without_growth() {
    let launcher = ScriptedLauncher::new(ScriptedApp::new().with_chat_cards(cards(15), 10));
    let criteria = FilterCriteria {
        limit: Some(50),
        ..FilterCriteria::default()
    };
    let listing = pipeline(&launcher, 30).list_chats(&criteria).await.unwrap();

    assert_eq!(listing.chats.len(), 15);
    assert_eq!(launcher.count(&PageEvent::ScrollList), 3);
}

#[tokio::test]
async fn scrolling_respects_iteration_limit() {
    let launcher = ScriptedLauncher::new(ScriptedApp::new().with_chat_cards(cards(100), 10));
    let criteria = FilterCriteria {
        limit: Some(100),
        ..FilterCriteria::default()
    };
    let listing = pipeline(&launcher, 2).list_chats(&criteria).await.unwrap();

    assert_eq!(launcher.count(&PageEvent::ScrollList), 2);
    assert_eq!(listing.chats.len(), 30);
}

#[tokio::test]
async fn chats_without_ids_are_kept_and_noted() {
    let launcher = ScriptedLauncher::new(ScriptedApp::new().with_chat_cards(
        vec![
            chat_card(0),
            chat_card_without_data_id("Fiber Only", Some("internal-7")),
            chat_card_without_data_id("No Id", None),
        ],
        10,
    ));
    let listing = pipeline(&launcher, 30)
        .list_chats(&FilterCriteria::default())
        .await
        .unwrap();

    let ids: Vec<_> = listing.chats.iter().map(|c| c.chat_id.as_str()).collect();
    assert_eq!(ids, ["chat-0", "internal-7", ""]);
    assert_eq!(listing.notes, ["1 chat(s) have no recoverable chat_id"]);
}

#[tokio::test]
async fn missing_chat_list_yields_empty_result_with_note() {
    let launcher = ScriptedLauncher::new(ScriptedApp::new());
    let listing = pipeline(&launcher, 30)
        .list_chats(&FilterCriteria::default())
        .await
        .unwrap();

    assert!(listing.chats.is_empty());
    assert!(listing.notes[0].contains("chat list container not found"));
    assert_eq!(launcher.count(&PageEvent::ReadCards), 0);
    assert_eq!(launcher.closed(), 1);
}

#[tokio::test]
async fn login_redirect_on_list_is_session_expired() {
    let launcher = ScriptedLauncher::new(
        ScriptedApp::new()
            .with_chat_cards(cards(5), 10)
            .redirect_to(format!("{WEB_URL}/login?next=%2Fchats")),
    );
    let err = pipeline(&launcher, 30)
        .list_chats(&FilterCriteria::default())
        .await
        .unwrap_err();

    assert!(matches!(err, SwitchboardError::SessionExpired { .. }));
    assert!(err.to_string().contains("session expired"));
    assert_eq!(launcher.count(&PageEvent::ReadCards), 0);
    assert_eq!(launcher.closed(), 1);
}

#[tokio::test]
async fn bare_root_redirect_is_session_expired() {
    let launcher = ScriptedLauncher::new(
        ScriptedApp::new()
            .with_conversation(conversation(1, 5), 10)
            .redirect_to(format!("{WEB_URL}/")),
    );
    let err = pipeline(&launcher, 30)
        .read_messages("chat-1", 10)
        .await
        .unwrap_err();
    assert!(matches!(err, SwitchboardError::SessionExpired { .. }));
}

#[tokio::test]
async fn chat_navigation_to_login_returns_no_messages() {
    let launcher = ScriptedLauncher::new(
        ScriptedApp::new()
            .with_conversation(conversation(2, 10), 10)
            .redirect_to(format!("{WEB_URL}/auth/sign-in")),
    );
    let result = pipeline(&launcher, 30).read_messages("chat-1", 50).await;

    let err = result.unwrap_err();
    assert!(err.to_string().contains("session expired"));
    assert_eq!(launcher.count(&PageEvent::ReadConversation), 0);
    assert_eq!(launcher.count(&PageEvent::Wheel), 0);
    assert_eq!(launcher.closed(), 1);
}

#[tokio::test]
async fn filter_that_reloads_into_login_is_session_expired() {
    let launcher = ScriptedLauncher::new(
        ScriptedApp::new()
            .with_chat_cards(cards(5), 10)
            .redirect_on_filter(format!("{WEB_URL}/login?next=/chats")),
    );
    let criteria = FilterCriteria {
        name: Some("Maria".into()),
        ..Default::default()
    };
    let err = pipeline(&launcher, 30)
        .list_chats(&criteria)
        .await
        .unwrap_err();

    assert!(matches!(err, SwitchboardError::SessionExpired { .. }));
    assert_eq!(launcher.count(&PageEvent::RemoveOverlays), 0);
    assert_eq!(launcher.count(&PageEvent::ReadCards), 0);
    assert_eq!(launcher.closed(), 1);
}

#[tokio::test]
async fn chat_id_containing_login_marker_is_read_normally() {
    let launcher = ScriptedLauncher::new(
        ScriptedApp::new().with_conversation(conversation(1, 5), 10),
    );
    let history = pipeline(&launcher, 30)
        .read_messages("blogin-77", 10)
        .await
        .unwrap();

    assert_eq!(history.chat_id, "blogin-77");
    assert_eq!(history.messages.len(), 5);
    assert!(history.notes.is_empty());
    assert_eq!(launcher.closed(), 1);
}

#[tokio::test]
async fn messages_are_a_trailing_chronological_window() {
    let launcher = ScriptedLauncher::new(
        ScriptedApp::new().with_conversation(conversation(3, 20), 20),
    );
    let history = pipeline(&launcher, 30)
        .read_messages("chat-9", 25)
        .await
        .unwrap();

    assert_eq!(history.chat_id, "chat-9");
    assert_eq!(history.messages.len(), 25);
    assert_eq!(history.messages[0].text, "d1-m15");
    assert_eq!(history.messages[0].date, "Day 1");
    assert_eq!(history.messages[24].text, "d2-m19");
    assert_eq!(history.messages[24].date, "Day 2");
    assert_eq!(history.messages[24].sender, SenderRole::Operator);
    assert_eq!(history.messages[23].sender, SenderRole::Counterpart);
    assert_eq!(launcher.count(&PageEvent::Wheel), 1);
    assert_eq!(
        launcher.events()[0],
        PageEvent::Navigate(format!("{WEB_URL}/chats/chat-9"))
    );
}

#[tokio::test]
async fn short_conversation_stops_wheeling_when_exhausted() {
    let launcher = ScriptedLauncher::new(
        ScriptedApp::new().with_conversation(conversation(1, 4), 10),
    );
    let history = pipeline(&launcher, 30)
        .read_messages("chat-1", 50)
        .await
        .unwrap();

    assert_eq!(history.messages.len(), 4);
    assert_eq!(launcher.count(&PageEvent::Wheel), 2);
}

#[tokio::test]
async fn audio_rows_read_as_placeholder() {
    let nodes = vec![
        date_separator("Today"),
        message_row(false, "can you hear me?", "10:00"),
        audio_row(false, "10:01"),
        message_row(true, "yes", "10:02"),
    ];
    let launcher = ScriptedLauncher::new(ScriptedApp::new().with_conversation(nodes, 10));
    let history = pipeline(&launcher, 30)
        .read_messages("chat-1", 10)
        .await
        .unwrap();

    let texts: Vec<_> = history.messages.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, ["can you hear me?", AUDIO_PLACEHOLDER, "yes"]);
}

#[tokio::test]
async fn missing_conversation_yields_empty_result_with_note() {
    let launcher = ScriptedLauncher::new(ScriptedApp::new());
    let history = pipeline(&launcher, 30)
        .read_messages("chat-404", 10)
        .await
        .unwrap();
    assert!(history.messages.is_empty());
    assert!(history.notes[0].contains("conversation container not found"));
    assert_eq!(launcher.closed(), 1);
}

#[tokio::test]
async fn script_failure_is_an_error_and_still_closes() {
    let launcher = ScriptedLauncher::new(
        ScriptedApp::new()
            .with_chat_cards(cards(5), 10)
            .fail_script(scripts::READ_CHAT_CARDS),
    );
    let err = pipeline(&launcher, 30)
        .list_chats(&FilterCriteria::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SwitchboardError::Browser { .. }));
    assert_eq!(launcher.closed(), 1);
}

#[tokio::test]
async fn panic_during_extraction_still_closes() {
    let launcher = ScriptedLauncher::new(
        ScriptedApp::new()
            .with_conversation(conversation(1, 3), 10)
            .panic_on_script(scripts::READ_CONVERSATION),
    );
    let err = pipeline(&launcher, 30)
        .read_messages("chat-1", 10)
        .await
        .unwrap_err();
    assert!(matches!(err, SwitchboardError::Internal(_)));
    assert!(err.to_string().contains("scripted panic"));
    assert_eq!(launcher.closed(), 1);
}

#[tokio::test]
async fn navigation_timeout_is_reported() {
    let launcher = ScriptedLauncher::new(
        ScriptedApp::new()
            .with_chat_cards(cards(5), 10)
            .navigation_times_out(),
    );
    let err = pipeline(&launcher, 30)
        .list_chats(&FilterCriteria::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SwitchboardError::Timeout { .. }));
    assert_eq!(launcher.closed(), 1);
}

#[tokio::test]
async fn missing_session_opens_nothing() {
    let launcher = ScriptedLauncher::without_session();
    let err = pipeline(&launcher, 30)
        .list_chats(&FilterCriteria::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SwitchboardError::SessionMissing { .. }));
    assert_eq!(launcher.opened(), 0);
    assert_eq!(launcher.closed(), 0);
    assert!(launcher.events().is_empty());
}
