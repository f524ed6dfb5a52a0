// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scraping pipeline for the chat web app.
//!
//! Each operation owns one browser session end to end:
//! open, navigate, check auth, filter, stabilize, extract, and close. The
//! session is closed on every path, including errors and panics inside the
//! page work.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use switchboard_config::SwitchboardConfig;
use switchboard_core::{ChatMessage, ChatSummary, FilterCriteria, SwitchboardError};
use tracing::{debug, info, warn};
use url::Url;

use crate::driver::{BrowserSession, PageDriver, SessionLauncher};
use crate::extract::{extract_chats, extract_messages, resolve_chat_id, ChatIdSource, PageSnapshot};
use crate::filters;
use crate::scripts;
use crate::scroll::{ScrollDecision, ScrollProgress};
use crate::session::SessionStore;
use crate::timing::{settle, PipelineTiming};

/// Default number of messages returned by [`ChatPipeline::read_messages`].
pub const DEFAULT_MESSAGE_LIMIT: usize = 50;
/// Upper bound on messages returned by [`ChatPipeline::read_messages`].
pub const MAX_MESSAGE_LIMIT: usize = 500;

const CHATS_ROUTE: &str = "chats";
/// Path segments that mark a login page.
const LOGIN_MARKERS: &[&str] = &["login", "signin", "sign-in"];
const AUTH_SEGMENTS: &[&str] = &["auth", "oauth"];
/// Wheel delta per scroll step; negative scrolls up.
const WHEEL_DELTA: f64 = -3000.0;

pub(crate) const NOTE_NO_CHAT_LIST: &str =
    "chat list container not found on the page; the web app layout may have changed";
pub(crate) const NOTE_NO_CONVERSATION: &str =
    "conversation container not found on the page; the chat may not exist or the layout changed";

/// Chats read from the list view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChatListing {
    pub chats: Vec<ChatSummary>,
    /// Skipped filters, partial matches, and missing page elements.
    pub notes: Vec<String>,
}

/// Messages read from one conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MessageHistory {
    pub chat_id: String,
    pub messages: Vec<ChatMessage>,
    pub notes: Vec<String>,
}

/// True when `url` is a login page or the bare root of the web app, which is
/// where the app sends unauthenticated visitors.
///
/// The segment after `chats` is a chat id chosen by the platform and is never
/// matched against the login markers.
pub fn is_login_url(url: &str) -> bool {
    let path = Url::parse(url)
        .map(|u| u.path().to_ascii_lowercase())
        .unwrap_or_else(|_| url.to_ascii_lowercase());
    let path = path.trim_matches('/');
    if path.is_empty() {
        return true;
    }
    let segments: Vec<&str> = path.split('/').collect();
    segments.iter().enumerate().any(|(i, segment)| {
        let is_chat_id = i > 0 && segments[i - 1] == CHATS_ROUTE;
        !is_chat_id
            && (LOGIN_MARKERS.iter().any(|marker| segment.contains(marker))
                || AUTH_SEGMENTS.contains(segment))
    })
}

#[derive(Debug, Deserialize)]
struct WheelTarget {
    x: f64,
    y: f64,
}

fn count_of(value: &Value) -> Option<usize> {
    value.as_u64().map(|n| n as usize)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

async fn close_session(session: Box<dyn BrowserSession>) {
    if let Err(e) = session.close().await {
        warn!(error = %e, "failed to close browser session");
    }
}

/// Drives the chat web app through a [`SessionLauncher`].
#[derive(Clone)]
pub struct ChatPipeline {
    launcher: Arc<dyn SessionLauncher>,
    web_url: Url,
    timing: PipelineTiming,
}

impl ChatPipeline {
    pub fn new(
        launcher: Arc<dyn SessionLauncher>,
        web_url: &str,
        timing: PipelineTiming,
    ) -> Result<Self, SwitchboardError> {
        let web_url = Url::parse(web_url)
            .map_err(|e| SwitchboardError::Config(format!("web app URL '{web_url}': {e}")))?;
        if web_url.cannot_be_a_base() {
            return Err(SwitchboardError::Config(format!(
                "web app URL '{web_url}' cannot carry a path"
            )));
        }
        Ok(Self {
            launcher,
            web_url,
            timing,
        })
    }

    /// Pipeline over Chromium sessions restored from the configured artifact.
    pub fn from_config(config: &SwitchboardConfig) -> Result<Self, SwitchboardError> {
        let store = SessionStore::from_config(&config.platform, &config.browser)?;
        Self::new(
            Arc::new(store),
            &config.platform.web_url,
            PipelineTiming::from_config(&config.browser),
        )
    }

    pub fn timing(&self) -> &PipelineTiming {
        &self.timing
    }

    fn route(&self, segments: &[&str]) -> String {
        let mut url = self.web_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.to_string()
    }

    pub fn chat_list_url(&self) -> String {
        self.route(&[CHATS_ROUTE])
    }

    pub fn chat_url(&self, chat_id: &str) -> String {
        self.route(&[CHATS_ROUTE, chat_id])
    }

    /// Lists chats matching `criteria`, at most `criteria.effective_limit()`.
    pub async fn list_chats(
        &self,
        criteria: &FilterCriteria,
    ) -> Result<ChatListing, SwitchboardError> {
        let session = self.launcher.open().await?;
        let outcome = AssertUnwindSafe(self.list_in_page(session.page(), criteria))
            .catch_unwind()
            .await;
        close_session(session).await;
        outcome.unwrap_or_else(|panic| {
            Err(SwitchboardError::Internal(format!(
                "chat listing aborted: {}",
                panic_message(panic.as_ref())
            )))
        })
    }

    /// Reads the trailing `limit` messages of a chat, oldest first.
    pub async fn read_messages(
        &self,
        chat_id: &str,
        limit: usize,
    ) -> Result<MessageHistory, SwitchboardError> {
        let chat_id = chat_id.trim();
        if chat_id.is_empty() {
            return Err(SwitchboardError::InvalidInput(
                "chat_id must not be empty".to_string(),
            ));
        }
        let limit = limit.clamp(1, MAX_MESSAGE_LIMIT);

        let session = self.launcher.open().await?;
        let outcome = AssertUnwindSafe(self.read_in_page(session.page(), chat_id, limit))
            .catch_unwind()
            .await;
        close_session(session).await;
        outcome.unwrap_or_else(|panic| {
            Err(SwitchboardError::Internal(format!(
                "message reading aborted: {}",
                panic_message(panic.as_ref())
            )))
        })
    }

    async fn list_in_page(
        &self,
        page: &dyn PageDriver,
        criteria: &FilterCriteria,
    ) -> Result<ChatListing, SwitchboardError> {
        let mut notes = Vec::new();
        debug!(
            unfiltered = criteria.is_unfiltered(),
            limit = criteria.effective_limit(),
            "listing chats"
        );
        self.open_route(page, &self.chat_list_url()).await?;

        for step in filters::plan(criteria) {
            let outcome = filters::apply(page, &step).await?;
            if !outcome.applied {
                debug!(filter = step.label(), "filter control not found, skipping");
                notes.push(format!(
                    "filter '{}' skipped: control not found on the page",
                    step.label()
                ));
                continue;
            }
            if let (true, filters::FilterStep::Department(wanted)) =
                (outcome.matched_by_substring(), &step)
            {
                let matched = outcome.matched.as_deref().unwrap_or_default();
                notes.push(format!(
                    "department '{wanted}' has no exact match; used '{matched}'"
                ));
            }
            debug!(filter = step.label(), "filter applied");
            settle(self.timing.filter_settle).await;
        }
        // A filter can reload the page.
        self.check_auth(page).await?;

        self.stabilize(page).await?;

        let limit = criteria.effective_limit();
        if self.scroll_chat_list(page, limit).await?.is_none() {
            notes.push(NOTE_NO_CHAT_LIST.to_string());
            return Ok(ChatListing {
                chats: Vec::new(),
                notes,
            });
        }

        let snapshot =
            PageSnapshot::chat_list_from_value(page.evaluate(&scripts::read_chat_cards()).await?)?;
        let chats = match snapshot {
            Some(PageSnapshot::ChatList(cards)) => {
                let missing_ids = cards
                    .iter()
                    .take(limit)
                    .filter(|card| resolve_chat_id(card).1 == ChatIdSource::Unavailable)
                    .count();
                if missing_ids > 0 {
                    notes.push(format!("{missing_ids} chat(s) have no recoverable chat_id"));
                }
                extract_chats(&cards, limit)
            }
            _ => {
                notes.push(NOTE_NO_CHAT_LIST.to_string());
                Vec::new()
            }
        };

        info!(count = chats.len(), limit, "chat list extracted");
        Ok(ChatListing { chats, notes })
    }

    async fn read_in_page(
        &self,
        page: &dyn PageDriver,
        chat_id: &str,
        limit: usize,
    ) -> Result<MessageHistory, SwitchboardError> {
        let mut history = MessageHistory {
            chat_id: chat_id.to_string(),
            ..MessageHistory::default()
        };
        self.open_route(page, &self.chat_url(chat_id)).await?;
        self.stabilize(page).await?;

        if self.load_history(page, limit).await?.is_none() {
            history.notes.push(NOTE_NO_CONVERSATION.to_string());
            return Ok(history);
        }

        let snapshot = PageSnapshot::conversation_from_value(
            page.evaluate(&scripts::read_conversation()).await?,
        )?;
        match snapshot {
            Some(PageSnapshot::Conversation(nodes)) => {
                history.messages = extract_messages(&nodes, limit);
            }
            _ => history.notes.push(NOTE_NO_CONVERSATION.to_string()),
        }

        info!(chat_id, count = history.messages.len(), limit, "messages extracted");
        Ok(history)
    }

    /// Navigates, waits for the page to settle, and fails if the web app
    /// bounced the session to its login page.
    async fn open_route(&self, page: &dyn PageDriver, url: &str) -> Result<(), SwitchboardError> {
        debug!(url, "navigating");
        page.navigate(url, self.timing.navigation_timeout).await?;
        settle(self.timing.navigation_settle).await;
        self.check_auth(page).await
    }

    async fn check_auth(&self, page: &dyn PageDriver) -> Result<(), SwitchboardError> {
        let landed = page.current_url().await?;
        if is_login_url(&landed) {
            warn!(url = %landed, "web app redirected to login; session expired");
            return Err(SwitchboardError::SessionExpired { url: landed });
        }
        Ok(())
    }

    async fn stabilize(&self, page: &dyn PageDriver) -> Result<(), SwitchboardError> {
        let removed = page.evaluate(&scripts::remove_overlays()).await?;
        debug!(removed = count_of(&removed).unwrap_or(0), "overlays removed");
        settle(self.timing.overlay_settle).await;
        Ok(())
    }

    /// Scrolls the list until `target` cards are loaded or loading stalls.
    /// Returns the loaded count, or `None` when the list is missing.
    async fn scroll_chat_list(
        &self,
        page: &dyn PageDriver,
        target: usize,
    ) -> Result<Option<usize>, SwitchboardError> {
        let Some(mut count) = count_of(&page.evaluate(&scripts::count_chat_cards()).await?) else {
            return Ok(None);
        };
        let mut progress = ScrollProgress::new(target);
        for iteration in 0..self.timing.max_scroll_iterations {
            let decision = progress.observe(count);
            if decision != ScrollDecision::Continue {
                debug!(?decision, count, iteration, "chat list scrolling finished");
                return Ok(Some(count));
            }
            page.evaluate(&scripts::scroll_chat_list()).await?;
            settle(self.timing.scroll_settle).await;
            count = count_of(&page.evaluate(&scripts::count_chat_cards()).await?).unwrap_or(count);
        }
        debug!(count, "chat list scrolling hit the iteration limit");
        Ok(Some(count))
    }

    /// Wheels the conversation upward until `target` messages are loaded or
    /// loading stalls. Returns the loaded count, or `None` when the
    /// conversation is missing.
    async fn load_history(
        &self,
        page: &dyn PageDriver,
        target: usize,
    ) -> Result<Option<usize>, SwitchboardError> {
        let Some(mut count) = count_of(&page.evaluate(&scripts::count_messages()).await?) else {
            return Ok(None);
        };
        let target_point = page.evaluate(&scripts::conversation_wheel_target()).await?;
        let Ok(point) = serde_json::from_value::<WheelTarget>(target_point) else {
            debug!("conversation has no scrollable area");
            return Ok(Some(count));
        };

        let mut progress = ScrollProgress::new(target);
        for iteration in 0..self.timing.max_scroll_iterations {
            let decision = progress.observe(count);
            if decision != ScrollDecision::Continue {
                debug!(?decision, count, iteration, "history loading finished");
                return Ok(Some(count));
            }
            page.mouse_wheel(point.x, point.y, WHEEL_DELTA).await?;
            settle(self.timing.scroll_settle).await;
            count = count_of(&page.evaluate(&scripts::count_messages()).await?).unwrap_or(count);
        }
        debug!(count, "history loading hit the iteration limit");
        Ok(Some(count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct NoBrowser;

    #[async_trait]
    impl SessionLauncher for NoBrowser {
        async fn open(&self) -> Result<Box<dyn BrowserSession>, SwitchboardError> {
            Err(SwitchboardError::SessionMissing {
                path: "session.json".into(),
            })
        }
    }

    fn pipeline(web_url: &str) -> ChatPipeline {
        ChatPipeline::new(Arc::new(NoBrowser), web_url, PipelineTiming::immediate(3)).unwrap()
    }

    #[test]
    fn login_urls_are_detected() {
        assert!(is_login_url("https://web.switchboard-chat.app/login"));
        assert!(is_login_url("https://web.switchboard-chat.app/account/signin?next=/chats"));
        assert!(is_login_url("https://web.switchboard-chat.app/Sign-In"));
        assert!(is_login_url("https://web.switchboard-chat.app/auth/callback"));
        assert!(is_login_url("https://web.switchboard-chat.app/"));
        assert!(is_login_url("https://web.switchboard-chat.app"));
    }

    #[test]
    fn app_urls_are_not_login_urls() {
        assert!(!is_login_url("https://web.switchboard-chat.app/chats"));
        assert!(!is_login_url("https://web.switchboard-chat.app/chats/c-42"));
        assert!(!is_login_url("https://web.switchboard-chat.app/chats?filter=author"));
    }

    #[test]
    fn chat_ids_never_look_like_login_pages() {
        assert!(!is_login_url("https://web.switchboard-chat.app/chats/blogin-77"));
        assert!(!is_login_url("https://web.switchboard-chat.app/chats/auth"));
        assert!(!is_login_url("https://web.switchboard-chat.app/chats/sign-in%2F1"));
        assert!(is_login_url("https://web.switchboard-chat.app/login/chats/c-1"));
    }

    #[test]
    fn routes_extend_the_web_url() {
        let p = pipeline("https://web.switchboard-chat.app");
        assert_eq!(p.chat_list_url(), "https://web.switchboard-chat.app/chats");
        assert_eq!(p.chat_url("c-42"), "https://web.switchboard-chat.app/chats/c-42");

        let nested = pipeline("https://example.com/app/");
        assert_eq!(nested.chat_list_url(), "https://example.com/app/chats");
    }

    #[test]
    fn chat_ids_are_path_encoded() {
        let p = pipeline("https://web.switchboard-chat.app");
        assert_eq!(
            p.chat_url("a/b c"),
            "https://web.switchboard-chat.app/chats/a%2Fb%20c"
        );
    }

    #[test]
    fn rejects_unusable_web_url() {
        assert!(ChatPipeline::new(Arc::new(NoBrowser), "nope", PipelineTiming::default()).is_err());
        assert!(
            ChatPipeline::new(Arc::new(NoBrowser), "mailto:a@b.c", PipelineTiming::default())
                .is_err()
        );
    }

    #[tokio::test]
    async fn missing_session_fails_before_any_page_work() {
        let p = pipeline("https://web.switchboard-chat.app");
        let err = p.list_chats(&FilterCriteria::default()).await.unwrap_err();
        assert!(matches!(err, SwitchboardError::SessionMissing { .. }));
        let err = p.read_messages("c-1", 10).await.unwrap_err();
        assert!(matches!(err, SwitchboardError::SessionMissing { .. }));
    }

    #[tokio::test]
    async fn empty_chat_id_is_rejected() {
        let p = pipeline("https://web.switchboard-chat.app");
        let err = p.read_messages("  ", 10).await.unwrap_err();
        assert!(matches!(err, SwitchboardError::InvalidInput(_)));
    }
}
