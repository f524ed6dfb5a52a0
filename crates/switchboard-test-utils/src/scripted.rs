// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory stand-in for the chat web app.
//!
//! `ScriptedLauncher` hands out sessions whose page answers the pipeline's
//! scripts from a scripted model of the app: a chat list that grows by a page
//! per scroll, a conversation that loads older messages per wheel event, and
//! a configurable set of filter controls. Every interaction is recorded.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use switchboard_browser::scripts::{self, selectors};
use switchboard_browser::{BrowserSession, PageDriver, SessionLauncher};
use switchboard_core::SwitchboardError;
use tracing::trace;

/// Something the pipeline did to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    Navigate(String),
    /// A text, select, or toggle filter targeting this selector.
    Filter(String),
    Department(String),
    RemoveOverlays,
    ScrollList,
    Wheel,
    ReadCards,
    ReadConversation,
}

/// Scripted state of the web app.
#[derive(Debug, Clone)]
pub struct ScriptedApp {
    redirect: Option<String>,
    filter_redirect: Option<String>,
    navigation_times_out: bool,
    chat_cards: Option<Vec<Value>>,
    list_page_size: usize,
    conversation: Option<Vec<Value>>,
    history_page_size: usize,
    missing_controls: HashSet<String>,
    departments: Vec<String>,
    failing_script: Option<&'static str>,
    panicking_script: Option<&'static str>,

    current_url: String,
    loaded_cards: usize,
    loaded_messages: usize,
    events: Vec<PageEvent>,
}

impl Default for ScriptedApp {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedApp {
    /// An app with every filter control present and neither a chat list nor
    /// a conversation on the page.
    pub fn new() -> Self {
        Self {
            redirect: None,
            filter_redirect: None,
            navigation_times_out: false,
            chat_cards: None,
            list_page_size: 10,
            conversation: None,
            history_page_size: 10,
            missing_controls: HashSet::new(),
            departments: Vec::new(),
            failing_script: None,
            panicking_script: None,
            current_url: "about:blank".to_string(),
            loaded_cards: 0,
            loaded_messages: 0,
            events: Vec::new(),
        }
    }

    /// Puts a chat list on the page. Cards load `page_size` at a time.
    pub fn with_chat_cards(mut self, cards: Vec<Value>, page_size: usize) -> Self {
        self.chat_cards = Some(cards);
        self.list_page_size = page_size.max(1);
        self
    }

    /// Puts a conversation on the page. Nodes are in document order; the
    /// newest `page_size` messages are loaded first.
    pub fn with_conversation(mut self, nodes: Vec<Value>, page_size: usize) -> Self {
        self.conversation = Some(nodes);
        self.history_page_size = page_size.max(1);
        self
    }

    /// Every navigation lands on `url` instead of the requested one.
    pub fn redirect_to(mut self, url: impl Into<String>) -> Self {
        self.redirect = Some(url.into());
        self
    }

    /// Applying a text filter reloads the page at `url`, as a native form
    /// submission would.
    pub fn redirect_on_filter(mut self, url: impl Into<String>) -> Self {
        self.filter_redirect = Some(url.into());
        self
    }

    pub fn navigation_times_out(mut self) -> Self {
        self.navigation_times_out = true;
        self
    }

    /// Removes the filter control matching `selector`.
    pub fn without_control(mut self, selector: &str) -> Self {
        self.missing_controls.insert(selector.to_string());
        self
    }

    pub fn with_departments(mut self, labels: &[&str]) -> Self {
        self.departments = labels.iter().map(|l| l.to_string()).collect();
        self
    }

    /// Evaluating `script` fails with a browser error.
    pub fn fail_script(mut self, script: &'static str) -> Self {
        self.failing_script = Some(script);
        self
    }

    /// Evaluating `script` panics.
    pub fn panic_on_script(mut self, script: &'static str) -> Self {
        self.panicking_script = Some(script);
        self
    }

    fn total_messages(&self) -> usize {
        self.conversation
            .as_ref()
            .map(|nodes| nodes.iter().filter(|n| is_message(n)).count())
            .unwrap_or(0)
    }

    /// Nodes currently rendered: the trailing loaded messages, plus the
    /// date separator directly above the oldest one.
    fn visible_nodes(&self) -> Vec<Value> {
        let Some(nodes) = &self.conversation else {
            return Vec::new();
        };
        let hidden = self.total_messages().saturating_sub(self.loaded_messages);
        let mut seen = 0;
        let mut start = nodes.len();
        for (index, node) in nodes.iter().enumerate() {
            if is_message(node) {
                if seen == hidden {
                    start = index;
                    break;
                }
                seen += 1;
            }
        }
        if start > 0 && start < nodes.len() && !is_message(&nodes[start - 1]) {
            start -= 1;
        }
        nodes[start.min(nodes.len())..].to_vec()
    }

    fn navigate(&mut self, url: &str) {
        self.events.push(PageEvent::Navigate(url.to_string()));
        self.current_url = self.redirect.clone().unwrap_or_else(|| url.to_string());
        self.loaded_cards = self
            .chat_cards
            .as_ref()
            .map_or(0, |cards| cards.len().min(self.list_page_size));
        self.loaded_messages = self.total_messages().min(self.history_page_size);
    }

    fn wheel(&mut self) {
        self.events.push(PageEvent::Wheel);
        self.loaded_messages =
            (self.loaded_messages + self.history_page_size).min(self.total_messages());
    }

    fn evaluate(&mut self, expression: &str) -> Result<Value, SwitchboardError> {
        if expression == "window.location.href" {
            return Ok(Value::String(self.current_url.clone()));
        }
        let Some((script, args)) = split_call(expression) else {
            return Err(SwitchboardError::browser(format!(
                "unscripted expression: {expression}"
            )));
        };
        if self.panicking_script == Some(script) {
            panic!("scripted panic");
        }
        if self.failing_script == Some(script) {
            return Err(SwitchboardError::browser("scripted script failure"));
        }
        let arg = |key: &str| args[key].as_str().unwrap_or_default().to_string();

        let value = match script {
            s if s == scripts::COUNT_ITEMS => {
                if arg("container") == selectors::CHAT_LIST {
                    self.chat_cards.as_ref().map_or(Value::Null, |_| json!(self.loaded_cards))
                } else {
                    self.conversation
                        .as_ref()
                        .map_or(Value::Null, |_| json!(self.loaded_messages))
                }
            }
            s if s == scripts::APPLY_TEXT_FILTER
                || s == scripts::APPLY_SELECT_FILTER
                || s == scripts::APPLY_TOGGLE_FILTER =>
            {
                let selector = arg("selector");
                self.events.push(PageEvent::Filter(selector.clone()));
                let applied = !self.missing_controls.contains(&selector);
                if applied && script == scripts::APPLY_TEXT_FILTER {
                    if let Some(url) = self.filter_redirect.clone() {
                        self.current_url = url;
                    }
                }
                json!({ "applied": applied })
            }
            s if s == scripts::APPLY_DEPARTMENT_FILTER => {
                let wanted = arg("value");
                self.events.push(PageEvent::Department(wanted.clone()));
                self.pick_department(&wanted)
            }
            s if s == scripts::REMOVE_OVERLAYS => {
                self.events.push(PageEvent::RemoveOverlays);
                json!(1)
            }
            s if s == scripts::SCROLL_TO_BOTTOM => {
                self.events.push(PageEvent::ScrollList);
                match &self.chat_cards {
                    Some(cards) => {
                        self.loaded_cards =
                            (self.loaded_cards + self.list_page_size).min(cards.len());
                        json!(true)
                    }
                    None => json!(false),
                }
            }
            s if s == scripts::WHEEL_TARGET => self
                .conversation
                .as_ref()
                .map_or(Value::Null, |_| json!({ "x": 400.0, "y": 300.0 })),
            s if s == scripts::READ_CHAT_CARDS => {
                self.events.push(PageEvent::ReadCards);
                self.chat_cards.as_ref().map_or(Value::Null, |cards| {
                    Value::Array(cards[..self.loaded_cards].to_vec())
                })
            }
            s if s == scripts::READ_CONVERSATION => {
                self.events.push(PageEvent::ReadConversation);
                match &self.conversation {
                    Some(_) => Value::Array(self.visible_nodes()),
                    None => Value::Null,
                }
            }
            _ => Value::Null,
        };
        trace!(%value, "scripted evaluation");
        Ok(value)
    }

    fn pick_department(&self, wanted: &str) -> Value {
        if self.departments.is_empty() {
            return json!({ "applied": false });
        }
        let wanted = wanted.trim().to_lowercase();
        let exact = self.departments.iter().find(|l| l.to_lowercase() == wanted);
        let target = exact.or_else(|| {
            self.departments
                .iter()
                .find(|l| l.to_lowercase().contains(&wanted))
        });
        match target {
            Some(label) => json!({ "applied": true, "matched": label, "exact": exact.is_some() }),
            None => json!({ "applied": false }),
        }
    }
}

fn is_message(node: &Value) -> bool {
    node["kind"] == "message"
}

const KNOWN_SCRIPTS: &[&str] = &[
    scripts::COUNT_ITEMS,
    scripts::APPLY_TEXT_FILTER,
    scripts::APPLY_SELECT_FILTER,
    scripts::APPLY_TOGGLE_FILTER,
    scripts::APPLY_DEPARTMENT_FILTER,
    scripts::REMOVE_OVERLAYS,
    scripts::SCROLL_TO_BOTTOM,
    scripts::WHEEL_TARGET,
    scripts::READ_CHAT_CARDS,
    scripts::READ_CONVERSATION,
];

/// Splits an expression built by `scripts::call` into its script and argument.
fn split_call(expression: &str) -> Option<(&'static str, Value)> {
    KNOWN_SCRIPTS.iter().find_map(|script| {
        let rest = expression.strip_prefix('(')?.strip_prefix(*script)?;
        let args = rest.strip_prefix(")(")?.strip_suffix(')')?;
        serde_json::from_str(args).ok().map(|args| (*script, args))
    })
}

type Shared = Arc<Mutex<ScriptedApp>>;

fn lock(app: &Shared) -> MutexGuard<'_, ScriptedApp> {
    // A scripted panic poisons the lock; the state is still usable.
    app.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Page backed by a shared [`ScriptedApp`].
pub struct ScriptedPage {
    app: Shared,
}

#[async_trait]
impl PageDriver for ScriptedPage {
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), SwitchboardError> {
        let mut app = lock(&self.app);
        if app.navigation_times_out {
            app.events.push(PageEvent::Navigate(url.to_string()));
            return Err(SwitchboardError::Timeout { duration: timeout });
        }
        app.navigate(url);
        Ok(())
    }

    async fn current_url(&self) -> Result<String, SwitchboardError> {
        Ok(lock(&self.app).current_url.clone())
    }

    async fn evaluate(&self, expression: &str) -> Result<Value, SwitchboardError> {
        lock(&self.app).evaluate(expression)
    }

    async fn mouse_wheel(&self, _x: f64, _y: f64, _delta_y: f64) -> Result<(), SwitchboardError> {
        lock(&self.app).wheel();
        Ok(())
    }
}

struct ScriptedSession {
    page: ScriptedPage,
    closed: Arc<Mutex<usize>>,
}

#[async_trait]
impl BrowserSession for ScriptedSession {
    fn page(&self) -> &dyn PageDriver {
        &self.page
    }

    async fn close(self: Box<Self>) -> Result<(), SwitchboardError> {
        *self.closed.lock().unwrap_or_else(|p| p.into_inner()) += 1;
        Ok(())
    }
}

/// Launcher handing out sessions over one shared [`ScriptedApp`].
#[derive(Clone)]
pub struct ScriptedLauncher {
    app: Shared,
    session_missing: bool,
    opened: Arc<Mutex<usize>>,
    closed: Arc<Mutex<usize>>,
}

impl ScriptedLauncher {
    pub fn new(app: ScriptedApp) -> Self {
        Self {
            app: Arc::new(Mutex::new(app)),
            session_missing: false,
            opened: Arc::new(Mutex::new(0)),
            closed: Arc::new(Mutex::new(0)),
        }
    }

    /// A launcher whose session artifact does not exist.
    pub fn without_session() -> Self {
        Self {
            session_missing: true,
            ..Self::new(ScriptedApp::new())
        }
    }

    pub fn opened(&self) -> usize {
        *self.opened.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn closed(&self) -> usize {
        *self.closed.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Everything the pipeline did to the page, in order.
    pub fn events(&self) -> Vec<PageEvent> {
        lock(&self.app).events.clone()
    }

    /// Selectors of the filters applied, in order.
    pub fn filter_selectors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                PageEvent::Filter(selector) => Some(selector),
                PageEvent::Department(_) => Some(selectors::DEPARTMENT_LABELS.to_string()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, event: &PageEvent) -> usize {
        self.events().iter().filter(|e| *e == event).count()
    }
}

#[async_trait]
impl SessionLauncher for ScriptedLauncher {
    async fn open(&self) -> Result<Box<dyn BrowserSession>, SwitchboardError> {
        if self.session_missing {
            return Err(SwitchboardError::SessionMissing {
                path: "scripted/session.json".to_string(),
            });
        }
        *self.opened.lock().unwrap_or_else(|p| p.into_inner()) += 1;
        Ok(Box::new(ScriptedSession {
            page: ScriptedPage {
                app: Arc::clone(&self.app),
            },
            closed: Arc::clone(&self.closed),
        }))
    }
}
