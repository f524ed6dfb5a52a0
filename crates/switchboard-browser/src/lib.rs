// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Browser automation for the chat web app.
//!
//! Restores the saved login session into a throwaway Chromium profile and
//! scrapes the chat list and individual conversations. The pipeline is
//! written against the [`driver`] traits so it can run without a browser.

pub mod chromium;
pub mod driver;
pub mod extract;
pub mod filters;
pub mod pipeline;
pub mod scripts;
pub mod scroll;
pub mod session;
pub mod timing;

pub use driver::{BrowserSession, PageDriver, SessionLauncher};
pub use extract::{ConversationNode, PageSnapshot, RawChatCard};
pub use pipeline::{
    is_login_url, ChatListing, ChatPipeline, MessageHistory, DEFAULT_MESSAGE_LIMIT,
    MAX_MESSAGE_LIMIT,
};
pub use session::{SessionArtifact, SessionStore};
pub use timing::PipelineTiming;
