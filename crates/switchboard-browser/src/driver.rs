// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Browser driver seam.
//!
//! The pipeline only talks to a page through [`PageDriver`], and only
//! acquires pages through a [`SessionLauncher`]. The Chromium implementation
//! lives in [`crate::chromium`]; tests use an in-memory scripted driver.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use switchboard_core::SwitchboardError;

/// Operations the pipeline performs on a single page.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigates to `url`, returning once the document has committed.
    ///
    /// Fails with [`SwitchboardError::Timeout`] when the commit does not
    /// happen within `timeout`.
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), SwitchboardError>;

    /// The URL the page currently shows, after any client-side redirects.
    async fn current_url(&self) -> Result<String, SwitchboardError>;

    /// Evaluates a JavaScript expression and returns its JSON value.
    ///
    /// `undefined` results come back as [`Value::Null`].
    async fn evaluate(&self, expression: &str) -> Result<Value, SwitchboardError>;

    /// Dispatches a mouse-wheel event at viewport coordinates.
    async fn mouse_wheel(&self, x: f64, y: f64, delta_y: f64) -> Result<(), SwitchboardError>;
}

/// A launched browser bundled with its ready page.
///
/// Dropping a session without calling [`BrowserSession::close`] leaks the
/// browser process until the runtime shuts down.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    fn page(&self) -> &dyn PageDriver;

    /// Closes the page, the browser and any temporary profile.
    async fn close(self: Box<Self>) -> Result<(), SwitchboardError>;
}

/// Opens authenticated browser sessions.
#[async_trait]
pub trait SessionLauncher: Send + Sync {
    async fn open(&self) -> Result<Box<dyn BrowserSession>, SwitchboardError>;
}
