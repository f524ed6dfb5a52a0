// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Switchboard.

use std::time::Duration;

use thiserror::Error;

/// The primary error type used across all Switchboard crates.
///
/// Variants follow the failure taxonomy of the system: transport failures
/// (`Connection`, `Http`), business failures (`Api`), precondition failures
/// (`SessionMissing`, `SessionExpired`), and browser-side failures.
#[derive(Debug, Error)]
pub enum SwitchboardError {
    /// Configuration errors (missing identifiers, invalid values).
    #[error("configuration error: {0}")]
    Config(String),

    /// The platform could not be reached after exhausting the retry budget.
    #[error("connection failed after {attempts} attempt(s): {message}")]
    Connection {
        attempts: u32,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The platform answered with a non-success HTTP status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The platform accepted the request but reported a business failure.
    #[error("platform rejected the request: {message}")]
    Api { message: String },

    /// A response body could not be decoded.
    #[error("failed to decode response: {message}")]
    Decode {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// No persisted browser session exists.
    #[error(
        "no saved browser session at {path}; run the login flow to create one before using browser-backed tools"
    )]
    SessionMissing { path: String },

    /// The persisted session was rejected by the web app.
    #[error(
        "browser session expired (redirected to {url}); re-run the login flow to refresh the saved session"
    )]
    SessionExpired { url: String },

    /// The session artifact exists but cannot be used.
    #[error("session artifact error: {message}")]
    Session {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Browser launch, navigation, or script evaluation failed.
    #[error("browser error: {message}")]
    Browser {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: Duration },

    /// Caller-supplied parameters were rejected.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SwitchboardError {
    /// Shorthand for a browser error without an underlying source.
    pub fn browser(message: impl Into<String>) -> Self {
        Self::Browser {
            message: message.into(),
            source: None,
        }
    }

    /// Returns true for failures caused by the persisted session rather than
    /// the request itself. These are terminal for the calling operation.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::SessionMissing { .. } | Self::SessionExpired { .. } | Self::Session { .. }
        )
    }
}
