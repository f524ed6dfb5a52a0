// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Switchboard integration tests.
//!
//! Provides an in-memory browser driver so the scraping pipeline and the
//! tools built on it can be tested without launching Chromium.
//!
//! # Components
//!
//! - [`ScriptedLauncher`] - hands out sessions over a [`ScriptedApp`]
//! - [`fixtures`] - chat cards, message rows and date separators

pub mod fixtures;
pub mod scripted;

pub use scripted::{PageEvent, ScriptedApp, ScriptedLauncher, ScriptedPage};
