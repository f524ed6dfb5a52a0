// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Settle delays and scroll limits for the pipeline.

use std::time::Duration;

use switchboard_config::model::BrowserConfig;

/// Named waits and bounds used by the pipeline.
///
/// The web app renders asynchronously and offers no readiness signal, so each
/// step that mutates the page is followed by a fixed settle delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineTiming {
    /// Upper bound for a navigation to commit.
    pub navigation_timeout: Duration,
    /// Wait after a navigation commits.
    pub navigation_settle: Duration,
    /// Wait after each applied filter.
    pub filter_settle: Duration,
    /// Wait after each scroll step.
    pub scroll_settle: Duration,
    /// Wait after removing overlays.
    pub overlay_settle: Duration,
    /// Maximum scroll steps per extraction.
    pub max_scroll_iterations: u32,
}

impl PipelineTiming {
    pub fn from_config(config: &BrowserConfig) -> Self {
        Self {
            navigation_timeout: config.navigation_timeout(),
            navigation_settle: Duration::from_millis(config.navigation_settle_ms),
            filter_settle: Duration::from_millis(config.filter_settle_ms),
            scroll_settle: Duration::from_millis(config.scroll_settle_ms),
            overlay_settle: Duration::from_millis(config.overlay_settle_ms),
            max_scroll_iterations: config.max_scroll_iterations.max(1),
        }
    }

    /// No settle delays at all. Navigation is still bounded.
    pub fn immediate(max_scroll_iterations: u32) -> Self {
        Self {
            navigation_timeout: Duration::from_secs(5),
            navigation_settle: Duration::ZERO,
            filter_settle: Duration::ZERO,
            scroll_settle: Duration::ZERO,
            overlay_settle: Duration::ZERO,
            max_scroll_iterations: max_scroll_iterations.max(1),
        }
    }
}

impl Default for PipelineTiming {
    fn default() -> Self {
        Self::from_config(&BrowserConfig::default())
    }
}

/// Sleeps for `duration`, skipping the timer entirely for zero durations.
pub(crate) async fn settle(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}
