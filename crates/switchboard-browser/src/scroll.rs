// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Termination rule for incremental-load scrolling.

/// Consecutive observations without growth after which scrolling stops.
pub const STALL_LIMIT: u32 = 2;

/// What to do after observing the loaded item count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDecision {
    Continue,
    /// Enough items are loaded.
    TargetReached,
    /// The count stopped growing; the list is exhausted.
    Stalled,
}

/// Tracks loaded item counts across scroll steps.
#[derive(Debug, Clone)]
pub struct ScrollProgress {
    target: usize,
    last: Option<usize>,
    stalls: u32,
}

impl ScrollProgress {
    pub fn new(target: usize) -> Self {
        Self {
            target,
            last: None,
            stalls: 0,
        }
    }

    /// Records the count seen after a scroll step (or the initial count).
    pub fn observe(&mut self, count: usize) -> ScrollDecision {
        if count >= self.target {
            self.last = Some(count);
            return ScrollDecision::TargetReached;
        }
        match self.last {
            Some(previous) if count <= previous => self.stalls += 1,
            _ => self.stalls = 0,
        }
        self.last = Some(count);
        if self.stalls >= STALL_LIMIT {
            ScrollDecision::Stalled
        } else {
            ScrollDecision::Continue
        }
    }

    pub fn last_count(&self) -> usize {
        self.last.unwrap_or(0)
    }
}
