// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resilient client for the messaging platform's RPC endpoint.
//!
//! [`PlatformClient::call`] is the single entry point for direct API
//! operations: identity parameters in the query string, form-encoded action
//! parameters, bounded exponential backoff for transient failures, and
//! classified errors for everything else.

pub mod actions;
pub mod classify;
pub mod client;
pub mod retry;

pub use actions::RpcAction;
pub use client::{CallOptions, PlatformClient, RequestOutcome};
pub use retry::RetryPolicy;
