// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool trait, registry, and built-in tools for Switchboard.
//!
//! Every capability exposed to the automated caller is a [`Tool`]. Calls go
//! through [`ToolRegistry::dispatch`], which never fails: errors come back as
//! text flagged `is_error`.

pub mod builtin;
pub mod tool;

pub use builtin::{register_builtins, Backends};
pub use tool::{Tool, ToolOutput, ToolRegistry};
