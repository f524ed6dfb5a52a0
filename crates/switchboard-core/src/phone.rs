// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Phone number normalization.
//!
//! Converts human-entered phone strings into the digit-only international form
//! the platform expects. Normalization is deliberately permissive: malformed
//! input degrades to a best-effort digit string instead of failing.

use crate::types::PhoneNumber;

/// Country prefix assumed for numbers entered without one.
pub const DOMESTIC_PREFIX: &str = "55";

/// Normalizes `input` using the [`DOMESTIC_PREFIX`].
pub fn normalize(input: &str) -> PhoneNumber {
    normalize_with_prefix(input, DOMESTIC_PREFIX)
}

/// Normalizes `input`, prepending `prefix` to domestic numbers.
///
/// - digits already starting with `prefix` and at least 12 long are returned as-is
/// - 10 or 11 digits are treated as a domestic number and get the prefix
/// - anything else is returned as the stripped digits
pub fn normalize_with_prefix(input: &str, prefix: &str) -> PhoneNumber {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();

    if digits.starts_with(prefix) && digits.len() >= 12 {
        return PhoneNumber(digits);
    }

    if matches!(digits.len(), 10 | 11) {
        return PhoneNumber(format!("{prefix}{digits}"));
    }

    PhoneNumber(digits)
}
