// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat list filters and the order they are applied in.

use serde::Deserialize;
use serde_json::json;
use switchboard_core::{ChatOrder, ChatStatus, FilterCriteria, SwitchboardError};

use crate::driver::PageDriver;
use crate::scripts::{self, selectors};

/// One filter interaction on the chat list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterStep {
    Name(String),
    Phone(String),
    Status(ChatStatus),
    Order(ChatOrder),
    UnreadOnly,
    Archived,
    Favorited,
    Department(String),
}

impl FilterStep {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Name(_) => "name",
            Self::Phone(_) => "phone",
            Self::Status(_) => "status",
            Self::Order(_) => "order",
            Self::UnreadOnly => "unread_only",
            Self::Archived => "archived",
            Self::Favorited => "favorited",
            Self::Department(_) => "department",
        }
    }

    pub(crate) fn expression(&self) -> String {
        match self {
            Self::Name(value) => text_filter(selectors::NAME_FILTER, value),
            Self::Phone(value) => text_filter(selectors::PHONE_FILTER, value),
            Self::Status(status) => {
                select_filter(selectors::STATUS_FILTER, &status.to_string(), status.label())
            }
            Self::Order(order) => {
                let value = order.to_string();
                select_filter(selectors::ORDER_FILTER, &value, &value)
            }
            Self::UnreadOnly => toggle(selectors::UNREAD_TOGGLE),
            Self::Archived => toggle(selectors::ARCHIVED_TOGGLE),
            Self::Favorited => toggle(selectors::FAVORITE_TOGGLE),
            Self::Department(value) => scripts::call(
                scripts::APPLY_DEPARTMENT_FILTER,
                &json!({ "selector": selectors::DEPARTMENT_LABELS, "value": value }),
            ),
        }
    }
}

fn text_filter(selector: &str, value: &str) -> String {
    scripts::call(
        scripts::APPLY_TEXT_FILTER,
        &json!({ "selector": selector, "value": value }),
    )
}

fn select_filter(selector: &str, value: &str, label: &str) -> String {
    scripts::call(
        scripts::APPLY_SELECT_FILTER,
        &json!({ "selector": selector, "value": value, "label": label }),
    )
}

fn toggle(selector: &str) -> String {
    scripts::call(scripts::APPLY_TOGGLE_FILTER, &json!({ "selector": selector }))
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// The filters to apply for `criteria`, in application order: text inputs,
/// then selects, then toggles, then department.
pub fn plan(criteria: &FilterCriteria) -> Vec<FilterStep> {
    let mut steps = Vec::new();
    if let Some(name) = non_blank(&criteria.name) {
        steps.push(FilterStep::Name(name));
    }
    if let Some(phone) = non_blank(&criteria.phone) {
        steps.push(FilterStep::Phone(phone));
    }
    if let Some(status) = criteria.status {
        steps.push(FilterStep::Status(status));
    }
    if let Some(order) = criteria.order {
        steps.push(FilterStep::Order(order));
    }
    if criteria.unread_only {
        steps.push(FilterStep::UnreadOnly);
    }
    if criteria.archived {
        steps.push(FilterStep::Archived);
    }
    if criteria.favorited {
        steps.push(FilterStep::Favorited);
    }
    if let Some(department) = non_blank(&criteria.department) {
        steps.push(FilterStep::Department(department));
    }
    steps
}

/// Result reported by a filter script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FilterOutcome {
    /// False when the control (or a matching option) was not found.
    pub applied: bool,
    /// Text of the option or label that was picked.
    pub matched: Option<String>,
    /// For departments, whether the label matched exactly.
    pub exact: Option<bool>,
}

impl FilterOutcome {
    pub fn matched_by_substring(&self) -> bool {
        self.applied && self.exact == Some(false)
    }
}

/// Runs one filter step on the page.
pub async fn apply(
    page: &dyn PageDriver,
    step: &FilterStep,
) -> Result<FilterOutcome, SwitchboardError> {
    let value = page.evaluate(&step.expression()).await?;
    if value.is_null() {
        return Ok(FilterOutcome::default());
    }
    serde_json::from_value(value).map_err(|e| SwitchboardError::Browser {
        message: format!("unexpected result from {} filter: {e}", step.label()),
        source: Some(Box::new(e)),
    })
}
