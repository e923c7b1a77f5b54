//! Calendars and the visibility filter.
//!
//! A calendar's `visible` flag only affects query-time filtering; toggling
//! it never touches the events stored under that calendar.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::event::Color;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Calendar {
    pub id: String,
    pub name: String,
    pub color: Color,
    pub visible: bool,
}

/// Partial update for a calendar (rename, recolor, toggle visibility).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalendarPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

impl CalendarPatch {
    pub fn apply(self, calendar: &mut Calendar) {
        if let Some(name) = self.name {
            calendar.name = name;
        }
        if let Some(color) = self.color {
            calendar.color = color;
        }
        if let Some(visible) = self.visible {
            calendar.visible = visible;
        }
    }
}

/// Collect the ids of visible calendars, the set
/// [`query_occurrences`](crate::query_occurrences) filters against.
pub fn visible_calendar_ids(calendars: &[Calendar]) -> HashSet<String> {
    calendars
        .iter()
        .filter(|c| c.visible)
        .map(|c| c.id.clone())
        .collect()
}
