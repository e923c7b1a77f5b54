//! The occurrence engine: deciding which events appear in a query window.
//!
//! A pure, synchronous function over in-memory data: no I/O, no mutation of
//! its inputs, trivially safe to call concurrently.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::{Event, EventTimes};
use crate::expand;

/// One materialized instance of an event inside a query window.
///
/// Derived, never persisted. `event_id` is the back-reference to the source
/// event. For all-day occurrences `start`/`end` are the UTC midnights of the
/// inclusive first and last day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    pub event_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub all_day: bool,
}

impl Occurrence {
    pub(crate) fn from_times(event: &Event, times: &EventTimes) -> Self {
        Occurrence {
            event_id: event.id.clone(),
            start: times.start_utc(),
            end: times.end_utc(),
            all_day: times.is_all_day(),
        }
    }
}

/// Materialize every occurrence intersecting `[range_start, range_end]`.
///
/// Events on calendars outside `visible_calendar_ids` are dropped first.
/// Non-recurring events get the inclusive overlap test
/// (`start <= range_end && end >= range_start`, day granularity for all-day
/// events); recurring events are expanded and each instance gets the same
/// test. Results are sorted by start ascending, ties broken by event id for
/// determinism.
pub fn query_occurrences(
    events: &[Event],
    visible_calendar_ids: &HashSet<String>,
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
) -> Vec<Occurrence> {
    let mut occurrences = Vec::new();

    for event in events
        .iter()
        .filter(|e| visible_calendar_ids.contains(&e.calendar_id))
    {
        match event.recurrence() {
            None => {
                if event.times.overlaps(range_start, range_end) {
                    occurrences.push(Occurrence::from_times(event, &event.times));
                }
            }
            Some(rule) => {
                occurrences.extend(expand::expand_recurring(event, rule, range_start, range_end));
            }
        }
    }

    occurrences.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then_with(|| a.event_id.cmp(&b.event_id))
    });
    occurrences
}
