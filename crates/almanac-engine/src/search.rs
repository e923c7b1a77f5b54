//! Keyword search over stored events.
//!
//! Case-insensitive substring match across title, description, and location.
//! Operates on the stored (non-expanded) events only; recurrence instances
//! are not search targets, just the template event.

use crate::event::Event;

/// Find events whose title, description, or location contains `query`
/// (case-insensitive). Results are sorted by start ascending, ties broken by
/// event id. An empty query matches everything.
pub fn search_events<'a>(events: &'a [Event], query: &str) -> Vec<&'a Event> {
    let needle = query.to_lowercase();
    let contains = |field: &str| field.to_lowercase().contains(&needle);

    let mut matches: Vec<&Event> = events
        .iter()
        .filter(|e| {
            contains(&e.title)
                || e.description.as_deref().is_some_and(contains)
                || e.location.as_deref().is_some_and(contains)
        })
        .collect();

    matches.sort_by(|a, b| {
        a.times
            .start_utc()
            .cmp(&b.times.start_utc())
            .then_with(|| a.id.cmp(&b.id))
    });
    matches
}
