//! Recurrence expansion: generates the concrete instances of a recurring
//! event that fall inside a query window.
//!
//! Instance `k` starts at the original start advanced by `k * interval`
//! units of the rule's frequency. Advancing is always computed from the
//! original start, never the previous instance, so a monthly rule anchored
//! on the 31st skips short months and resumes on the next month that has a
//! 31st instead of drifting to the 28th.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

use crate::event::{Event, EventTimes, Frequency, RecurrenceRule};
use crate::query::Occurrence;

/// Advance a date by `steps` units of `freq`.
///
/// Monthly and yearly advancement keeps the anchor day-of-month; when the
/// target month has no such day (Jan 31 -> Feb, Feb 29 -> non-leap year)
/// the result is `None` and the instance is skipped.
fn advance_date(base: NaiveDate, freq: Frequency, steps: i64) -> Option<NaiveDate> {
    match freq {
        Frequency::Daily => base.checked_add_signed(Duration::days(steps)),
        Frequency::Weekly => base.checked_add_signed(Duration::days(7 * steps)),
        Frequency::Monthly => {
            let months = i64::from(base.year()) * 12 + i64::from(base.month0()) + steps;
            let year = i32::try_from(months.div_euclid(12)).ok()?;
            let month = months.rem_euclid(12) as u32 + 1;
            NaiveDate::from_ymd_opt(year, month, base.day())
        }
        Frequency::Yearly => {
            let year = i32::try_from(i64::from(base.year()) + steps).ok()?;
            NaiveDate::from_ymd_opt(year, base.month(), base.day())
        }
        // Validated rules never carry `none`; nothing to advance by.
        Frequency::None => None,
    }
}

/// Advance an event's times by `steps` units, preserving the original span.
fn advance_times(times: &EventTimes, freq: Frequency, steps: i64) -> Option<EventTimes> {
    let span = times.span();
    match *times {
        EventTimes::Timed { start, .. } => {
            let date = advance_date(start.date_naive(), freq, steps)?;
            let start = date.and_time(start.time()).and_utc();
            Some(EventTimes::Timed {
                start,
                end: start + span,
            })
        }
        EventTimes::AllDay { start, .. } => {
            let start = advance_date(start, freq, steps)?;
            let end = start.checked_add_signed(span)?;
            Some(EventTimes::AllDay { start, end })
        }
    }
}

/// Expand one recurring event against a query window.
///
/// Expansion stops when an instance start passes `range_end`, passes the
/// rule's inclusive `end_date`, or `count` instances have materialized.
/// Instances before the window still consume `count`; skipped nonexistent
/// dates do not.
pub(crate) fn expand_recurring(
    event: &Event,
    rule: &RecurrenceRule,
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
) -> Vec<Occurrence> {
    if rule.frequency() == Frequency::None {
        return Vec::new();
    }

    let mut occurrences = Vec::new();
    let mut produced: u32 = 0;

    for k in 0i64.. {
        if rule.count().is_some_and(|limit| produced >= limit) {
            break;
        }

        let steps = k * i64::from(rule.interval());
        let Some(instance) = advance_times(&event.times, rule.frequency(), steps) else {
            // Nonexistent day-of-month: skip, keep scanning forward.
            continue;
        };

        let instance_start = instance.start_utc();
        if instance_start > range_end {
            break;
        }
        if rule.end_date().is_some_and(|bound| instance_start > bound) {
            break;
        }

        produced += 1;
        if instance.overlaps(range_start, range_end) {
            occurrences.push(Occurrence::from_times(event, &instance));
        }
    }

    occurrences
}
