//! Property-based tests for the occurrence engine using proptest.
//!
//! These verify invariants that must hold for *any* valid event, rule, and
//! query window, not just the examples in the unit tests.

use std::collections::HashSet;

use almanac_engine::{
    query_occurrences, Color, Event, EventTimes, Frequency, RecurrenceRule, Schedule,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_freq() -> impl Strategy<Value = Frequency> {
    prop_oneof![
        Just(Frequency::Daily),
        Just(Frequency::Weekly),
        Just(Frequency::Monthly),
        Just(Frequency::Yearly),
    ]
}

fn arb_interval() -> impl Strategy<Value = i64> {
    1i64..=6
}

fn arb_count() -> impl Strategy<Value = i64> {
    1i64..=20
}

/// Event starts in 2024-2026; day capped at 28 so every month/year advance
/// lands on an existing date (the skip rule is covered by unit tests).
fn arb_start() -> impl Strategy<Value = DateTime<Utc>> {
    (2024i32..=2026, 1u32..=12, 1u32..=28, 0u32..=23, 0u32..=59)
        .prop_map(|(y, mo, d, h, mi)| Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap())
}

/// Duration of one instance, 15 minutes to 8 hours.
fn arb_span_minutes() -> impl Strategy<Value = i64> {
    15i64..=480
}

/// Query window anchored near the event range, up to ~100 days wide.
fn arb_window() -> impl Strategy<Value = (DateTime<Utc>, DateTime<Utc>)> {
    (arb_start(), 1i64..=100).prop_map(|(start, days)| (start, start + Duration::days(days)))
}

fn single_calendar() -> HashSet<String> {
    ["cal".to_string()].into_iter().collect()
}

fn build_event(
    start: DateTime<Utc>,
    span_minutes: i64,
    schedule: Schedule,
) -> Event {
    Event {
        id: "evt".to_string(),
        title: "generated".to_string(),
        description: None,
        times: EventTimes::Timed {
            start,
            end: start + Duration::minutes(span_minutes),
        },
        calendar_id: "cal".to_string(),
        color: Color::Blue,
        location: None,
        guests: Vec::new(),
        schedule,
        timezone: None,
    }
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Property 1: non-recurring inclusion matches the overlap formula exactly
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn single_event_included_iff_overlap(
        start in arb_start(),
        span in arb_span_minutes(),
        (range_start, range_end) in arb_window(),
    ) {
        let event = build_event(start, span, Schedule::Once);
        let end = start + Duration::minutes(span);

        let result = query_occurrences(&[event], &single_calendar(), range_start, range_end);
        let expected = start <= range_end && end >= range_start;

        prop_assert_eq!(result.len(), usize::from(expected));
    }
}

// ---------------------------------------------------------------------------
// Property 2: expansion output is sorted and stays inside the window
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn occurrences_sorted_and_overlapping(
        freq in arb_freq(),
        interval in arb_interval(),
        start in arb_start(),
        span in arb_span_minutes(),
        (range_start, range_end) in arb_window(),
    ) {
        let rule = RecurrenceRule::new(freq, interval, None, None).unwrap();
        let event = build_event(start, span, Schedule::Recurring(rule));

        let result = query_occurrences(&[event], &single_calendar(), range_start, range_end);

        for window in result.windows(2) {
            prop_assert!(window[0].start <= window[1].start, "not sorted");
        }
        for occ in &result {
            prop_assert!(
                occ.start <= range_end && occ.end >= range_start,
                "occurrence {:?} outside window [{:?}, {:?}]",
                occ.start, range_start, range_end
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Property 3: count is never exceeded
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn count_bound_holds(
        freq in arb_freq(),
        interval in arb_interval(),
        count in arb_count(),
        start in arb_start(),
        span in arb_span_minutes(),
        window_days in 1i64..=730,
    ) {
        let rule = RecurrenceRule::new(freq, interval, None, Some(count)).unwrap();
        let event = build_event(start, span, Schedule::Recurring(rule));

        let result = query_occurrences(
            &[event],
            &single_calendar(),
            start,
            start + Duration::days(window_days),
        );

        prop_assert!(result.len() as i64 <= count);
    }
}

// ---------------------------------------------------------------------------
// Property 4: every instance preserves the original duration
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn duration_preserved_per_instance(
        freq in arb_freq(),
        interval in arb_interval(),
        start in arb_start(),
        span in arb_span_minutes(),
    ) {
        let rule = RecurrenceRule::new(freq, interval, None, Some(10)).unwrap();
        let event = build_event(start, span, Schedule::Recurring(rule));

        let result = query_occurrences(
            &[event],
            &single_calendar(),
            start,
            start + Duration::days(3660),
        );

        prop_assert!(!result.is_empty());
        for occ in &result {
            prop_assert_eq!(occ.end - occ.start, Duration::minutes(span));
        }
    }
}

// ---------------------------------------------------------------------------
// Property 5: no occurrence starts after the rule's end date
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn end_date_bound_holds(
        freq in arb_freq(),
        interval in arb_interval(),
        start in arb_start(),
        span in arb_span_minutes(),
        bound_days in 0i64..=120,
    ) {
        let end_date = start + Duration::days(bound_days);
        let rule = RecurrenceRule::new(freq, interval, Some(end_date), None).unwrap();
        let event = build_event(start, span, Schedule::Recurring(rule));

        let result = query_occurrences(
            &[event],
            &single_calendar(),
            start - Duration::days(1),
            start + Duration::days(365),
        );

        prop_assert!(result.iter().all(|occ| occ.start <= end_date));
    }
}

// ---------------------------------------------------------------------------
// Property 6: hidden calendars contribute nothing
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn hidden_calendar_never_leaks(
        freq in arb_freq(),
        interval in arb_interval(),
        start in arb_start(),
        span in arb_span_minutes(),
    ) {
        let rule = RecurrenceRule::new(freq, interval, None, None).unwrap();
        let event = build_event(start, span, Schedule::Recurring(rule));

        let hidden: HashSet<String> = HashSet::new();
        let result = query_occurrences(
            &[event],
            &hidden,
            start,
            start + Duration::days(30),
        );

        prop_assert!(result.is_empty());
    }
}
