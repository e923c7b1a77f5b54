//! Query windows for the calendar views.
//!
//! Each view maps a focus date to the `[start, end]` window its renderer
//! needs. Ends are inclusive instants (…23:59:59.999), pairing with the
//! engine's inclusive overlap test.

use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// The agenda view lists this many days ahead of the focus date.
pub const AGENDA_SPAN_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Day,
    Week,
    Month,
    Year,
    Agenda,
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "day" => Ok(View::Day),
            "week" => Ok(View::Week),
            "month" => Ok(View::Month),
            "year" => Ok(View::Year),
            "agenda" => Ok(View::Agenda),
            other => Err(format!(
                "unknown view '{other}' (expected day, week, month, year, or agenda)"
            )),
        }
    }
}

/// First day of the week, a user setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl FromStr for WeekStart {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sunday" => Ok(WeekStart::Sunday),
            "monday" => Ok(WeekStart::Monday),
            other => Err(format!(
                "unknown week start '{other}' (expected sunday or monday)"
            )),
        }
    }
}

fn start_of_week(date: NaiveDate, week_start: WeekStart) -> NaiveDate {
    let days_in = match week_start {
        WeekStart::Sunday => date.weekday().num_days_from_sunday(),
        WeekStart::Monday => date.weekday().num_days_from_monday(),
    };
    date - Duration::days(i64::from(days_in))
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

fn last_of_month(date: NaiveDate) -> NaiveDate {
    // Jump into next month, then step back to its day zero.
    let next = first_of_month(date) + Duration::days(32);
    first_of_month(next) - Duration::days(1)
}

fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn day_end(date: NaiveDate) -> DateTime<Utc> {
    day_start(date) + Duration::days(1) - Duration::milliseconds(1)
}

/// Compute the query window for a view anchored at `date`.
///
/// - Day: the date itself.
/// - Week: the week containing the date.
/// - Month: the full visible grid, start of the week containing the 1st
///   through end of the week containing the last day, so leading and
///   trailing days of adjacent months are covered.
/// - Year: Jan 1 through Dec 31.
/// - Agenda: the date through [`AGENDA_SPAN_DAYS`] days later.
pub fn view_range(
    view: View,
    date: NaiveDate,
    week_start: WeekStart,
) -> (DateTime<Utc>, DateTime<Utc>) {
    match view {
        View::Day => (day_start(date), day_end(date)),
        View::Week => {
            let first = start_of_week(date, week_start);
            (day_start(first), day_end(first + Duration::days(6)))
        }
        View::Month => {
            let grid_first = start_of_week(first_of_month(date), week_start);
            let grid_last = start_of_week(last_of_month(date), week_start) + Duration::days(6);
            (day_start(grid_first), day_end(grid_last))
        }
        View::Year => {
            let jan1 = date - Duration::days(i64::from(date.ordinal0()));
            // Land anywhere in the next year, then walk back to its Jan 1.
            let into_next = jan1 + Duration::days(400);
            let next_jan1 = into_next - Duration::days(i64::from(into_next.ordinal0()));
            (day_start(jan1), day_end(next_jan1 - Duration::days(1)))
        }
        View::Agenda => {
            let start = day_start(date);
            (start, start + Duration::days(AGENDA_SPAN_DAYS))
        }
    }
}
