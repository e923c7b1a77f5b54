//! Event domain model and boundary validation.
//!
//! Events cross the wire as [`EventDraft`] (camelCase JSON, instants as
//! ISO-8601 strings, every field optional). Validation turns a draft into an
//! [`Event`], where the shape is a tagged variant: timed vs all-day crossed
//! with once vs recurring. Everything downstream matches exhaustively on
//! those variants instead of re-checking optional fields.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};

/// The seven calendar colors the product supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    #[default]
    Blue,
    Red,
    Green,
    Orange,
    Purple,
    Cyan,
    Gray,
}

/// Recurrence frequency. `None` on the wire means "does not recur".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    #[default]
    None,
}

/// A validated recurrence rule.
///
/// Fields are private so an invalid rule (zero or negative interval) cannot
/// be constructed; go through [`RecurrenceRule::new`]. `frequency` is never
/// [`Frequency::None`] here; that case validates to [`Schedule::Once`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    frequency: Frequency,
    interval: u32,
    end_date: Option<DateTime<Utc>>,
    count: Option<u32>,
}

impl RecurrenceRule {
    /// Build a rule, rejecting non-positive `interval` or `count`.
    pub fn new(
        frequency: Frequency,
        interval: i64,
        end_date: Option<DateTime<Utc>>,
        count: Option<i64>,
    ) -> Result<Self> {
        if interval <= 0 {
            return Err(ValidationError::NonPositiveInterval(interval));
        }
        let count = match count {
            Some(c) if c <= 0 => return Err(ValidationError::NonPositiveCount(c)),
            Some(c) => Some(c as u32),
            None => None,
        };
        Ok(Self {
            frequency,
            interval: interval as u32,
            end_date,
            count,
        })
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Inclusive upper bound on instance starts, if set.
    pub fn end_date(&self) -> Option<DateTime<Utc>> {
        self.end_date
    }

    /// Maximum number of materialized occurrences, if set.
    pub fn count(&self) -> Option<u32> {
        self.count
    }
}

/// When an event happens: at a pair of instants, or across whole calendar
/// days (inclusive date range).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventTimes {
    Timed {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    AllDay {
        start: NaiveDate,
        end: NaiveDate,
    },
}

impl EventTimes {
    /// Inclusive overlap against a query window.
    ///
    /// All-day events are compared at day granularity: the window bounds are
    /// collapsed to their calendar dates first, so a day-long event is not
    /// truncated by the time-of-day component of the window.
    pub fn overlaps(&self, range_start: DateTime<Utc>, range_end: DateTime<Utc>) -> bool {
        match *self {
            EventTimes::Timed { start, end } => start <= range_end && end >= range_start,
            EventTimes::AllDay { start, end } => {
                start <= range_end.date_naive() && end >= range_start.date_naive()
            }
        }
    }

    /// Start as a UTC instant (midnight for all-day events). Used for
    /// sorting and the repository's coarse range filter.
    pub fn start_utc(&self) -> DateTime<Utc> {
        match *self {
            EventTimes::Timed { start, .. } => start,
            EventTimes::AllDay { start, .. } => start.and_time(NaiveTime::MIN).and_utc(),
        }
    }

    /// End as a UTC instant (midnight of the inclusive last day for all-day
    /// events).
    pub fn end_utc(&self) -> DateTime<Utc> {
        match *self {
            EventTimes::Timed { end, .. } => end,
            EventTimes::AllDay { end, .. } => end.and_time(NaiveTime::MIN).and_utc(),
        }
    }

    pub fn is_all_day(&self) -> bool {
        matches!(self, EventTimes::AllDay { .. })
    }

    /// Span of a single instance: exact for timed events, whole days for
    /// all-day events. Recurrence expansion preserves this per instance.
    pub(crate) fn span(&self) -> Duration {
        match *self {
            EventTimes::Timed { start, end } => end - start,
            EventTimes::AllDay { start, end } => {
                Duration::days(end.signed_duration_since(start).num_days())
            }
        }
    }
}

/// Whether an event happens once or repeats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schedule {
    Once,
    Recurring(RecurrenceRule),
}

/// A validated calendar event.
///
/// Serializes to and deserializes from the wire shape via [`EventDraft`];
/// deserialization therefore runs full validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EventDraft", into = "EventDraft")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub times: EventTimes,
    pub calendar_id: String,
    pub color: Color,
    pub location: Option<String>,
    pub guests: Vec<String>,
    pub schedule: Schedule,
    pub timezone: Option<Tz>,
}

impl Event {
    pub fn recurrence(&self) -> Option<&RecurrenceRule> {
        match &self.schedule {
            Schedule::Once => None,
            Schedule::Recurring(rule) => Some(rule),
        }
    }
}

/// Wire-level recurrence rule, prior to validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecurrenceDraft {
    pub frequency: Frequency,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
}

/// Wire-level event, prior to validation.
///
/// Every field is optional so the same struct serves as a create payload and
/// as a partial-update patch (see [`EventDraft::merge_into`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_day: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guests: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecurrenceDraft>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl EventDraft {
    /// Overlay this draft's set fields onto an existing event's draft form.
    /// Fields left `None` in the patch keep their current values. The merged
    /// result must still be re-validated.
    pub fn merge_into(self, base: EventDraft) -> EventDraft {
        EventDraft {
            id: base.id,
            title: self.title.or(base.title),
            description: self.description.or(base.description),
            start: self.start.or(base.start),
            end: self.end.or(base.end),
            all_day: self.all_day.or(base.all_day),
            calendar_id: self.calendar_id.or(base.calendar_id),
            color: self.color.or(base.color),
            location: self.location.or(base.location),
            guests: self.guests.or(base.guests),
            recurrence: self.recurrence.or(base.recurrence),
            timezone: self.timezone.or(base.timezone),
        }
    }
}

/// Parse an instant from the wire.
///
/// Accepts RFC 3339 with offset ("2024-06-10T09:00:00Z"), a bare local
/// datetime treated as UTC ("2024-06-10T09:00:00"), or a bare date
/// ("2024-06-10", midnight UTC). Anything else is a `ValidationError`.
pub fn parse_instant(field: &'static str, value: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }
    Err(ValidationError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T> {
    value.ok_or(ValidationError::MissingField(field))
}

impl TryFrom<EventDraft> for Event {
    type Error = ValidationError;

    fn try_from(draft: EventDraft) -> Result<Self> {
        let id = required(draft.id, "id")?;
        let title = match draft.title {
            Some(t) if !t.trim().is_empty() => t.trim().to_string(),
            _ => return Err(ValidationError::MissingField("title")),
        };
        let calendar_id = required(draft.calendar_id, "calendarId")?;

        let start_raw = required(draft.start, "start")?;
        let end_raw = required(draft.end, "end")?;
        let start = parse_instant("start", &start_raw)?;
        let end = parse_instant("end", &end_raw)?;

        let times = if draft.all_day.unwrap_or(false) {
            let (start, end) = (start.date_naive(), end.date_naive());
            if end < start {
                return Err(ValidationError::EndBeforeStart);
            }
            EventTimes::AllDay { start, end }
        } else {
            if end < start {
                return Err(ValidationError::EndBeforeStart);
            }
            EventTimes::Timed { start, end }
        };

        let schedule = match draft.recurrence {
            Some(rec) if rec.frequency != Frequency::None => {
                let end_date = rec
                    .end_date
                    .as_deref()
                    .map(|raw| parse_instant("recurrence.endDate", raw))
                    .transpose()?;
                Schedule::Recurring(RecurrenceRule::new(
                    rec.frequency,
                    rec.interval.unwrap_or(1),
                    end_date,
                    rec.count,
                )?)
            }
            _ => Schedule::Once,
        };

        let timezone = draft
            .timezone
            .map(|raw| {
                raw.parse::<Tz>()
                    .map_err(|_| ValidationError::UnknownTimezone(raw))
            })
            .transpose()?;

        Ok(Event {
            id,
            title,
            description: draft.description,
            times,
            calendar_id,
            color: draft.color.unwrap_or_default(),
            location: draft.location,
            guests: draft.guests.unwrap_or_default(),
            schedule,
            timezone,
        })
    }
}

impl From<Event> for EventDraft {
    fn from(event: Event) -> Self {
        let iso = |dt: DateTime<Utc>| dt.to_rfc3339_opts(SecondsFormat::Millis, true);
        let (start, end, all_day) = match event.times {
            EventTimes::Timed { start, end } => (iso(start), iso(end), false),
            EventTimes::AllDay { start, end } => (
                iso(start.and_time(NaiveTime::MIN).and_utc()),
                iso(end.and_time(NaiveTime::MIN).and_utc()),
                true,
            ),
        };
        let recurrence = match event.schedule {
            Schedule::Once => None,
            Schedule::Recurring(rule) => Some(RecurrenceDraft {
                frequency: rule.frequency(),
                interval: Some(i64::from(rule.interval())),
                end_date: rule.end_date().map(iso),
                count: rule.count().map(i64::from),
            }),
        };
        EventDraft {
            id: Some(event.id),
            title: Some(event.title),
            description: event.description,
            start: Some(start),
            end: Some(end),
            all_day: Some(all_day),
            calendar_id: Some(event.calendar_id),
            color: Some(event.color),
            location: event.location,
            guests: Some(event.guests),
            recurrence,
            timezone: event.timezone.map(|tz| tz.name().to_string()),
        }
    }
}
