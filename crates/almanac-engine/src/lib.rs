//! # almanac-engine
//!
//! The occurrence engine behind the Almanac calendar: given stored events
//! and a query window, materialize the concrete occurrences that intersect
//! it, expanding recurrences, comparing all-day events at day granularity,
//! and filtering by calendar visibility.
//!
//! ## Modules
//!
//! - [`query`]: the engine itself, events + window → sorted [`Occurrence`] list
//!   (recurrence expansion lives in a private `expand` module behind it)
//! - [`search`]: case-insensitive keyword search over stored events
//! - [`view`]: day/week/month/year/agenda query windows
//! - [`event`], [`calendar`]: domain model and boundary validation
//! - [`store`]: repository seam with an in-memory implementation
//! - [`error`]: error types

pub mod calendar;
pub mod error;
pub mod event;
mod expand;
pub mod query;
pub mod search;
pub mod store;
pub mod view;

pub use calendar::{visible_calendar_ids, Calendar, CalendarPatch};
pub use error::{StoreError, ValidationError};
pub use event::{
    parse_instant, Color, Event, EventDraft, EventTimes, Frequency, RecurrenceDraft,
    RecurrenceRule, Schedule,
};
pub use query::{query_occurrences, Occurrence};
pub use search::search_events;
pub use store::{EventRepository, InMemoryStore};
pub use view::{view_range, View, WeekStart, AGENDA_SPAN_DAYS};
