//! Repository abstraction over stored events and calendars.
//!
//! The engine never talks to storage itself; callers fetch a coarsely
//! pre-filtered event set through [`EventRepository`] and hand it to
//! [`query_occurrences`](crate::query_occurrences). [`InMemoryStore`] backs
//! tests and the CLI; a real deployment would put a database behind the same
//! trait.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::calendar::{Calendar, CalendarPatch};
use crate::error::StoreError;
use crate::event::{Event, EventDraft};
use crate::search::search_events;

/// Storage seam between persistence and the occurrence engine.
///
/// Every event operation is scoped to the owning user: events are created,
/// mutated, and deleted by their owner only, and reads never leak another
/// owner's events.
pub trait EventRepository {
    /// Coarse pre-filter for an occurrence query: the owner's non-recurring
    /// events overlapping the window, plus every recurring template whose
    /// series starts on or before `range_end` (its instances may reach into
    /// the window even when the template itself does not).
    fn events_in_range(
        &self,
        owner: &str,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Vec<Event>;

    fn get_event(&self, owner: &str, id: &str) -> Option<Event>;

    /// Validate a draft and store it under a fresh id.
    fn create_event(&mut self, owner: &str, draft: EventDraft) -> Result<Event, StoreError>;

    /// Overlay a partial draft onto the stored event and re-validate.
    fn update_event(
        &mut self,
        owner: &str,
        id: &str,
        patch: EventDraft,
    ) -> Result<Event, StoreError>;

    fn delete_event(&mut self, owner: &str, id: &str) -> Result<(), StoreError>;

    /// Keyword search over the owner's stored events.
    fn search(&self, owner: &str, query: &str) -> Vec<Event>;

    fn calendars(&self) -> Vec<Calendar>;

    fn update_calendar(&mut self, id: &str, patch: CalendarPatch) -> Result<Calendar, StoreError>;
}

struct StoredEvent {
    owner: String,
    event: Event,
}

/// In-memory repository over `BTreeMap`s (deterministic iteration order).
#[derive(Default)]
pub struct InMemoryStore {
    events: BTreeMap<String, StoredEvent>,
    calendars: BTreeMap<String, Calendar>,
    next_id: u64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a calendar, replacing any existing one with the same id.
    pub fn add_calendar(&mut self, calendar: Calendar) {
        self.calendars.insert(calendar.id.clone(), calendar);
    }

    /// Seed an already-validated event, keeping its id.
    pub fn insert_event(&mut self, owner: &str, event: Event) {
        self.events.insert(
            event.id.clone(),
            StoredEvent {
                owner: owner.to_string(),
                event,
            },
        );
    }

    fn owned_events<'a>(&'a self, owner: &'a str) -> impl Iterator<Item = &'a Event> + 'a {
        self.events
            .values()
            .filter(move |stored| stored.owner == owner)
            .map(|stored| &stored.event)
    }
}

fn sort_by_start(mut events: Vec<Event>) -> Vec<Event> {
    events.sort_by(|a, b| {
        a.times
            .start_utc()
            .cmp(&b.times.start_utc())
            .then_with(|| a.id.cmp(&b.id))
    });
    events
}

impl EventRepository for InMemoryStore {
    fn events_in_range(
        &self,
        owner: &str,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Vec<Event> {
        let matching = self
            .owned_events(owner)
            .filter(|event| match event.recurrence() {
                None => event.times.overlaps(range_start, range_end),
                Some(_) => event.times.start_utc() <= range_end,
            })
            .cloned()
            .collect();
        sort_by_start(matching)
    }

    fn get_event(&self, owner: &str, id: &str) -> Option<Event> {
        self.events
            .get(id)
            .filter(|stored| stored.owner == owner)
            .map(|stored| stored.event.clone())
    }

    fn create_event(&mut self, owner: &str, mut draft: EventDraft) -> Result<Event, StoreError> {
        self.next_id += 1;
        draft.id = Some(format!("evt-{}", self.next_id));
        let event = Event::try_from(draft)?;
        self.insert_event(owner, event.clone());
        Ok(event)
    }

    fn update_event(
        &mut self,
        owner: &str,
        id: &str,
        patch: EventDraft,
    ) -> Result<Event, StoreError> {
        let existing = self
            .get_event(owner, id)
            .ok_or_else(|| StoreError::EventNotFound(id.to_string()))?;
        let merged = patch.merge_into(EventDraft::from(existing));
        let updated = Event::try_from(merged)?;
        self.insert_event(owner, updated.clone());
        Ok(updated)
    }

    fn delete_event(&mut self, owner: &str, id: &str) -> Result<(), StoreError> {
        match self.events.get(id) {
            Some(stored) if stored.owner == owner => {
                self.events.remove(id);
                Ok(())
            }
            _ => Err(StoreError::EventNotFound(id.to_string())),
        }
    }

    fn search(&self, owner: &str, query: &str) -> Vec<Event> {
        let owned: Vec<Event> = self.owned_events(owner).cloned().collect();
        search_events(&owned, query).into_iter().cloned().collect()
    }

    fn calendars(&self) -> Vec<Calendar> {
        self.calendars.values().cloned().collect()
    }

    fn update_calendar(&mut self, id: &str, patch: CalendarPatch) -> Result<Calendar, StoreError> {
        let calendar = self
            .calendars
            .get_mut(id)
            .ok_or_else(|| StoreError::CalendarNotFound(id.to_string()))?;
        patch.apply(calendar);
        Ok(calendar.clone())
    }
}
