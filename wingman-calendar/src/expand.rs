use chrono::{Days, Months, NaiveDate};
use log::debug;

use crate::{Event, Frequency, MonthWindow, OccurrenceId, RecurrenceRule};

/// Dates of a recurrence, from the start date up to an inclusive limit.
///
/// Each date is one step after the previous one. A monthly rule starting on
/// the 31st is clamped to the 28th in February and stays on the 28th from
/// then on.
#[derive(Debug, Clone)]
pub struct Occurrences {
    current: Option<NaiveDate>,
    frequency: Frequency,
    until: Option<NaiveDate>,
}

impl Iterator for Occurrences {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        let until = self.until?;
        let date = self.current?;

        if date > until {
            self.current = None;
            return None;
        }

        self.current = self.frequency.step(date);
        Some(date)
    }
}

impl Frequency {
    /// The date one step after `date`. Months are clamped to their last day.
    pub fn step(self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Frequency::Daily => date.checked_add_days(Days::new(1)),
            Frequency::Weekly => date.checked_add_days(Days::new(7)),
            Frequency::Monthly => date.checked_add_months(Months::new(1)),
        }
    }
}

impl RecurrenceRule {
    /// Occurrence dates starting at `start`, ending at the rule's end date or
    /// `limit`, whichever comes first. A missing end date yields nothing.
    pub fn occurrences(&self, start: NaiveDate, limit: NaiveDate) -> Occurrences {
        Occurrences {
            current: Some(start),
            frequency: self.frequency,
            until: self.end_date.map(|end| end.min(limit)),
        }
    }
}

impl Event {
    /// A copy of this event placed on `date`, addressed by its occurrence id.
    pub fn occurrence_on(&self, date: NaiveDate) -> Event {
        Event {
            id: OccurrenceId::new(self.id.base_id(), date).into(),
            date: Some(date),
            ..self.clone()
        }
    }
}

/// Concrete occurrences of `events` inside `[window_start, window_end]`.
///
/// Output follows input order, each recurring event contributing its dates
/// in chronological order. Events without a usable date are skipped.
pub fn expand_occurrences(
    events: &[Event],
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> Vec<Event> {
    let mut occurrences = Vec::new();

    for event in events {
        let Some(date) = event.date else {
            debug!("Skipping event {} without a valid date", event.id);
            continue;
        };

        let Some(rule) = &event.recurrence else {
            if window_start <= date && date <= window_end {
                occurrences.push(event.clone());
            }
            continue;
        };

        if rule.end_date.is_none() {
            debug!("Skipping recurring event {} without a valid end date", event.id);
            continue;
        }

        occurrences.extend(
            rule.occurrences(date, window_end)
                .filter(|date| *date >= window_start)
                .map(|date| event.occurrence_on(date)),
        );
    }

    occurrences
}

pub fn expand_month(events: &[Event], window: MonthWindow) -> Vec<Event> {
    expand_occurrences(events, window.first_day(), window.last_day())
}

/// Stable chronological sort. Dateless events go first.
pub fn sort_by_date(events: &mut [Event]) {
    events.sort_by_key(|event| event.date);
}
