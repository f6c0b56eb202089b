use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::{Event, MonthWindow, Venue};

/// Occurrences of one (year, month) grouped by day of month.
///
/// Days without events have no entry. Buckets belong to their month and
/// have to be rebuilt when the visible month changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayBuckets<'a> {
    year: i32,
    month: u32,
    days: BTreeMap<u32, Vec<&'a Event>>,
}

impl<'a> DayBuckets<'a> {
    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn get(&self, day: u32) -> &[&'a Event] {
        self.days.get(&day).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn contains_day(&self, day: u32) -> bool {
        self.days.contains_key(&day)
    }

    pub fn days(&self) -> impl Iterator<Item = (u32, &[&'a Event])> + '_ {
        self.days.iter().map(|(day, events)| (*day, events.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

pub fn bucket_by_day(occurrences: &[Event], year: i32, month: u32) -> DayBuckets<'_> {
    let mut days = BTreeMap::<u32, Vec<&Event>>::new();

    for event in occurrences {
        let Some(date) = event.date else {
            continue;
        };

        if date.year() == year && date.month() == month {
            days.entry(date.day()).or_default().push(event);
        }
    }

    DayBuckets { year, month, days }
}

pub fn venues_open_on_day(venues: &[Venue], year: i32, month: u32, day: u32) -> Vec<&Venue> {
    let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
        return Vec::new();
    };

    let weekday = date.weekday();
    venues
        .iter()
        .filter(|venue| venue.is_open_on(weekday))
        .collect()
}

pub fn venues_open_by_month(venues: &[Venue], year: i32, month: u32) -> BTreeSet<u32> {
    let Ok(window) = MonthWindow::new(year, month) else {
        return BTreeSet::new();
    };

    (1..=window.days_in_month())
        .filter(|day| !venues_open_on_day(venues, year, month, *day).is_empty())
        .collect()
}
