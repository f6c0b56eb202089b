use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::{venues_open_on_day, CalendarError, DayBuckets, Event, EventKind, MonthWindow, Venue};

/// Layout of a Sunday-first, seven column month grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub leading_blanks: u32,
    pub cells: Vec<DayCell>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCell {
    pub day: u32,
    pub has_general: bool,
    pub has_invite_only: bool,
    /// Events whose type tag is not recognised.
    pub has_other: bool,
    pub has_open_venue: bool,
}

/// Everything shown for a selected day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayView<'a> {
    pub date: NaiveDate,
    pub events: Vec<&'a Event>,
    pub venues: Vec<&'a Venue>,
}

impl MonthGrid {
    pub fn build(
        window: MonthWindow,
        buckets: &DayBuckets<'_>,
        open_days: &BTreeSet<u32>,
    ) -> MonthGrid {
        debug_assert_eq!((buckets.year(), buckets.month()), (window.year(), window.month()));

        let cells = (1..=window.days_in_month())
            .map(|day| {
                let mut cell = DayCell {
                    day,
                    has_open_venue: open_days.contains(&day),
                    ..DayCell::default()
                };
                for event in buckets.get(day) {
                    match event.kind {
                        EventKind::General => cell.has_general = true,
                        EventKind::InviteOnly => cell.has_invite_only = true,
                        EventKind::Other => cell.has_other = true,
                    }
                }
                cell
            })
            .collect();

        MonthGrid {
            year: window.year(),
            month: window.month(),
            leading_blanks: window.first_day().weekday().num_days_from_sunday(),
            cells,
        }
    }

    /// Number of week rows needed to render the grid.
    pub fn weeks(&self) -> usize {
        (self.leading_blanks as usize + self.cells.len()).div_ceil(7)
    }
}

impl<'a> DayView<'a> {
    pub fn select(
        buckets: &DayBuckets<'a>,
        venues: &'a [Venue],
        day: u32,
    ) -> Result<DayView<'a>, CalendarError> {
        let (year, month) = (buckets.year(), buckets.month());
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or(CalendarError::InvalidDay { year, month, day })?;

        Ok(DayView {
            date,
            events: buckets.get(day).to_vec(),
            venues: venues_open_on_day(venues, year, month, day),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Weekday;

    use super::*;
    use crate::{bucket_by_day, venues_open_by_month, EventId};

    fn event(id: u32, day: u32, kind: EventKind) -> Event {
        Event {
            id: EventId::Base(id),
            title: format!("Event {id}"),
            description: None,
            kind,
            date: NaiveDate::from_ymd_opt(2025, 3, day),
            recurrence: None,
            access_levels: None,
            venue_id: None,
        }
    }

    #[test]
    fn lays_out_march_2025() {
        let events = [
            event(1, 7, EventKind::General),
            event(2, 7, EventKind::InviteOnly),
            event(3, 20, EventKind::InviteOnly),
        ];
        let venues = [Venue {
            id: 1,
            name: "Neon".to_string(),
            location: "Downtown".to_string(),
            open_days: vec![Weekday::Sat],
        }];

        let window = MonthWindow::new(2025, 3).unwrap();
        let buckets = bucket_by_day(&events, 2025, 3);
        let open = venues_open_by_month(&venues, 2025, 3);
        let grid = MonthGrid::build(window, &buckets, &open);

        // March 1st 2025 is a Saturday.
        assert_eq!(grid.leading_blanks, 6);
        assert_eq!(grid.cells.len(), 31);
        assert_eq!(grid.weeks(), 6);

        let seventh = grid.cells[6];
        assert!(seventh.has_general && seventh.has_invite_only && !seventh.has_open_venue);

        let twentieth = grid.cells[19];
        assert!(!twentieth.has_general && twentieth.has_invite_only);

        assert!(grid.cells[0].has_open_venue);
        assert!(!grid.cells[1].has_general);
    }

    #[test]
    fn unknown_kinds_get_their_own_flag() {
        let events = [event(1, 4, EventKind::Other), event(2, 5, EventKind::General)];
        let window = MonthWindow::new(2025, 3).unwrap();
        let buckets = bucket_by_day(&events, 2025, 3);
        let grid = MonthGrid::build(window, &buckets, &BTreeSet::new());

        let fourth = grid.cells[3];
        assert!(fourth.has_other);
        assert!(!fourth.has_general && !fourth.has_invite_only);
        assert!(!grid.cells[4].has_other);
    }

    #[test]
    fn serializes_camel_case_keys() {
        let events = [event(1, 1, EventKind::InviteOnly)];
        let window = MonthWindow::new(2025, 3).unwrap();
        let buckets = bucket_by_day(&events, 2025, 3);
        let grid = MonthGrid::build(window, &buckets, &BTreeSet::from([1]));

        let json = serde_json::to_value(&grid).unwrap();
        assert_eq!(json["leadingBlanks"], 6);
        assert_eq!(json["cells"][0]["hasInviteOnly"], true);
        assert_eq!(json["cells"][0]["hasOpenVenue"], true);
        assert_eq!(json["cells"][0]["hasOther"], false);
    }

    #[test]
    fn selects_a_day() {
        let events = [event(1, 8, EventKind::General)];
        let venues = [Venue {
            id: 4,
            name: "Velvet".to_string(),
            location: String::new(),
            open_days: vec![Weekday::Sat],
        }];
        let buckets = bucket_by_day(&events, 2025, 3);

        let view = DayView::select(&buckets, &venues, 8).unwrap();
        assert_eq!(view.events.len(), 1);
        assert_eq!(view.venues.len(), 1);

        let empty = DayView::select(&buckets, &venues, 9).unwrap();
        assert!(empty.events.is_empty() && empty.venues.is_empty());

        assert_eq!(
            DayView::select(&buckets, &venues, 32),
            Err(CalendarError::InvalidDay {
                year: 2025,
                month: 3,
                day: 32
            })
        );
    }
}
