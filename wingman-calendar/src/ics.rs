use ics::{
    components::Parameter,
    escape_text,
    properties::{Categories, Description, DtEnd, DtStart, Location, Summary},
    ICalendar,
};

use crate::{Event, EventKind, Feed, Venue};

impl Feed {
    /// Renders already expanded occurrences as all-day events.
    #[must_use]
    pub fn to_ics<'a>(&'a self, occurrences: &'a [Event]) -> ICalendar<'a> {
        let mut icalendar = ICalendar::new("2.0", &self.name);

        for event in occurrences {
            if let Some(ics_event) = event.to_ics(&self.venues) {
                icalendar.add_event(ics_event);
            }
        }

        icalendar
    }
}

impl Event {
    /// `None` for events without a date.
    #[must_use]
    pub fn to_ics<'a>(&'a self, venues: &[Venue]) -> Option<ics::Event<'a>> {
        let date = self.date?;
        let start = date.format("%Y%m%d").to_string();
        let end = date.succ_opt()?.format("%Y%m%d").to_string();

        let mut ics_event = ics::Event::new(self.id.to_string(), format!("{start}T000000"));

        let mut dtstart = DtStart::new(start);
        dtstart.add(Parameter::new("VALUE", "DATE"));
        ics_event.push(dtstart);

        let mut dtend = DtEnd::new(end);
        dtend.add(Parameter::new("VALUE", "DATE"));
        ics_event.push(dtend);

        ics_event.push(Summary::new(escape_text(self.title.as_str())));

        if let Some(description) = &self.description {
            ics_event.push(Description::new(escape_text(description.as_str())));
        }

        if let Some(venue) = self.venue(venues) {
            let location = if venue.location.is_empty() {
                venue.name.clone()
            } else {
                format!("{}, {}", venue.name, venue.location)
            };
            ics_event.push(Location::new(escape_text(location)));
        }

        match self.kind {
            EventKind::InviteOnly => ics_event.push(Categories::new("INVITE-ONLY")),
            EventKind::General | EventKind::Other => {}
        }

        Some(ics_event)
    }
}
