mod aggregate;
mod challenges;
mod engagement;
mod error;
mod expand;
mod grid;
mod itinerary;
mod month;
mod occurrence;
mod structs;

#[cfg(feature = "ics")]
mod ics;

pub use aggregate::{bucket_by_day, venues_open_by_month, venues_open_on_day, DayBuckets};
pub use challenges::{ClaimedChallenges, KeyValueStore, MemoryStore, CLAIMED_CHALLENGES_KEY};
pub use engagement::Engagement;
pub use error::CalendarError;
pub use expand::{expand_month, expand_occurrences, sort_by_date, Occurrences};
pub use grid::{DayCell, DayView, MonthGrid};
pub use itinerary::{
    Catalog, EntityKind, Itinerary, ItineraryError, ItineraryItem, ResolvedItem, Selection,
    ITEM_NOT_FOUND, UNKNOWN_ITEM,
};
pub use month::MonthWindow;
pub use occurrence::{base_id_of, EventId, OccurrenceId};
pub use structs::{filter_visible, Event, EventKind, Experience, Feed, Frequency, RecurrenceRule, Venue};
