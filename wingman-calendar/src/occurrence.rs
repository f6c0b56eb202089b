use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::CalendarError;

/// Identity of one occurrence of a recurring event.
///
/// Rendered as `{base_id}-{YYYY-MM-DD}`. Base ids are unsigned, so the first
/// hyphen always ends the base id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OccurrenceId {
    pub base_id: u32,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventId {
    Base(u32),
    Occurrence(OccurrenceId),
}

/// Recovers the base id from a plain (`"7"`) or composite
/// (`"7-2025-03-08"`) identifier.
pub fn base_id_of(raw: &str) -> Option<u32> {
    raw.split('-').next()?.trim().parse().ok()
}

impl OccurrenceId {
    pub fn new(base_id: u32, date: NaiveDate) -> Self {
        Self { base_id, date }
    }
}

impl EventId {
    pub fn base_id(&self) -> u32 {
        match self {
            EventId::Base(id) => *id,
            EventId::Occurrence(occurrence) => occurrence.base_id,
        }
    }

    pub fn occurrence_date(&self) -> Option<NaiveDate> {
        match self {
            EventId::Base(_) => None,
            EventId::Occurrence(occurrence) => Some(occurrence.date),
        }
    }
}

impl fmt::Display for OccurrenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.base_id, self.date.format("%Y-%m-%d"))
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventId::Base(id) => write!(f, "{id}"),
            EventId::Occurrence(occurrence) => occurrence.fmt(f),
        }
    }
}

impl FromStr for OccurrenceId {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CalendarError::InvalidOccurrenceId(s.to_string());

        let (base_id, date) = s.split_once('-').ok_or_else(invalid)?;
        let base_id = base_id.parse::<u32>().map_err(|_| invalid())?;
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| invalid())?;

        Ok(Self { base_id, date })
    }
}

impl FromStr for EventId {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<u32>() {
            Ok(id) => Ok(EventId::Base(id)),
            Err(_) => s.parse().map(EventId::Occurrence),
        }
    }
}

impl From<u32> for EventId {
    fn from(id: u32) -> Self {
        EventId::Base(id)
    }
}

impl From<OccurrenceId> for EventId {
    fn from(occurrence: OccurrenceId) -> Self {
        EventId::Occurrence(occurrence)
    }
}

impl Serialize for OccurrenceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for OccurrenceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer)?
            .parse()
            .map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn composite_ids_round_trip_through_text() {
        let id = OccurrenceId::new(42, date(2025, 3, 8));
        assert_eq!(id.to_string(), "42-2025-03-08");
        assert_eq!("42-2025-03-08".parse::<OccurrenceId>(), Ok(id));
        assert_eq!(base_id_of(&id.to_string()), Some(42));
    }

    #[test]
    fn base_id_of_accepts_plain_ids() {
        assert_eq!(base_id_of("17"), Some(17));
        assert_eq!(base_id_of("abc-2025-01-01"), None);
        assert_eq!(base_id_of(""), None);
    }

    #[test]
    fn rejects_malformed_occurrence_ids() {
        for raw in ["42", "42-2025-02-30", "-2025-03-08", "x-2025-03-08"] {
            assert_eq!(
                raw.parse::<OccurrenceId>(),
                Err(CalendarError::InvalidOccurrenceId(raw.to_string()))
            );
        }
    }

    #[test]
    fn event_ids_deserialize_from_numbers_and_strings() {
        let ids: Vec<EventId> = serde_json::from_str(r#"[3, "3-2025-03-15"]"#).unwrap();
        assert_eq!(ids[0], EventId::Base(3));
        assert_eq!(ids[1], EventId::Occurrence(OccurrenceId::new(3, date(2025, 3, 15))));
        assert!(ids.iter().all(|id| id.base_id() == 3));

        assert_eq!(
            serde_json::to_string(&ids).unwrap(),
            r#"[3,"3-2025-03-15"]"#
        );
    }
}
