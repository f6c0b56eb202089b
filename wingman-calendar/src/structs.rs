use chrono::{NaiveDate, Weekday};
use log::debug;
use serde::{Deserialize, Deserializer, Serialize};

use crate::occurrence::EventId;

fn default_feed_name() -> String {
    "WINGMAN".to_string()
}

/// Dates that fail to parse become `None` instead of failing the whole feed.
fn deserialize_lenient_date<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;

    Ok(raw.and_then(|raw| match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(err) => {
            debug!("Ignoring malformed date {raw:?}: {err}");
            None
        }
    }))
}

/// Unknown weekday names are dropped, so they never match a day.
fn deserialize_lenient_weekdays<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<Weekday>, D::Error> {
    let raw = Vec::<String>::deserialize(deserializer)?;

    Ok(raw
        .into_iter()
        .filter_map(|name| match name.trim().parse::<Weekday>() {
            Ok(weekday) => Some(weekday),
            Err(_) => {
                debug!("Ignoring unknown weekday {name:?}");
                None
            }
        })
        .collect())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feed {
    #[serde(default = "default_feed_name")]
    pub name: String,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub venues: Vec<Venue>,
    #[serde(default)]
    pub experiences: Vec<Experience>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: EventKind,
    #[serde(default, deserialize_with = "deserialize_lenient_date")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecurrenceRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_levels: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue_id: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    #[default]
    General,
    InviteOnly,
    /// Any tag this crate does not know about.
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceRule {
    pub frequency: Frequency,
    #[serde(default, deserialize_with = "deserialize_lenient_date")]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Venue {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, deserialize_with = "deserialize_lenient_weekdays")]
    pub open_days: Vec<Weekday>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub id: u32,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue_id: Option<u32>,
}

impl Event {
    /// Events without an access list are public. Otherwise `level` has to
    /// be listed, compared case-insensitively.
    pub fn is_visible_to(&self, level: Option<&str>) -> bool {
        let Some(levels) = &self.access_levels else {
            return true;
        };

        level.is_some_and(|level| {
            levels
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(level))
        })
    }

    pub fn venue<'a>(&self, venues: &'a [Venue]) -> Option<&'a Venue> {
        let id = self.venue_id?;
        venues.iter().find(|venue| venue.id == id)
    }
}

impl Venue {
    pub fn is_open_on(&self, weekday: Weekday) -> bool {
        self.open_days.contains(&weekday)
    }
}

pub fn filter_visible<'a, I>(events: I, level: Option<&str>) -> Vec<Event>
where
    I: IntoIterator<Item = &'a Event>,
{
    events
        .into_iter()
        .filter(|event| event.is_visible_to(level))
        .cloned()
        .collect()
}
