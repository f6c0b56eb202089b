use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Event, EventId, Experience, Feed, Venue};

pub const UNKNOWN_ITEM: &str = "Unknown Item";
pub const ITEM_NOT_FOUND: &str = "Item not found";

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItineraryError {
    #[error("Index {index} is out of range for an itinerary of {len} items")]
    OutOfRange { index: usize, len: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ItineraryItem {
    Venue { id: u32 },
    Event { id: EventId },
    Experience { id: u32 },
    Note { title: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Venue,
    Event,
    Experience,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedItem {
    pub name: String,
    pub subtitle: Option<String>,
}

/// Reference collections itinerary items are resolved against.
#[derive(Debug, Clone, Copy)]
pub struct Catalog<'a> {
    pub venues: &'a [Venue],
    pub events: &'a [Event],
    pub experiences: &'a [Experience],
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Itinerary {
    items: Vec<ItineraryItem>,
}

/// Entities picked in multi-select mode, in the order they were picked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    picked: Vec<(EntityKind, u32)>,
}

impl ItineraryItem {
    /// The referenced entity, `None` for notes. Events are referenced by
    /// their base id.
    pub fn entity(&self) -> Option<(EntityKind, u32)> {
        match self {
            ItineraryItem::Venue { id } => Some((EntityKind::Venue, *id)),
            ItineraryItem::Event { id } => Some((EntityKind::Event, id.base_id())),
            ItineraryItem::Experience { id } => Some((EntityKind::Experience, *id)),
            ItineraryItem::Note { .. } => None,
        }
    }

    fn for_entity(kind: EntityKind, id: u32) -> ItineraryItem {
        match kind {
            EntityKind::Venue => ItineraryItem::Venue { id },
            EntityKind::Event => ItineraryItem::Event { id: id.into() },
            EntityKind::Experience => ItineraryItem::Experience { id },
        }
    }
}

impl<'a> Catalog<'a> {
    pub fn from_feed(feed: &'a Feed) -> Self {
        Self {
            venues: &feed.venues,
            events: &feed.events,
            experiences: &feed.experiences,
        }
    }

    pub fn resolve(&self, item: &ItineraryItem) -> ResolvedItem {
        let resolved = match item {
            ItineraryItem::Venue { id } => self
                .venues
                .iter()
                .find(|venue| venue.id == *id)
                .map(|venue| (venue.name.clone(), Some(venue.location.clone()))),
            ItineraryItem::Event { id } => self
                .events
                .iter()
                .find(|event| event.id.base_id() == id.base_id())
                .map(|event| {
                    let date = id.occurrence_date().or(event.date);
                    (event.title.clone(), date.map(|date| date.to_string()))
                }),
            ItineraryItem::Experience { id } => self
                .experiences
                .iter()
                .find(|experience| experience.id == *id)
                .map(|experience| {
                    let venue = experience
                        .venue_id
                        .and_then(|id| self.venues.iter().find(|venue| venue.id == id));
                    (experience.title.clone(), venue.map(|venue| venue.name.clone()))
                }),
            ItineraryItem::Note { title } => Some((title.clone(), None)),
        };

        match resolved {
            Some((name, subtitle)) => ResolvedItem { name, subtitle },
            None => ResolvedItem {
                name: UNKNOWN_ITEM.to_string(),
                subtitle: Some(ITEM_NOT_FOUND.to_string()),
            },
        }
    }
}

impl Itinerary {
    pub fn new(items: Vec<ItineraryItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[ItineraryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, item: ItineraryItem) {
        self.items.push(item);
    }

    pub fn remove(&mut self, index: usize) -> Result<ItineraryItem, ItineraryError> {
        self.check(index)?;
        Ok(self.items.remove(index))
    }

    /// Drag and drop: take the item at `from` and drop it at `to`.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<(), ItineraryError> {
        self.check(from)?;
        self.check(to)?;

        let item = self.items.remove(from);
        self.items.insert(to, item);
        Ok(())
    }

    pub fn contains_entity(&self, kind: EntityKind, id: u32) -> bool {
        self.items
            .iter()
            .any(|item| item.entity() == Some((kind, id)))
    }

    /// Appends every picked entity not already planned, then clears the
    /// selection. Returns how many items were added.
    pub fn add_selection(&mut self, selection: &mut Selection) -> usize {
        let before = self.items.len();

        for (kind, id) in selection.picked.drain(..) {
            if !self.contains_entity(kind, id) {
                self.items.push(ItineraryItem::for_entity(kind, id));
            }
        }

        self.items.len() - before
    }

    fn check(&self, index: usize) -> Result<(), ItineraryError> {
        if index < self.items.len() {
            Ok(())
        } else {
            Err(ItineraryError::OutOfRange {
                index,
                len: self.items.len(),
            })
        }
    }
}

impl Selection {
    /// Picks the entity, or unpicks it if it was already picked. Returns
    /// whether it is picked afterwards.
    pub fn toggle(&mut self, kind: EntityKind, id: u32) -> bool {
        match self.picked.iter().position(|picked| *picked == (kind, id)) {
            Some(position) => {
                self.picked.remove(position);
                false
            }
            None => {
                self.picked.push((kind, id));
                true
            }
        }
    }

    pub fn is_selected(&self, kind: EntityKind, id: u32) -> bool {
        self.picked.contains(&(kind, id))
    }

    pub fn len(&self) -> usize {
        self.picked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.picked.is_empty()
    }

    pub fn clear(&mut self) {
        self.picked.clear();
    }
}
