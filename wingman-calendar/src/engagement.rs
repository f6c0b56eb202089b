use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::EventId;

/// RSVP, like and bookmark state. Keyed by base event id so that every
/// occurrence of a recurring event shares it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Engagement {
    #[serde(default)]
    rsvps: BTreeSet<u32>,
    #[serde(default)]
    likes: BTreeSet<u32>,
    #[serde(default)]
    bookmarks: BTreeSet<u32>,
}

fn toggle(set: &mut BTreeSet<u32>, id: &EventId) -> bool {
    let id = id.base_id();
    if !set.remove(&id) {
        set.insert(id);
        return true;
    }
    false
}

impl Engagement {
    /// Returns whether the event is RSVP'd afterwards.
    pub fn toggle_rsvp(&mut self, id: &EventId) -> bool {
        toggle(&mut self.rsvps, id)
    }

    pub fn toggle_like(&mut self, id: &EventId) -> bool {
        toggle(&mut self.likes, id)
    }

    pub fn toggle_bookmark(&mut self, id: &EventId) -> bool {
        toggle(&mut self.bookmarks, id)
    }

    pub fn is_rsvped(&self, id: &EventId) -> bool {
        self.rsvps.contains(&id.base_id())
    }

    pub fn is_liked(&self, id: &EventId) -> bool {
        self.likes.contains(&id.base_id())
    }

    pub fn is_bookmarked(&self, id: &EventId) -> bool {
        self.bookmarks.contains(&id.base_id())
    }

    pub fn bookmarks(&self) -> impl Iterator<Item = u32> + '_ {
        self.bookmarks.iter().copied()
    }
}
