use std::collections::HashMap;

use log::warn;

pub const CLAIMED_CHALLENGES_KEY: &str = "claimedChallengeIds";

/// String key-value storage, as offered by browser local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }
}

/// Reward challenges the user already claimed, in claim order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimedChallenges {
    ids: Vec<u32>,
}

impl ClaimedChallenges {
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let Some(raw) = store.get(CLAIMED_CHALLENGES_KEY) else {
            return Self::default();
        };

        match serde_json::from_str::<Vec<u32>>(&raw) {
            Ok(ids) => Self { ids },
            Err(err) => {
                warn!("Ignoring malformed `{CLAIMED_CHALLENGES_KEY}` value {raw:?}: {err}");
                Self::default()
            }
        }
    }

    /// Records the claim and writes the list back. Returns `false` if the
    /// challenge was already claimed.
    pub fn claim<S: KeyValueStore + ?Sized>(&mut self, id: u32, store: &mut S) -> bool {
        if self.is_claimed(id) {
            return false;
        }

        self.ids.push(id);
        match serde_json::to_string(&self.ids) {
            Ok(serialized) => store.set(CLAIMED_CHALLENGES_KEY, serialized),
            Err(err) => warn!("Failed to serialize claimed challenges: {err}"),
        }

        true
    }

    pub fn is_claimed(&self, id: u32) -> bool {
        self.ids.contains(&id)
    }

    pub fn ids(&self) -> &[u32] {
        &self.ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_are_written_back_as_json() {
        let mut store = MemoryStore::default();
        let mut claimed = ClaimedChallenges::load(&store);
        assert!(claimed.ids().is_empty());

        assert!(claimed.claim(4, &mut store));
        assert!(claimed.claim(2, &mut store));
        assert!(!claimed.claim(4, &mut store));

        assert_eq!(store.get(CLAIMED_CHALLENGES_KEY).as_deref(), Some("[4,2]"));
        assert_eq!(ClaimedChallenges::load(&store), claimed);
    }

    #[test]
    fn malformed_storage_starts_empty() {
        let mut store = MemoryStore::default();
        store.set(CLAIMED_CHALLENGES_KEY, "{not json".to_string());

        let claimed = ClaimedChallenges::load(&store);
        assert!(!claimed.is_claimed(4));
        assert!(claimed.ids().is_empty());
    }
}
