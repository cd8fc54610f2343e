use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracelane_protocol::{EventCategory, EventLocation, IdentityKey, RawEvent};

/// A deduplicated event kind shared by every occurrence with identical
/// name, details, location and category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventIdentity {
    pub display_name: String,
    pub details: String,
    pub location: EventLocation,
    pub category: EventCategory,
    /// Dense, 0-based, assigned in first-seen order.
    pub id: usize,
}

/// Insertion-ordered table of identities keyed by event content.
#[derive(Debug, Clone, Default)]
pub struct EventDictionary {
    identities: Vec<EventIdentity>,
    ids_by_key: HashMap<IdentityKey, usize>,
}

impl EventDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of the identity `event` belongs to, creating it on first sight.
    pub fn intern(&mut self, event: &RawEvent) -> usize {
        let key = event.identity_key();
        if let Some(&id) = self.ids_by_key.get(&key) {
            return id;
        }

        let id = self.identities.len();
        self.identities.push(EventIdentity {
            display_name: key.display_name.clone(),
            details: key.details.clone(),
            location: key.location.clone(),
            category: key.category,
            id,
        });
        self.ids_by_key.insert(key, id);
        id
    }

    /// Panics if `id` was not handed out by this dictionary.
    pub fn get(&self, id: usize) -> &EventIdentity {
        &self.identities[id]
    }

    pub fn identities(&self) -> &[EventIdentity] {
        &self.identities
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}
