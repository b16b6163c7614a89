use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::Database;

/// Storage key the whole registry is serialized under.
const SUBSCRIPTIONS_KEY: &str = "subscriptions";

/// Repository-to-channels registry. Every operation round-trips through
/// storage: load, mutate in memory, persist. Two concurrent read-modify-write
/// sequences can lose one side's addition (last write wins); callers that
/// need stronger guarantees must serialize mutations externally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscriptions {
    repositories: BTreeMap<String, BTreeSet<String>>,
}

impl Subscriptions {
    /// Load the registry from storage. Missing or undeserializable data
    /// yields an empty registry rather than an error.
    pub fn load(db: &Database) -> Self {
        let blob = match db.kv_get(SUBSCRIPTIONS_KEY) {
            Ok(Some(blob)) => blob,
            Ok(None) => return Self::default(),
            Err(e) => {
                warn!("Failed to read subscriptions, starting empty: {}", e);
                return Self::default();
            }
        };

        serde_json::from_slice(&blob).unwrap_or_else(|e| {
            warn!("Corrupt subscriptions blob, starting empty: {}", e);
            Self::default()
        })
    }

    /// Subscribe a channel to a repository. Idempotent.
    pub fn add(&mut self, channel_id: &str, repository: &str) {
        self.repositories
            .entry(repository.to_string())
            .or_default()
            .insert(channel_id.to_string());
    }

    /// Channels subscribed to a repository, exact match on `owner/repo`.
    pub fn channels_for(&self, repository: &str) -> BTreeSet<String> {
        self.repositories.get(repository).cloned().unwrap_or_default()
    }

    /// Serialize the full registry and overwrite the storage key.
    pub fn persist(&self, db: &Database) -> Result<()> {
        let blob = serde_json::to_vec(self)?;
        db.kv_set(SUBSCRIPTIONS_KEY, &blob)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_is_idempotent_and_scoped_per_repo() {
        let mut subs = Subscriptions::default();
        subs.add("C1", "acme/widgets");
        subs.add("C1", "acme/widgets");
        subs.add("C2", "acme/widgets");
        subs.add("C3", "acme/gadgets");

        let channels = subs.channels_for("acme/widgets");
        assert_eq!(channels.len(), 2);
        assert!(channels.contains("C1"));
        assert!(channels.contains("C2"));

        assert_eq!(subs.channels_for("acme/gadgets").len(), 1);
    }

    #[test]
    fn lookup_is_exact_match_only() {
        let mut subs = Subscriptions::default();
        subs.add("C1", "acme/widgets");

        assert!(subs.channels_for("acme/Widgets").is_empty());
        assert!(subs.channels_for("widgets").is_empty());
        assert!(subs.channels_for("other/repo").is_empty());
    }

    #[test]
    fn persist_then_load_round_trips() {
        let db = Database::open_in_memory().unwrap();

        let mut subs = Subscriptions::load(&db);
        assert_eq!(subs, Subscriptions::default());

        subs.add("C1", "acme/widgets");
        subs.add("C2", "acme/widgets");
        subs.persist(&db).unwrap();

        let reloaded = Subscriptions::load(&db);
        assert_eq!(reloaded, subs);
    }

    #[test]
    fn empty_registry_round_trips() {
        let db = Database::open_in_memory().unwrap();
        let subs = Subscriptions::default();
        subs.persist(&db).unwrap();
        assert_eq!(Subscriptions::load(&db), subs);
    }

    #[test]
    fn corrupt_blob_loads_as_empty() {
        let db = Database::open_in_memory().unwrap();
        db.kv_set("subscriptions", b"not json at all").unwrap();
        assert_eq!(Subscriptions::load(&db), Subscriptions::default());
    }
}
