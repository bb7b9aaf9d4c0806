//! Process-lifetime in-memory tier.
//!
//! Absorbs writes when the remote store is unreachable or unprovisioned so
//! the gallery stays usable within the session. Not a cache of remote data:
//! nothing here is ever reconciled back to the remote tier, and the whole
//! thing evaporates with the process.
//!
//! Constructed by the host and injected into the collection manager; clones
//! share the same backing store, while independent instances (as tests
//! build) are fully isolated.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use uuid::Uuid;

use crate::model::{ImageRecord, Origin};

/// In-memory fallback store for image records
#[derive(Clone, Default)]
pub struct FallbackCache {
    records: Arc<Mutex<Vec<ImageRecord>>>,
}

impl FallbackCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a record; always succeeds. Newest entries sit at the front.
    pub fn create(&self, owner_id: &str, url: &str, prompt: &str) -> ImageRecord {
        let record = ImageRecord {
            id: format!("local-{}", Uuid::new_v4()),
            url: url.to_string(),
            prompt: prompt.to_string(),
            owner_id: owner_id.to_string(),
            created_at: Utc::now(),
            origin: Origin::Fallback,
        };

        let mut records = self.records.lock().unwrap();
        records.insert(0, record.clone());
        record
    }

    /// All records belonging to the owner, newest first
    pub fn list(&self, owner_id: &str) -> Vec<ImageRecord> {
        let records = self.records.lock().unwrap();
        records
            .iter()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect()
    }

    /// Remove the record matching both id and owner; reports whether
    /// anything was removed
    pub fn delete(&self, id: &str, owner_id: &str) -> bool {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| !(r.id == id && r.owner_id == owner_id));
        records.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_prepends_and_tags_origin() {
        let cache = FallbackCache::new();
        cache.create("u1", "https://example.com/1.jpg", "first");
        let second = cache.create("u1", "https://example.com/2.jpg", "second");

        let listed = cache.list("u1");
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0], second);
        assert_eq!(listed[0].origin, Origin::Fallback);
        assert!(listed[0].id.starts_with("local-"));
    }

    #[test]
    fn list_is_owner_scoped() {
        let cache = FallbackCache::new();
        cache.create("u1", "https://example.com/a.jpg", "mine");
        cache.create("u2", "https://example.com/b.jpg", "theirs");

        let listed = cache.list("u1");
        assert_eq!(listed.len(), 1);
        assert!(listed.iter().all(|r| r.owner_id == "u1"));
    }

    #[test]
    fn delete_requires_matching_owner() {
        let cache = FallbackCache::new();
        let record = cache.create("u1", "https://example.com/a.jpg", "mine");

        assert!(!cache.delete(&record.id, "u2"));
        assert_eq!(cache.list("u1").len(), 1);

        assert!(cache.delete(&record.id, "u1"));
        assert!(cache.list("u1").is_empty());

        // second delete is a no-op
        assert!(!cache.delete(&record.id, "u1"));
    }

    #[test]
    fn clones_share_the_backing_store() {
        let cache = FallbackCache::new();
        let clone = cache.clone();
        cache.create("u1", "https://example.com/a.jpg", "shared");
        assert_eq!(clone.list("u1").len(), 1);
    }
}
