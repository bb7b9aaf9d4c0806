//! Domain model for the image collection

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The storage tier a record was served from.
///
/// Tier-sensitive operations (delete, most visibly) dispatch on this tag
/// rather than inspecting id strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Origin {
    /// Persisted in the remote row store
    Remote,
    /// Held in the process-lifetime fallback cache
    Fallback,
    /// Static demo content, never truly deleted
    Demo,
}

/// A single generated image belonging to one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: String,
    pub url: String,
    pub prompt: String,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub origin: Origin,
}

/// Sort direction for date-ordered views of the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Newest first
    Recent,
    /// Oldest first
    Oldest,
}

/// Sort records by creation time. Pure; ordering is never stored.
pub fn sort_by_created(records: &mut [ImageRecord], order: SortOrder) {
    match order {
        SortOrder::Recent => records.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortOrder::Oldest => records.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(id: &str, ts: DateTime<Utc>) -> ImageRecord {
        ImageRecord {
            id: id.to_string(),
            url: format!("https://example.com/{}.jpg", id),
            prompt: "test".to_string(),
            owner_id: "u1".to_string(),
            created_at: ts,
            origin: Origin::Remote,
        }
    }

    #[test]
    fn recent_view_is_newest_first() {
        let t1 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let t3 = Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap();
        let mut records = vec![record("a", t2), record("b", t1), record("c", t3)];

        sort_by_created(&mut records, SortOrder::Recent);
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);

        sort_by_created(&mut records, SortOrder::Oldest);
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }
}
