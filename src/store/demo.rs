//! Static demo content, the last-resort tier.
//!
//! Three fixed records shown only when both real tiers are unusable, so a
//! first visit under total failure is not a blank screen. Immutable: a
//! delete on a demo id reports success without touching anything.

use chrono::{Duration, Utc};

use crate::model::{ImageRecord, Origin};

/// Sentinel owner carried by demo records; never matches a real user
pub const DEMO_OWNER: &str = "demo";

const DEMO_PROMPTS: [(&str, &str, &str); 3] = [
    (
        "demo-1",
        "A dreamy sunset over snow-capped mountains",
        "https://picsum.photos/seed/demo-sunset/1024/1024",
    ),
    (
        "demo-2",
        "A neon-lit city street on a rainy night",
        "https://picsum.photos/seed/demo-neon/1024/1024",
    ),
    (
        "demo-3",
        "A watercolor fox in an autumn forest",
        "https://picsum.photos/seed/demo-fox/1024/1024",
    ),
];

/// The fixed demo dataset.
///
/// Timestamps are synthetic past instants (one, two and three days ago) so
/// date-ordered views have something real to sort.
pub fn demo_records() -> Vec<ImageRecord> {
    let now = Utc::now();
    DEMO_PROMPTS
        .iter()
        .enumerate()
        .map(|(i, (id, prompt, url))| ImageRecord {
            id: id.to_string(),
            url: url.to_string(),
            prompt: prompt.to_string(),
            owner_id: DEMO_OWNER.to_string(),
            created_at: now - Duration::days(i as i64 + 1),
            origin: Origin::Demo,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{sort_by_created, SortOrder};

    #[test]
    fn three_stable_records_newest_first() {
        let records = demo_records();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.origin == Origin::Demo));
        assert!(records.iter().all(|r| r.owner_id == DEMO_OWNER));
        assert_eq!(records[0].id, "demo-1");

        // already newest-first by construction
        let mut sorted = records.clone();
        sort_by_created(&mut sorted, SortOrder::Recent);
        assert_eq!(sorted, records);
    }
}
