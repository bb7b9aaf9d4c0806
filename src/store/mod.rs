//! Storage tiers consulted in fixed fallback order: remote row store,
//! then the in-memory fallback cache, then static demo content.

mod demo;
mod fallback;
mod remote;

pub use demo::{demo_records, DEMO_OWNER};
pub use fallback::FallbackCache;
pub use remote::{RemoteStore, IMAGES_SCHEMA_SQL};
