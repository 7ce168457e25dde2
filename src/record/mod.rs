pub mod search;
pub mod store;
pub mod tags;
pub mod types;

pub use store::{MemoryRecordStore, RecordStore};
pub use types::{ExtractedProfile, KnownFields, Record, RecordFields, TagCategory};
