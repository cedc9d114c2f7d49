//! Persistence Adapters
//!
//! Record store implementations of `RecordStorePort`.

pub mod in_memory;

pub use in_memory::InMemoryRecordStore;
