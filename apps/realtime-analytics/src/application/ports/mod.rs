//! Port Interfaces
//!
//! Contracts for the external systems the pipeline depends on, following
//! the Hexagonal Architecture pattern. Infrastructure adapters implement
//! these.
//!
//! ## Driven Ports (Outbound)
//!
//! - `RecordStorePort`: keyed record store with per-key atomic partial
//!   updates, conditional writes and full scans

mod record_store_port;

pub use record_store_port::{RecordStorePort, StoreError, UpdateAck};
