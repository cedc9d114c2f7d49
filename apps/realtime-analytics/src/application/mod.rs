//! Application Layer - Use cases and port definitions.
//!
//! This layer drives the domain transformations against the record store
//! through port interfaces.

/// Port interfaces for external systems (record store).
pub mod ports;

/// Application services shared by use cases.
pub mod services;

/// Ingestion and query use cases.
pub mod use_cases;
