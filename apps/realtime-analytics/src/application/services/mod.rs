//! Application Services
//!
//! - `UpsertExecutor`: applies mutations to the record store and classifies
//!   failures

mod upsert_executor;

pub use upsert_executor::{UpsertExecutor, UpsertOutcome};
