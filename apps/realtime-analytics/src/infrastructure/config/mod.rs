//! Configuration Module
//!
//! Configuration loading for the analytics service.

mod settings;

pub use settings::{AnalyticsConfig, ConfigError, ServerSettings};
