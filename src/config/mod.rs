//! Configuration module for merchant log searches
//!
//! This module provides the `SearchConfig` struct and its type-safe builder
//! for configuring server sessions with validation and sensible defaults.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod methods;
pub mod types;

// Re-exports for public API
pub use builder::{Complete, SearchConfigBuilder, WithServers};
pub use types::SearchConfig;
