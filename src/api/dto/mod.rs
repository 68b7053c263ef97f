//! Data Transfer Objects for API requests and responses.
//!
//! Query parameters are deserialized with Serde and checked with `validator`.
//! Response types own the JSON field names of the public API; domain types
//! are converted into them at the handler boundary.

pub mod city;
pub mod health;
pub mod index;
pub mod metrics;
pub mod pagination;
pub mod region;
pub mod runs;

/// Rounds an average to two decimals for display.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
