//! Infrastructure layer for external integrations.
//!
//! # Modules
//!
//! - [`csv_source`] - CSV input reader
//! - [`persistence`] - Run repository implementations (PostgreSQL and in-memory)

pub mod csv_source;
pub mod persistence;
