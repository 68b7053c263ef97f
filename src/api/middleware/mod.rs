//! HTTP middleware.
//!
//! The API is read-only and public, so request tracing is the only layer.

pub mod tracing;
