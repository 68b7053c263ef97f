//! Application layer services.
//!
//! Services coordinate the domain rules with a [`crate::domain::repositories::RunRepository`]
//! and give the HTTP handlers and the admin CLI a single entry point.
//!
//! # Available Services
//!
//! - [`services::pipeline_service::PipelineService`] - Load, clean, aggregate and store a run
//! - [`services::query_service::QueryService`] - Read-only queries over stored runs

pub mod services;
