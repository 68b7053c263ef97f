//! Services for the application layer.

pub mod pipeline_service;
pub mod query_service;

pub use pipeline_service::{PipelineService, PreparedAnalysis, QualityReport};
pub use query_service::{ExceedingCities, QueryService, RunMetric};
