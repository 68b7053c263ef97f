//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for run storage; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated
//! via `mockall` for service tests.

pub mod run_repository;

pub use run_repository::RunRepository;

#[cfg(test)]
pub use run_repository::MockRunRepository;
