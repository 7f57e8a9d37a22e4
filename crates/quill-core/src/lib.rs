//! # Quill Core
//!
//! The domain layer of the Quill posts service.
//! This crate contains the business rules (validation, find-or-create,
//! rating averages) and the ports infrastructure must implement.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::DomainError;
