//! # Quill Infrastructure
//!
//! Concrete implementations of the repository ports defined in `quill-core`.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL repositories via SeaORM
//! - without it, only the in-memory store is available

#[cfg(feature = "postgres")]
pub mod database;
pub mod memory;

pub use memory::InMemoryStore;

#[cfg(feature = "postgres")]
pub use database::{
    DatabaseConfig, PostgresPostRepository, PostgresRatingRepository, PostgresUserRepository,
};
