//! PostgreSQL persistence via SeaORM.

mod connections;
mod postgres_base;
mod postgres_repo;

pub mod entity;

pub use connections::{DatabaseConfig, connect};
pub use postgres_base::{DomainEntity, PostgresBaseRepository};
pub use postgres_repo::{
    PostgresPostRepository, PostgresRatingRepository, PostgresUserRepository,
};
