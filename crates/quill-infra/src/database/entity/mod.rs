//! SeaORM entities mirroring the `users`, `posts` and `ratings` tables.

pub mod post;
pub mod rating;
pub mod user;
