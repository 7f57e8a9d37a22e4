//! In-memory repositories - fallback when PostgreSQL is not configured.

mod store;

pub use store::InMemoryStore;

#[cfg(test)]
mod tests;
