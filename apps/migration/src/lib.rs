//! Schema migrations for the Quill database.

pub use sea_orm_migration::prelude::*;

mod m20250927_000001_create_tables;
mod m20250927_000002_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250927_000001_create_tables::Migration),
            Box::new(m20250927_000002_add_indexes::Migration),
        ]
    }
}
