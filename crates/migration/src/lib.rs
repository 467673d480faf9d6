//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_member;
mod m20240101_000002_create_member_credentials;
mod m20240101_000003_create_post;
mod m20240101_000004_create_tag;
mod m20240101_000005_create_experience;
mod m20240101_000006_create_file;
mod m20240101_000007_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_member::Migration),
            Box::new(m20240101_000002_create_member_credentials::Migration),
            Box::new(m20240101_000003_create_post::Migration),
            Box::new(m20240101_000004_create_tag::Migration),
            Box::new(m20240101_000005_create_experience::Migration),
            Box::new(m20240101_000006_create_file::Migration),
            // Indexes should always be applied last
            Box::new(m20240101_000007_add_indexes::Migration),
        ]
    }
}
