//! Migrator registering catalog migrations in dependency order.
//! Seed data is applied last.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_category;
mod m20240101_000002_create_product;
mod m20240101_000003_create_product_category;
mod m20240101_000004_seed_catalog;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_category::Migration),
            Box::new(m20240101_000002_create_product::Migration),
            Box::new(m20240101_000003_create_product_category::Migration),
            // Seed rows reference every table above
            Box::new(m20240101_000004_seed_catalog::Migration),
        ]
    }
}
