//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_catalog;
mod m20250301_000002_create_users_and_subscriptions;
mod m20250301_000003_create_promo_codes;
mod m20250301_000004_create_orders;
mod m20250301_000005_create_gift_cards;
mod m20250301_000006_seed_catalog;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_catalog::Migration),
            Box::new(m20250301_000002_create_users_and_subscriptions::Migration),
            Box::new(m20250301_000003_create_promo_codes::Migration),
            Box::new(m20250301_000004_create_orders::Migration),
            Box::new(m20250301_000005_create_gift_cards::Migration),
            Box::new(m20250301_000006_seed_catalog::Migration),
        ]
    }
}
