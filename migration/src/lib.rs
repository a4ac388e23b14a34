pub use sea_orm_migration::prelude::*;

mod m20260712_000001_create_accounts;
mod m20260712_000002_create_referral_codes;
mod m20260712_000003_create_referral_events;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
  fn migrations() -> Vec<Box<dyn MigrationTrait>> {
    vec![
      Box::new(m20260712_000001_create_accounts::Migration),
      Box::new(m20260712_000002_create_referral_codes::Migration),
      Box::new(m20260712_000003_create_referral_events::Migration),
    ]
  }
}
