use sea_orm_migration::prelude::*;

use super::m20260712_000001_create_accounts::Accounts;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(ReferralEvents::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(ReferralEvents::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(
            ColumnDef::new(ReferralEvents::ReferrerId).string().not_null(),
          )
          .col(
            ColumnDef::new(ReferralEvents::ReferredId).string().not_null(),
          )
          .col(ColumnDef::new(ReferralEvents::Code).string().not_null())
          .col(
            ColumnDef::new(ReferralEvents::ProAtRegistration)
              .boolean()
              .not_null()
              .default(false),
          )
          .col(
            ColumnDef::new(ReferralEvents::RewardBytes)
              .big_integer()
              .not_null(),
          )
          .col(
            ColumnDef::new(ReferralEvents::IsActive)
              .boolean()
              .not_null()
              .default(true),
          )
          .col(
            ColumnDef::new(ReferralEvents::Source)
              .string()
              .not_null()
              .default("unknown"),
          )
          .col(
            ColumnDef::new(ReferralEvents::SocialPlatform).string().null(),
          )
          .col(ColumnDef::new(ReferralEvents::PostLink).string().null())
          .col(
            ColumnDef::new(ReferralEvents::CreatedAt).date_time().not_null(),
          )
          .col(
            ColumnDef::new(ReferralEvents::ExpiresAt).date_time().not_null(),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_referral_events_referrer")
              .from(ReferralEvents::Table, ReferralEvents::ReferrerId)
              .to(Accounts::Table, Accounts::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    // An account can be referred at most once; also dedupes retried
    // registrations at the database level
    manager
      .create_index(
        Index::create()
          .name("idx_referral_events_referred")
          .table(ReferralEvents::Table)
          .col(ReferralEvents::ReferredId)
          .unique()
          .to_owned(),
      )
      .await?;

    // Covers the active-bonus aggregation
    manager
      .create_index(
        Index::create()
          .name("idx_referral_events_active")
          .table(ReferralEvents::Table)
          .col(ReferralEvents::ReferrerId)
          .col(ReferralEvents::IsActive)
          .col(ReferralEvents::ExpiresAt)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_index(
        Index::drop()
          .name("idx_referral_events_active")
          .table(ReferralEvents::Table)
          .to_owned(),
      )
      .await?;

    manager
      .drop_index(
        Index::drop()
          .name("idx_referral_events_referred")
          .table(ReferralEvents::Table)
          .to_owned(),
      )
      .await?;

    manager
      .drop_table(Table::drop().table(ReferralEvents::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum ReferralEvents {
  Table,
  Id,
  ReferrerId,
  ReferredId,
  Code,
  ProAtRegistration,
  RewardBytes,
  IsActive,
  Source,
  SocialPlatform,
  PostLink,
  CreatedAt,
  ExpiresAt,
}
