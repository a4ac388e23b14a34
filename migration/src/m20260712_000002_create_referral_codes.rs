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
          .table(ReferralCodes::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(ReferralCodes::Code)
              .string()
              .not_null()
              .primary_key(),
          )
          .col(ColumnDef::new(ReferralCodes::OwnerId).string().not_null())
          .col(
            ColumnDef::new(ReferralCodes::TotalReferrals)
              .integer()
              .not_null()
              .default(0),
          )
          .col(
            ColumnDef::new(ReferralCodes::TotalProReferrals)
              .integer()
              .not_null()
              .default(0),
          )
          .col(
            ColumnDef::new(ReferralCodes::EarnedBonus)
              .big_integer()
              .not_null()
              .default(0),
          )
          .col(
            ColumnDef::new(ReferralCodes::ActiveBonus)
              .big_integer()
              .not_null()
              .default(0),
          )
          .col(
            ColumnDef::new(ReferralCodes::CreatedAt).date_time().not_null(),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_referral_codes_owner")
              .from(ReferralCodes::Table, ReferralCodes::OwnerId)
              .to(Accounts::Table, Accounts::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    // One code per account
    manager
      .create_index(
        Index::create()
          .name("idx_referral_codes_owner")
          .table(ReferralCodes::Table)
          .col(ReferralCodes::OwnerId)
          .unique()
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_index(
        Index::drop()
          .name("idx_referral_codes_owner")
          .table(ReferralCodes::Table)
          .to_owned(),
      )
      .await?;

    manager
      .drop_table(Table::drop().table(ReferralCodes::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum ReferralCodes {
  Table,
  Code,
  OwnerId,
  TotalReferrals,
  TotalProReferrals,
  EarnedBonus,
  ActiveBonus,
  CreatedAt,
}
