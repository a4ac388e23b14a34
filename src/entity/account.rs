use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{referral_code, referral_event};

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum AccountTier {
  #[sea_orm(string_value = "free")]
  #[default]
  Free,
  #[sea_orm(string_value = "pro")]
  Pro,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub id: String,
  pub tier: AccountTier,
  pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(has_one = "referral_code::Entity")]
  ReferralCode,
  #[sea_orm(has_many = "referral_event::Entity")]
  ReferralEvents,
}

impl Related<referral_code::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::ReferralCode.def()
  }
}

impl Related<referral_event::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::ReferralEvents.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
