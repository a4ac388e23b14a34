use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::account;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "referral_codes")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub code: String,
  /// Exactly one code per account (unique index on owner_id)
  pub owner_id: String,
  pub total_referrals: i32,
  pub total_pro_referrals: i32,
  /// Cumulative bonus ever earned, clamped to the tier cap
  pub earned_bonus: i64,
  /// Cache of the recomputed active bonus; the event list is the
  /// source of truth
  pub active_bonus: i64,
  pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "account::Entity",
    from = "Column::OwnerId",
    to = "account::Column::Id"
  )]
  Owner,
}

impl Related<account::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Owner.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
