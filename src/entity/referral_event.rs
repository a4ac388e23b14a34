use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::account;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum ReferralSource {
  #[sea_orm(string_value = "blog_post")]
  BlogPost,
  #[sea_orm(string_value = "social_comment")]
  SocialComment,
  #[sea_orm(string_value = "direct_link")]
  DirectLink,
  #[sea_orm(string_value = "unknown")]
  #[default]
  Unknown,
}

/// One successful referral registration. Created exactly once, never
/// deleted; only `is_active` and `expires_at` mutate afterwards.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "referral_events")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i32,
  pub referrer_id: String,
  pub referred_id: String,
  pub code: String,
  pub pro_at_registration: bool,
  /// Fixed at creation from the referred account's tier snapshot
  pub reward_bytes: i64,
  pub is_active: bool,
  pub source: ReferralSource,
  pub social_platform: Option<String>,
  pub post_link: Option<String>,
  pub created_at: DateTime,
  pub expires_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "account::Entity",
    from = "Column::ReferrerId",
    to = "account::Column::Id"
  )]
  Referrer,
}

impl Related<account::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Referrer.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
