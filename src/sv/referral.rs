use rand::Rng;

use crate::{
  entity::{AccountTier, ReferralSource, account, referral_code, referral_event},
  prelude::*,
  quota, sv,
};

pub struct Referral<'a> {
  db: &'a DatabaseConnection,
}

const CODE_LEN: usize = 8;
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Reward window for a fresh or renewed referral
pub const REWARD_WINDOW_DAYS: i64 = 365;

fn generate_code() -> String {
  let mut rng = rand::thread_rng();
  (0..CODE_LEN)
    .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
    .collect()
}

impl<'a> Referral<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  /// Idempotent: the first call issues a code, every later call for the
  /// same account returns it unchanged.
  pub async fn get_or_create_code(
    &self,
    account_id: &str,
  ) -> Result<referral_code::Model> {
    if let Some(code) = referral_code::Entity::find()
      .filter(referral_code::Column::OwnerId.eq(account_id))
      .one(self.db)
      .await?
    {
      return Ok(code);
    }

    sv::Account::new(self.db).get_or_create(account_id).await?;

    // Collision-checked generation; regenerate until free
    let mut code = generate_code();
    while referral_code::Entity::find_by_id(code.as_str())
      .one(self.db)
      .await?
      .is_some()
    {
      code = generate_code();
    }

    let now = Utc::now().naive_utc();
    let model = referral_code::ActiveModel {
      code: Set(code),
      owner_id: Set(account_id.to_string()),
      total_referrals: Set(0),
      total_pro_referrals: Set(0),
      earned_bonus: Set(0),
      active_bonus: Set(0),
      created_at: Set(now),
    };

    Ok(model.insert(self.db).await?)
  }

  /// Ledger entry for an account, with `active_bonus` recomputed so the
  /// caller never reads a stale value.
  pub async fn code_info(
    &self,
    account_id: &str,
  ) -> Result<Option<referral_code::Model>> {
    if referral_code::Entity::find()
      .filter(referral_code::Column::OwnerId.eq(account_id))
      .one(self.db)
      .await?
      .is_none()
    {
      return Ok(None);
    }

    self.recalculate_active_bonus(account_id).await?;

    let code = referral_code::Entity::find()
      .filter(referral_code::Column::OwnerId.eq(account_id))
      .one(self.db)
      .await?;
    Ok(code)
  }

  pub async fn events(
    &self,
    account_id: &str,
  ) -> Result<Vec<referral_event::Model>> {
    Ok(
      referral_event::Entity::find()
        .filter(referral_event::Column::ReferrerId.eq(account_id))
        .order_by_desc(referral_event::Column::CreatedAt)
        .all(self.db)
        .await?,
    )
  }

  /// Record a successful registration through a referral code.
  ///
  /// Returns `Ok(false)` without touching any state for an unknown
  /// code, a self-referral, or an account that was already referred;
  /// these are expected outcomes from untrusted input, not errors.
  pub async fn register(
    &self,
    code: &str,
    referred_id: &str,
    is_pro: bool,
    source: ReferralSource,
    social_platform: Option<String>,
    post_link: Option<String>,
  ) -> Result<bool> {
    let txn = self.db.begin().await?;

    let Some(code_row) =
      referral_code::Entity::find_by_id(code).one(&txn).await?
    else {
      return Ok(false);
    };

    if code_row.owner_id == referred_id {
      debug!("self-referral rejected for {referred_id}");
      return Ok(false);
    }

    // An account can only ever be referred once; this also dedupes
    // retried registrations
    let already = referral_event::Entity::find()
      .filter(referral_event::Column::ReferredId.eq(referred_id))
      .count(&txn)
      .await?;
    if already > 0 {
      return Ok(false);
    }

    let referrer_tier = account::Entity::find_by_id(&code_row.owner_id)
      .one(&txn)
      .await?
      .map(|acc| acc.tier)
      .unwrap_or_default();
    let cap = quota::bonus_cap(referrer_tier);

    let now = Utc::now().naive_utc();
    let reward = quota::reward_size(is_pro);

    if account::Entity::find_by_id(referred_id).one(&txn).await?.is_none() {
      account::ActiveModel {
        id: Set(referred_id.to_string()),
        tier: Set(if is_pro { AccountTier::Pro } else { AccountTier::Free }),
        created_at: Set(now),
      }
      .insert(&txn)
      .await?;
    }

    referral_event::ActiveModel {
      id: NotSet,
      referrer_id: Set(code_row.owner_id.clone()),
      referred_id: Set(referred_id.to_string()),
      code: Set(code.to_string()),
      pro_at_registration: Set(is_pro),
      reward_bytes: Set(reward),
      is_active: Set(true),
      source: Set(source),
      social_platform: Set(social_platform),
      post_link: Set(post_link),
      created_at: Set(now),
      expires_at: Set(now + TimeDelta::days(REWARD_WINDOW_DAYS)),
    }
    .insert(&txn)
    .await?;

    let pro_bump = if is_pro { 1 } else { 0 };
    referral_code::ActiveModel {
      total_referrals: Set(code_row.total_referrals + 1),
      total_pro_referrals: Set(code_row.total_pro_referrals + pro_bump),
      earned_bonus: Set((code_row.earned_bonus + reward).min(cap)),
      active_bonus: Set((code_row.active_bonus + reward).min(cap)),
      ..code_row.into()
    }
    .update(&txn)
    .await?;

    txn.commit().await?;

    info!("referral via {code}: {referred_id} (pro: {is_pro})");
    Ok(true)
  }

  /// Subscription change hook for a referred account. Going pro renews
  /// the reward window (even an expired one, on purpose); dropping pro
  /// lapses the reward immediately regardless of remaining time.
  pub async fn update_referral_status(
    &self,
    referred_id: &str,
    is_pro_active: bool,
  ) -> Result<()> {
    // Standard events have no lapse/renew transitions
    let Some(event) = referral_event::Entity::find()
      .filter(referral_event::Column::ReferredId.eq(referred_id))
      .filter(referral_event::Column::ProAtRegistration.eq(true))
      .one(self.db)
      .await?
    else {
      return Ok(());
    };

    let referrer_id = event.referrer_id.clone();
    let txn = self.db.begin().await?;

    if is_pro_active {
      let now = Utc::now().naive_utc();
      referral_event::ActiveModel {
        is_active: Set(true),
        expires_at: Set(now + TimeDelta::days(REWARD_WINDOW_DAYS)),
        ..event.into()
      }
      .update(&txn)
      .await?;
    } else {
      referral_event::ActiveModel { is_active: Set(false), ..event.into() }
        .update(&txn)
        .await?;
    }

    // Keep the referred account's stored tier in sync
    if let Some(account) =
      account::Entity::find_by_id(referred_id).one(&txn).await?
    {
      let tier =
        if is_pro_active { AccountTier::Pro } else { AccountTier::Free };
      account::ActiveModel { tier: Set(tier), ..account.into() }
        .update(&txn)
        .await?;
    }

    txn.commit().await?;

    self.recalculate_active_bonus(&referrer_id).await?;
    Ok(())
  }

  /// Authoritative derivation of the active bonus: the sum of rewards
  /// over events that are both flagged active and not yet expired,
  /// clamped to the owner-tier cap. The `active_bonus` column is only a
  /// cache of this value.
  pub async fn recalculate_active_bonus(
    &self,
    account_id: &str,
  ) -> Result<i64> {
    use sea_orm::sea_query::Expr;

    let Some(code) = referral_code::Entity::find()
      .filter(referral_code::Column::OwnerId.eq(account_id))
      .one(self.db)
      .await?
    else {
      return Ok(0);
    };

    let tier = sv::Account::new(self.db).tier(account_id).await?;

    let now = Utc::now().naive_utc();
    let sum: Option<i64> = referral_event::Entity::find()
      .select_only()
      .column_as(
        Expr::col(referral_event::Column::RewardBytes).sum(),
        "active",
      )
      .filter(referral_event::Column::ReferrerId.eq(account_id))
      .filter(referral_event::Column::IsActive.eq(true))
      .filter(referral_event::Column::ExpiresAt.gt(now))
      .into_tuple()
      .one(self.db)
      .await?
      .flatten();

    let active = sum.unwrap_or(0).min(quota::bonus_cap(tier));

    if active != code.active_bonus {
      referral_code::ActiveModel { active_bonus: Set(active), ..code.into() }
        .update(self.db)
        .await?;
    }

    Ok(active)
  }
}
