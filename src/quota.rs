//! Static tier table: base storage allowances and referral bonus caps.
//!
//! The base quota is deliberately much smaller than the bonus caps: a
//! free account holds 50 MiB of its own but can earn up to 2 GiB by
//! referring, so referral bonuses dominate the total allowance.

use crate::entity::AccountTier;

pub const MIB: i64 = 1024 * 1024;
pub const GIB: i64 = 1024 * MIB;

/// Reward for referring a free-tier signup
pub const STANDARD_REFERRAL_BONUS: i64 = 50 * MIB;
/// Reward for referring a pro signup
pub const PRO_REFERRAL_BONUS: i64 = 100 * MIB;

pub fn base_quota(is_pro: bool) -> i64 {
  if is_pro { GIB } else { 50 * MIB }
}

/// Upper bound on both earned and active referral bonus
pub fn bonus_cap(tier: AccountTier) -> i64 {
  match tier {
    AccountTier::Free => 2 * GIB,
    AccountTier::Pro => 3 * GIB,
  }
}

pub fn reward_size(is_pro: bool) -> i64 {
  if is_pro { PRO_REFERRAL_BONUS } else { STANDARD_REFERRAL_BONUS }
}
