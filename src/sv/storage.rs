use serde::Serialize;

use crate::{
  entity::AccountTier,
  prelude::*,
  quota,
  store::ObjectLister,
  sv,
};

pub struct Storage<'a> {
  db: &'a DatabaseConnection,
  store: &'a dyn ObjectLister,
}

#[derive(Debug, Serialize)]
pub struct StorageInfo {
  pub total_size: i64,
  pub used_size: i64,
  pub remaining_size: i64,
  pub used_percentage: f64,
  pub quota: i64,
  pub referral_bonus: i64,
  pub tier: AccountTier,
}

impl<'a> Storage<'a> {
  pub fn new(db: &'a DatabaseConnection, store: &'a dyn ObjectLister) -> Self {
    Self { db, store }
  }

  /// Base tier quota plus the freshly recomputed referral bonus
  pub async fn total_available(
    &self,
    account_id: &str,
    is_pro: bool,
  ) -> Result<i64> {
    let bonus =
      sv::Referral::new(self.db).recalculate_active_bonus(account_id).await?;
    Ok(quota::base_quota(is_pro) + bonus)
  }

  /// Consumed bytes under the account's prefix, folders walked
  /// depth-first
  pub async fn used_bytes(&self, account_id: &str) -> Result<i64> {
    let mut stack = vec![format!("{account_id}/")];
    let mut total = 0i64;

    while let Some(prefix) = stack.pop() {
      for entry in self.store.list_prefix(&prefix).await? {
        if entry.is_folder {
          stack.push(entry.key);
        } else {
          total += entry.size;
        }
      }
    }

    Ok(total)
  }

  /// Admission check for an incoming upload. Check-then-act: the caller
  /// still has to handle the store rejecting the actual upload.
  pub async fn has_enough_space(
    &self,
    account_id: &str,
    incoming: i64,
    is_pro: bool,
  ) -> Result<bool> {
    if incoming < 0 {
      return Err(Error::InvalidArgs(
        "file size must not be negative".into(),
      ));
    }

    let used = self.used_bytes(account_id).await?;
    let total = self.total_available(account_id, is_pro).await?;

    Ok(used + incoming <= total)
  }

  pub async fn info(
    &self,
    account_id: &str,
    is_pro: bool,
  ) -> Result<StorageInfo> {
    let bonus =
      sv::Referral::new(self.db).recalculate_active_bonus(account_id).await?;
    let base = quota::base_quota(is_pro);
    let total = base + bonus;
    let used = self.used_bytes(account_id).await?;

    Ok(StorageInfo {
      total_size: total,
      used_size: used,
      remaining_size: (total - used).max(0),
      used_percentage: used as f64 / total as f64 * 100.0,
      quota: base,
      referral_bonus: bonus,
      tier: if is_pro { AccountTier::Pro } else { AccountTier::Free },
    })
  }
}

#[cfg(test)]
mod tests {
  use async_trait::async_trait;

  use super::*;
  use crate::{
    entity::ReferralSource,
    quota::{GIB, MIB},
    store::{MemoryStore, ObjectEntry},
    sv::test_utils::test_db,
  };

  struct DownStore;

  #[async_trait]
  impl ObjectLister for DownStore {
    async fn list_prefix(&self, _: &str) -> Result<Vec<ObjectEntry>> {
      Err(Error::StorageUnavailable("connection refused".into()))
    }
  }

  #[tokio::test]
  async fn test_base_quota_without_referrals() {
    let db = test_db::setup().await;
    let store = MemoryStore::new();
    let sv = Storage::new(&db, &store);

    assert_eq!(sv.total_available("acc-a", false).await.unwrap(), 50 * MIB);
    assert_eq!(sv.total_available("acc-a", true).await.unwrap(), GIB);
  }

  #[tokio::test]
  async fn test_used_bytes_walks_folders() {
    let db = test_db::setup().await;
    let store = MemoryStore::new();
    store.put("acc-a/report.pdf", 10 * MIB);
    store.put("acc-a/docs/act.pdf", 20 * MIB);
    store.put("acc-a/docs/archive/old.pdf", 5 * MIB);
    store.put("acc-b/other.pdf", 100 * MIB);

    let sv = Storage::new(&db, &store);
    assert_eq!(sv.used_bytes("acc-a").await.unwrap(), 35 * MIB);
  }

  #[tokio::test]
  async fn test_admission_boundary_is_exact() {
    let db = test_db::setup().await;
    let store = MemoryStore::new();
    store.put("acc-a/blob.bin", 40 * MIB);

    let sv = Storage::new(&db, &store);

    // Free base quota is 50 MiB, 10 MiB left
    assert!(sv.has_enough_space("acc-a", 10 * MIB, false).await.unwrap());
    assert!(!sv.has_enough_space("acc-a", 10 * MIB + 1, false).await.unwrap());
    assert!(sv.has_enough_space("acc-a", 0, false).await.unwrap());
  }

  #[tokio::test]
  async fn test_referral_bonus_extends_allowance() {
    let db = test_db::setup().await;
    let store = MemoryStore::new();
    store.put("acc-a/blob.bin", 40 * MIB);

    // One standard referral: 50 MiB base + 50 MiB bonus = 100 MiB
    let code = sv::Referral::new(&db).get_or_create_code("acc-a").await.unwrap();
    sv::Referral::new(&db)
      .register(&code.code, "acc-b", false, ReferralSource::Unknown, None, None)
      .await
      .unwrap();

    let sv = Storage::new(&db, &store);
    assert!(sv.has_enough_space("acc-a", 55 * MIB, false).await.unwrap());
    assert!(!sv.has_enough_space("acc-a", 65 * MIB, false).await.unwrap());
  }

  #[tokio::test]
  async fn test_negative_size_rejected() {
    let db = test_db::setup().await;
    let store = MemoryStore::new();
    let sv = Storage::new(&db, &store);

    let result = sv.has_enough_space("acc-a", -1, false).await;
    assert!(matches!(result, Err(Error::InvalidArgs(_))));
  }

  #[tokio::test]
  async fn test_listing_failure_is_not_zero_usage() {
    let db = test_db::setup().await;
    let sv = Storage::new(&db, &DownStore);

    let result = sv.has_enough_space("acc-a", MIB, false).await;
    assert!(matches!(result, Err(Error::StorageUnavailable(_))));
  }

  #[tokio::test]
  async fn test_storage_info_view() {
    let db = test_db::setup().await;
    let store = MemoryStore::new();
    store.put("acc-a/blob.bin", 25 * MIB);

    let sv = Storage::new(&db, &store);
    let info = sv.info("acc-a", false).await.unwrap();

    assert_eq!(info.total_size, 50 * MIB);
    assert_eq!(info.used_size, 25 * MIB);
    assert_eq!(info.remaining_size, 25 * MIB);
    assert!((info.used_percentage - 50.0).abs() < f64::EPSILON);
    assert_eq!(info.quota, 50 * MIB);
    assert_eq!(info.referral_bonus, 0);
    assert_eq!(info.tier, AccountTier::Free);
  }

  #[tokio::test]
  async fn test_overused_account_reports_zero_remaining() {
    let db = test_db::setup().await;
    let store = MemoryStore::new();
    // Over quota, e.g. after a downgrade from pro
    store.put("acc-a/blob.bin", 80 * MIB);

    let sv = Storage::new(&db, &store);
    let info = sv.info("acc-a", false).await.unwrap();

    assert_eq!(info.remaining_size, 0);
    assert!(info.used_percentage > 100.0);
    assert!(!sv.has_enough_space("acc-a", 0, false).await.unwrap());
  }
}
