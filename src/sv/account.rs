use crate::{
  entity::{AccountTier, account},
  prelude::*,
};

pub struct Account<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Account<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  pub async fn get_or_create(&self, id: &str) -> Result<account::Model> {
    self.get_or_create_with_tier(id, AccountTier::Free).await
  }

  pub async fn get_or_create_with_tier(
    &self,
    id: &str,
    tier: AccountTier,
  ) -> Result<account::Model> {
    if let Some(account) = account::Entity::find_by_id(id).one(self.db).await?
    {
      return Ok(account);
    }

    let now = Utc::now().naive_utc();
    let account = account::ActiveModel {
      id: Set(id.to_string()),
      tier: Set(tier),
      created_at: Set(now),
    };

    Ok(account.insert(self.db).await?)
  }

  pub async fn by_id(&self, id: &str) -> Result<Option<account::Model>> {
    let account = account::Entity::find_by_id(id).one(self.db).await?;
    Ok(account)
  }

  /// Tier of an account, `Free` when the account is not yet known
  pub async fn tier(&self, id: &str) -> Result<AccountTier> {
    Ok(self.by_id(id).await?.map(|acc| acc.tier).unwrap_or_default())
  }

  pub async fn set_tier(&self, id: &str, tier: AccountTier) -> Result<()> {
    let account = self.get_or_create(id).await?;

    account::ActiveModel { tier: Set(tier), ..account.into() }
      .update(self.db)
      .await?;

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::sv::test_utils::test_db;

  #[tokio::test]
  async fn test_get_or_create_defaults_to_free() {
    let db = test_db::setup().await;

    let account = Account::new(&db).get_or_create("acc-1").await.unwrap();
    assert_eq!(account.tier, AccountTier::Free);

    let again = Account::new(&db).get_or_create("acc-1").await.unwrap();
    assert_eq!(again.id, account.id);
  }

  #[tokio::test]
  async fn test_set_tier() {
    let db = test_db::setup().await;
    let sv = Account::new(&db);

    sv.get_or_create("acc-1").await.unwrap();
    sv.set_tier("acc-1", AccountTier::Pro).await.unwrap();

    assert_eq!(sv.tier("acc-1").await.unwrap(), AccountTier::Pro);
    // Unknown accounts read as free
    assert_eq!(sv.tier("ghost").await.unwrap(), AccountTier::Free);
  }
}
