use migration::{Migrator, MigratorTrait};

use crate::{
  prelude::*,
  store::{MemoryStore, ObjectLister},
};

pub struct AppState {
  pub db: DatabaseConnection,
  /// Deployments bind the real S3-compatible client here; the dev
  /// default keeps objects in process memory
  pub store: Arc<dyn ObjectLister>,
}

impl AppState {
  pub async fn new(db_url: &str) -> anyhow::Result<Self> {
    let db = Database::connect(db_url).await?;
    Migrator::up(&db, None).await?;

    Ok(Self { db, store: Arc::new(MemoryStore::new()) })
  }

  #[allow(dead_code)]
  pub fn with_store(
    db: DatabaseConnection,
    store: Arc<dyn ObjectLister>,
  ) -> Self {
    Self { db, store }
  }
}
