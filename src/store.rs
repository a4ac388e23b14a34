//! Boundary to the S3-compatible object store. The accountant only
//! needs shallow prefix listings; recursion into folders happens on the
//! caller's side.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectEntry {
  pub key: String,
  pub size: i64,
  pub is_folder: bool,
}

#[async_trait]
pub trait ObjectLister: Send + Sync {
  /// List the entries directly under `prefix` (one level, not
  /// recursive). Folder entries carry a trailing `/` in their key and
  /// a zero size.
  async fn list_prefix(&self, prefix: &str) -> Result<Vec<ObjectEntry>>;
}

/// In-process object store used for development and tests. Production
/// deployments bind the real S3 client behind the same trait.
#[derive(Default)]
pub struct MemoryStore {
  objects: DashMap<String, i64>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn put(&self, key: &str, size: i64) {
    self.objects.insert(key.to_string(), size);
  }

  #[allow(dead_code)]
  pub fn remove(&self, key: &str) {
    self.objects.remove(key);
  }
}

#[async_trait]
impl ObjectLister for MemoryStore {
  async fn list_prefix(&self, prefix: &str) -> Result<Vec<ObjectEntry>> {
    let mut entries = Vec::new();
    let mut seen_folders = std::collections::HashSet::new();

    for item in self.objects.iter() {
      let Some(rest) = item.key().strip_prefix(prefix) else {
        continue;
      };

      match rest.split_once('/') {
        // Direct child object
        None => entries.push(ObjectEntry {
          key: item.key().clone(),
          size: *item.value(),
          is_folder: false,
        }),
        // Object in a subfolder: surface the folder once
        Some((dir, _)) => {
          if seen_folders.insert(dir.to_string()) {
            entries.push(ObjectEntry {
              key: format!("{prefix}{dir}/"),
              size: 0,
              is_folder: true,
            });
          }
        }
      }
    }

    Ok(entries)
  }
}
