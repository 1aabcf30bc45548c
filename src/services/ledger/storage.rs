use async_trait::async_trait;
use std::error::Error;
use std::path::PathBuf;

use crate::models::Snapshot;

/// Persistence boundary for holding snapshots. One file per
/// `(token, target_block)` key; the replay assumes it is the sole writer
/// for a token's snapshot directory during its run.
#[async_trait]
pub trait SnapshotStorage {
    async fn save_snapshot(&self, snapshot: &Snapshot) -> Result<(), Box<dyn Error>>;
    async fn load_snapshot(
        &self,
        token: &str,
        block: u64,
    ) -> Result<Option<Snapshot>, Box<dyn Error>>;
}

pub struct FileSnapshotStorage {
    storage_path: PathBuf,
}

impl FileSnapshotStorage {
    pub fn new(storage_path: PathBuf) -> Self {
        FileSnapshotStorage { storage_path }
    }

    fn snapshot_path(&self, token: &str, block: u64) -> PathBuf {
        self.storage_path
            .join("holding")
            .join(token)
            .join(format!("{}_{}.json", token, block))
    }
}

impl Default for FileSnapshotStorage {
    fn default() -> Self {
        FileSnapshotStorage {
            storage_path: PathBuf::from("out"),
        }
    }
}

#[async_trait]
impl SnapshotStorage for FileSnapshotStorage {
    async fn save_snapshot(&self, snapshot: &Snapshot) -> Result<(), Box<dyn Error>> {
        let file_path = self.snapshot_path(&snapshot.token, snapshot.block);
        if let Some(parent) = file_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(&snapshot.to_document())?;
        tokio::fs::write(file_path, json).await?;
        Ok(())
    }

    async fn load_snapshot(
        &self,
        token: &str,
        block: u64,
    ) -> Result<Option<Snapshot>, Box<dyn Error>> {
        let file_path = self.snapshot_path(token, block);
        if !file_path.exists() {
            return Ok(None);
        }
        let content = tokio::fs::read_to_string(file_path).await?;
        let document: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(&content)?;
        Ok(Some(Snapshot::from_document(token, block, document)?))
    }
}
