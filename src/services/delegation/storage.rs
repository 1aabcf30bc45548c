use async_trait::async_trait;
use std::error::Error;
use std::path::PathBuf;

use crate::models::DelegationState;

/// Persistence boundary for delegation state snapshots, one file per target
/// block.
#[async_trait]
pub trait DelegationStorage {
    async fn save_state(&self, block: u64, state: &DelegationState) -> Result<(), Box<dyn Error>>;
    async fn load_state(&self, block: u64) -> Result<Option<DelegationState>, Box<dyn Error>>;
}

pub struct FileDelegationStorage {
    storage_path: PathBuf,
}

impl FileDelegationStorage {
    pub fn new(storage_path: PathBuf) -> Self {
        FileDelegationStorage { storage_path }
    }

    fn state_path(&self, block: u64) -> PathBuf {
        self.storage_path
            .join("delegation")
            .join(format!("delegation_{}.json", block))
    }
}

impl Default for FileDelegationStorage {
    fn default() -> Self {
        FileDelegationStorage {
            storage_path: PathBuf::from("out"),
        }
    }
}

#[async_trait]
impl DelegationStorage for FileDelegationStorage {
    async fn save_state(&self, block: u64, state: &DelegationState) -> Result<(), Box<dyn Error>> {
        let file_path = self.state_path(block);
        if let Some(parent) = file_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        // BTreeMap keys serialize sorted, matching the historical artifacts
        let json = serde_json::to_string_pretty(state)?;
        tokio::fs::write(file_path, json).await?;
        Ok(())
    }

    async fn load_state(&self, block: u64) -> Result<Option<DelegationState>, Box<dyn Error>> {
        let file_path = self.state_path(block);
        if !file_path.exists() {
            return Ok(None);
        }
        let content = tokio::fs::read_to_string(file_path).await?;
        Ok(Some(serde_json::from_str(&content)?))
    }
}
