#![cfg(test)]
use std::path::PathBuf;

use configs::DatabaseConfig;
use migration::MigratorTrait;
use uuid::Uuid;

use crate::training::TrainingStore;

/// Removes the SQLite file (and its journal siblings) when the test ends.
pub struct TempDbFile(PathBuf);

impl Drop for TempDbFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
        for suffix in ["-journal", "-wal", "-shm"] {
            let mut side = self.0.clone().into_os_string();
            side.push(suffix);
            let _ = std::fs::remove_file(side);
        }
    }
}

/// Store over a fresh, migrated SQLite file so tests never share rows.
pub async fn get_store() -> Result<(TrainingStore, TempDbFile), anyhow::Error> {
    let path = std::env::temp_dir().join(format!("gesture-service-{}.db", Uuid::new_v4()));
    let cfg = DatabaseConfig {
        url: format!("sqlite://{}?mode=rwc", path.display()),
        max_connections: 2,
        min_connections: 1,
        ..DatabaseConfig::default()
    };
    let file = TempDbFile(path);
    let store = TrainingStore::connect(&cfg).await?;
    migration::Migrator::up(store.connection(), None).await?;
    Ok((store, file))
}

mod tests {
    use super::*;

    #[tokio::test]
    async fn database_file_removed_when_guard_drops() -> anyhow::Result<()> {
        let (store, file) = get_store().await?;
        let path = file.0.clone();
        assert!(path.exists());
        drop(store);
        drop(file);
        assert!(!path.exists());
        Ok(())
    }
}
