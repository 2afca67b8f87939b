use std::path::PathBuf;

use configs::DatabaseConfig;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::db::connect_with_config;



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

/// Fresh, migrated SQLite file database for one test.
pub(crate) async fn sqlite_db() -> anyhow::Result<(DatabaseConnection, TempDbFile)> {
    let path = std::env::temp_dir().join(format!("gesture-models-{}.db", Uuid::new_v4()));
    let cfg = DatabaseConfig {
        url: format!("sqlite://{}?mode=rwc", path.display()),
        max_connections: 1,
        min_connections: 1,
        ..DatabaseConfig::default()
    };
    let file = TempDbFile(path);
    let db = connect_with_config(&cfg).await?;
    migration::Migrator::up(&db, None).await?;
    Ok((db, file))
}
