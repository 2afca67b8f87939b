//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::Path;

use tracing::warn;

/// Warn when the static view directory is missing; create the parent
/// directory of a SQLite database file if one is configured.
pub async fn ensure_env(static_dir: &str, sqlite_file: Option<&str>) -> anyhow::Result<()> {
    if tokio::fs::metadata(static_dir).await.is_err() {
        warn!(%static_dir, "static view directory not found; pages will 404");
    }
    if let Some(file) = sqlite_file {
        if let Some(parent) = Path::new(file).parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}

/// Extract the file path from a `sqlite:` URL, ignoring in-memory databases.
pub fn sqlite_file_from_url(url: &str) -> Option<&str> {
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or(rest);
    if path.is_empty() || path == ":memory:" {
        None
    } else {
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_paths() {
        assert_eq!(sqlite_file_from_url("sqlite://data/dev.db?mode=rwc"), Some("data/dev.db"));
        assert_eq!(sqlite_file_from_url("sqlite::memory:"), None);
        assert_eq!(sqlite_file_from_url("postgres://localhost/x"), None);
    }

    #[tokio::test]
    async fn creates_sqlite_parent_dir() -> anyhow::Result<()> {
        let root = std::env::temp_dir().join(format!("gesture-env-{}", uuid::Uuid::new_v4()));
        let file = root.join("nested").join("dev.db");
        let file = file.to_string_lossy().to_string();
        ensure_env("does-not-exist", Some(&file)).await?;
        assert!(root.join("nested").is_dir());
        tokio::fs::remove_dir_all(&root).await?;
        Ok(())
    }
}
