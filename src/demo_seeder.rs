use std::path::Path;

use crate::error::AppError;
use crate::store::snapshot::Snapshot;

/// Demo articles embedded into the binary.
const DEMO_SNAPSHOT: &str = include_str!("../demo_data/db.json");

/// Parse the embedded demo snapshot.
pub fn demo_snapshot() -> Result<Snapshot, AppError> {
    serde_json::from_str(DEMO_SNAPSHOT)
        .map_err(|e| AppError::Internal(format!("Embedded demo snapshot is invalid: {e}")))
}

/// Write the demo snapshot to `path`, creating parent directories.
///
/// An existing file is only replaced when `force` is set. Returns the
/// number of articles written.
pub async fn seed_snapshot(path: &Path, force: bool) -> Result<usize, AppError> {
    tracing::info!("Seeding demo snapshot at {}", path.display());

    let exists = tokio::fs::try_exists(path)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to check '{}': {}", path.display(), e)))?;
    if exists && !force {
        return Err(AppError::Config(format!(
            "Snapshot '{}' already exists, pass --force to overwrite it",
            path.display()
        )));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            AppError::Internal(format!("Failed to create '{}': {}", parent.display(), e))
        })?;
    }

    let snapshot = demo_snapshot()?;
    let json = serde_json::to_string_pretty(&snapshot)
        .map_err(|e| AppError::Internal(format!("Failed to serialize snapshot: {e}")))?;

    tokio::fs::write(path, json)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to write '{}': {}", path.display(), e)))?;

    tracing::info!("Wrote {} demo articles.", snapshot.blogs.len());
    Ok(snapshot.blogs.len())
}
