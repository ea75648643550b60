use std::path::PathBuf;

use directories::ProjectDirs;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetDirError {
    #[error("could not determine a data directory for this platform")]
    NoHome,
    #[error("failed to create data directory {path}: {source}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Directory holding the SQLite database and other runtime data.
///
/// Debug builds keep everything under `dev_assets/` in the working directory.
pub fn asset_dir() -> Result<PathBuf, AssetDirError> {
    let path = if cfg!(debug_assertions) {
        PathBuf::from("dev_assets")
    } else {
        ProjectDirs::from("ai", "vibescode", "site-builder")
            .ok_or(AssetDirError::NoHome)?
            .data_dir()
            .to_path_buf()
    };

    if !path.exists() {
        std::fs::create_dir_all(&path).map_err(|source| AssetDirError::Create {
            path: path.clone(),
            source,
        })?;
    }

    Ok(path)
}
