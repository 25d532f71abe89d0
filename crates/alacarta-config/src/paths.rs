//! Cache and data directory paths
//!
//! Uses XDG directories via `dirs` crate.
//!
//! Platform-specific locations:
//! - Linux: `~/.cache/alacarta/`, `~/.local/share/alacarta/`
//! - macOS: `~/Library/Caches/alacarta/`, `~/Library/Application Support/alacarta/`
//! - Windows: `%LOCALAPPDATA%\alacarta\`, `%APPDATA%\alacarta\`

use anyhow::{Context, Result};
use std::path::PathBuf;

pub(crate) const APP_NAME: &str = "alacarta";

/// Get the application cache directory (log files live here in release builds)
pub fn cache_dir() -> Result<PathBuf> {
    let base = dirs::cache_dir().context("Could not determine cache directory")?;
    let dir = base.join(APP_NAME);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create cache directory {:?}", dir))?;
    Ok(dir)
}

/// Get the application data directory
pub fn data_dir() -> Result<PathBuf> {
    let base = dirs::data_dir().context("Could not determine data directory")?;
    let dir = base.join(APP_NAME);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create data directory {:?}", dir))?;
    Ok(dir)
}

/// Default location of the shared key/value storage every tab reads and writes
pub fn default_storage_dir() -> Result<PathBuf> {
    Ok(data_dir()?.join("storage"))
}
