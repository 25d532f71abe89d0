//! Config file discovery

use std::{env, path::PathBuf};

const CONFIG_FILE: &str = ".alacarta.toml";

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "ALACARTA_CONFIG";

/// A config file that was found and read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    pub path: PathBuf,
    pub content: String,
}

/// Locations searched for the config file, most specific first:
/// `$ALACARTA_CONFIG`, `./.alacarta.toml`, `$HOME/.alacarta.toml`
pub fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(3);
    if let Some(explicit) = env::var_os(CONFIG_ENV) {
        paths.push(PathBuf::from(explicit));
    }
    paths.push(PathBuf::from(CONFIG_FILE));
    if let Some(home) = env::var_os("HOME") {
        paths.push(PathBuf::from(home).join(CONFIG_FILE));
    }
    paths
}

/// Read the first candidate that exists
pub fn read_first(candidates: &[PathBuf]) -> Option<ConfigSource> {
    candidates.iter().find_map(|path| {
        let content = std::fs::read_to_string(path).ok()?;
        log::debug!("Loaded config from {}", path.display());
        Some(ConfigSource {
            path: path.clone(),
            content,
        })
    })
}

/// Load the config file from the standard locations, if any exists
pub fn load_config_file() -> Option<ConfigSource> {
    read_first(&candidate_paths())
}
