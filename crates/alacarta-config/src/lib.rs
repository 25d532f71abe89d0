//! Configuration and file management for TV a la Carta
//!
//! This crate provides:
//! - Cache and data directory paths
//! - Configuration file discovery (TOML)
//! - Application configuration (AppConfig)

pub mod app_config;
pub mod config_file;
pub mod paths;

pub use app_config::AppConfig;
pub use config_file::{load_config_file, ConfigSource};
pub use paths::{cache_dir, data_dir, default_storage_dir};
