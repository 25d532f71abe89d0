//! System export and restore
//!
//! Bundles the current admin configuration into a zip archive:
//!
//! ```text
//! tv-a-la-carta-sistema-completo-<timestamp>.zip
//! ├── system-config.json        configuration summary + statistics
//! ├── README.md                 human readable summary
//! └── config/admin_state.json   storage envelope, read back by `read_archive`
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Value};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::state::AdminState;
use crate::sync::SyncEnvelope;

pub const SYSTEM_VERSION: &str = "2.0.0";
pub const SYSTEM_CONFIG_ENTRY: &str = "system-config.json";
pub const README_ENTRY: &str = "README.md";
pub const ADMIN_STATE_ENTRY: &str = "config/admin_state.json";

/// Notifications included in the configuration summary
const EXPORTED_NOTIFICATIONS: usize = 10;

const FEATURES: [&str; 8] = [
    "Real-time synchronization",
    "Complete admin panel",
    "Dynamic price management",
    "Delivery zones management",
    "Novel catalog management",
    "Detailed notification system",
    "Complete system export",
    "Cross-tab synchronization",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error on {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("invalid export content: {0}")]
    Json(#[from] serde_json::Error),

    #[error("export task failed: {0}")]
    Task(String),
}

/// `tv-a-la-carta-sistema-completo-2024-01-01T10-00-00-000Z.zip`
pub fn archive_file_name(at: DateTime<Utc>) -> String {
    let timestamp = at
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("tv-a-la-carta-sistema-completo-{}.zip", timestamp)
}

/// Content of `system-config.json`
pub fn system_config(state: &AdminState, at: DateTime<Utc>) -> Value {
    let notifications: Vec<_> = state
        .notifications
        .iter()
        .take(EXPORTED_NOTIFICATIONS)
        .collect();

    json!({
        "systemVersion": SYSTEM_VERSION,
        "exportDate": at.to_rfc3339_opts(SecondsFormat::Millis, true),
        "exportedBy": "Panel de Administración",
        "configuration": {
            "prices": state.prices,
            "deliveryZones": state.delivery_zones,
            "novels": state.novels,
            "notifications": notifications,
        },
        "features": FEATURES,
        "synchronizedFiles": [SYSTEM_CONFIG_ENTRY, README_ENTRY, ADMIN_STATE_ENTRY],
        "statistics": {
            "totalZones": state.delivery_zones.len(),
            "totalNovels": state.novels.len(),
            "totalNotifications": state.notifications.len(),
        },
    })
}

/// Content of `README.md`
pub fn readme(state: &AdminState, at: DateTime<Utc>) -> String {
    let prices = &state.prices;
    let last_sync = state
        .sync_status
        .last_sync
        .map_or_else(|| "Nunca".to_string(), |t| t.to_rfc3339());

    let mut out = String::new();
    out.push_str("# TV a la Carta - Sistema Completo\n\n");
    out.push_str("## Configuración Actual del Sistema\n\n");
    out.push_str("### Precios Configurados\n");
    out.push_str(&format!("- Películas: ${} CUP\n", prices.movie_price));
    out.push_str(&format!("- Series (por temporada): ${} CUP\n", prices.series_price));
    out.push_str(&format!(
        "- Recargo transferencia: {}%\n",
        prices.transfer_fee_percentage
    ));
    out.push_str(&format!(
        "- Novelas (por capítulo): ${} CUP\n\n",
        prices.novel_price_per_chapter
    ));

    out.push_str(&format!(
        "### Zonas de Entrega ({})\n",
        state.delivery_zones.len()
    ));
    for zone in &state.delivery_zones {
        out.push_str(&format!("- {}: ${} CUP\n", zone.name, zone.cost));
    }

    out.push_str(&format!("\n### Novelas Administradas ({})\n", state.novels.len()));
    for novel in &state.novels {
        out.push_str(&format!(
            "- {} ({}) - {} capítulos\n",
            novel.title, novel.year, novel.chapters
        ));
    }

    out.push_str(&format!(
        "\n### Notificaciones\n- Total: {}\n\n",
        state.notifications.len()
    ));
    out.push_str(&format!("Última sincronización: {}\n", last_sync));
    out.push_str(&format!("Exportado el: {}\n", at.to_rfc3339()));
    out
}

/// Write the archive into `dir` and return its path
pub fn write_archive(
    dir: &Path,
    envelope: &SyncEnvelope,
    at: DateTime<Utc>,
) -> Result<PathBuf, ExportError> {
    let path = dir.join(archive_file_name(at));
    let io_err = |source: std::io::Error| ExportError::Io {
        path: path.clone(),
        source,
    };

    std::fs::create_dir_all(dir).map_err(io_err)?;
    let file = File::create(&path).map_err(io_err)?;

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(file);

    let entries = [
        (
            SYSTEM_CONFIG_ENTRY,
            serde_json::to_string_pretty(&system_config(&envelope.state, at))?,
        ),
        (README_ENTRY, readme(&envelope.state, at)),
        (ADMIN_STATE_ENTRY, serde_json::to_string_pretty(envelope)?),
    ];
    for (name, content) in entries {
        zip.start_file(name, options)?;
        zip.write_all(content.as_bytes()).map_err(io_err)?;
    }
    zip.finish()?;

    log::info!("System export written to {:?}", path);
    Ok(path)
}

/// Read the admin snapshot back out of an export archive
pub fn read_archive(path: &Path) -> Result<SyncEnvelope, ExportError> {
    let io_err = |source: std::io::Error| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_err)?;
    let mut archive = ZipArchive::new(file)?;
    let mut content = String::new();
    archive
        .by_name(ADMIN_STATE_ENTRY)?
        .read_to_string(&mut content)
        .map_err(io_err)?;

    let envelope = SyncEnvelope::from_json(&content)?;
    log::info!(
        "Read system export {:?} (envelope #{} written {})",
        path,
        envelope.sequence,
        envelope.written_at
    );
    Ok(envelope)
}

/// Read an archive on the blocking pool
pub async fn load_system_backup(path: PathBuf) -> Result<SyncEnvelope, ExportError> {
    tokio::task::spawn_blocking(move || read_archive(&path))
        .await
        .map_err(|e| ExportError::Task(e.to_string()))?
}

/// Write the archive on the blocking pool
pub async fn export_system_backup(
    dir: PathBuf,
    envelope: SyncEnvelope,
    at: DateTime<Utc>,
) -> Result<PathBuf, ExportError> {
    tokio::task::spawn_blocking(move || write_archive(&dir, &envelope, at))
        .await
        .map_err(|e| ExportError::Task(e.to_string()))?
}
