//! System export and restore actions

use chrono::{DateTime, Utc};
use std::path::PathBuf;

use crate::state::AdminState;

#[derive(Debug, Clone, PartialEq)]
pub enum BackupAction {
    Started,
    Exported { at: DateTime<Utc>, path: PathBuf },
    Failed { reason: String },
    /// Catalog read back from an export archive
    Restored { path: PathBuf, state: Box<AdminState> },
    RestoreFailed { reason: String },
}
