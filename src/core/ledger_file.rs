//! # Ledger Persistence
//!
//! The recycle ledger only exists on the client, so it is saved next to the
//! config as `~/.apimenu/recycle-<project>.json`.
//!
//! Writes use atomic rename (write `.tmp`, then `rename()`) for crash safety.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Serialize;

use crate::core::config::app_dir;
use crate::core::recycle::RecycleLedger;

/// Returns the ledger path for `project_id`, creating `~/.apimenu/` if needed.
pub fn ledger_path(project_id: &str) -> io::Result<PathBuf> {
    let dir = app_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no home directory"))?;
    fs::create_dir_all(&dir)?;
    let safe: String = project_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    Ok(dir.join(format!("recycle-{safe}.json")))
}

/// Atomically write `data` as JSON to `path` (via `.tmp` + rename).
fn atomic_write_json<T: Serialize>(path: &Path, data: &T) -> io::Result<()> {
    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

pub fn save_ledger(path: &Path, ledger: &RecycleLedger) -> io::Result<()> {
    atomic_write_json(path, ledger)?;
    debug!("Ledger saved: {} entries to {}", ledger.len(), path.display());
    Ok(())
}

/// Loads the ledger at `path`. A missing file is an empty ledger.
pub fn load_ledger(path: &Path) -> io::Result<RecycleLedger> {
    if !path.exists() {
        return Ok(RecycleLedger::default());
    }
    let json = fs::read_to_string(path)?;
    serde_json::from_str(&json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
