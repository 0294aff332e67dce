//! JSON I/O: load task lists, save run results and sweep reports.

use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::types::Task;

/// Load a JSON array of tasks.
pub fn load_tasks(path: impl AsRef<Path>) -> Result<Vec<Task>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Save any result (a `SimulationRun`, sweep points) as pretty JSON,
/// creating the parent directory if needed.
pub fn save_json<T: Serialize + ?Sized>(value: &T, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    tracing::debug!(path = %path.display(), "Saved report");
    Ok(())
}
