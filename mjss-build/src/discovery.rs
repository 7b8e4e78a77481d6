use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory below the data root that holds score sheets, one subdirectory per group.
pub const SHEET_ROOT: [&str; 2] = ["gb", "pws"];

#[must_use]
pub fn sheet_root(data_dir: &Path) -> PathBuf {
    SHEET_ROOT
        .iter()
        .fold(data_dir.to_path_buf(), |path, segment| path.join(segment))
}

/// Find every `<data>/gb/pws/<group>/<sheet>.json`, sorted by path.
///
/// Hidden entries are skipped. A data root without a sheet directory yields
/// no files.
pub fn discover_set_files(data_dir: &Path) -> Result<Vec<PathBuf>> {
    let root = sheet_root(data_dir);
    if !root.is_dir() {
        log::debug!("no sheet directory at {}", root.display());
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for group in visible_entries(&root)? {
        if !group.is_dir() {
            continue;
        }
        for sheet in visible_entries(&group)? {
            let is_json = sheet.extension().is_some_and(|ext| ext == "json");
            if is_json && sheet.is_file() {
                files.push(sheet);
            }
        }
    }
    files.sort();
    log::debug!("discovered {} score sheets under {}", files.len(), root.display());
    Ok(files)
}

fn visible_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("failed to list {}", dir.display()))? {
        let entry = entry.with_context(|| format!("failed to list {}", dir.display()))?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        entries.push(entry.path());
    }
    Ok(entries)
}
