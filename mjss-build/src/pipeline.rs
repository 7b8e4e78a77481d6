use anyhow::{Context, Result};
use mjss_game::{DayStandings, SheetError, ValidatedSet, date_label, standings_from_json};
use std::fs;
use std::path::{Path, PathBuf};

/// One score sheet after validation and aggregation.
#[derive(Debug, Clone)]
pub struct ProcessedSet {
    pub source: PathBuf,
    /// Source path relative to the data root.
    pub relative: PathBuf,
    pub validated: ValidatedSet,
    pub standings: DayStandings,
}

/// Read, validate and fold a single score sheet.
pub fn process_set_file(data_dir: &Path, path: &Path) -> Result<ProcessedSet> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let (validated, standings) = match standings_from_json(&text) {
        Ok(result) => result,
        Err(err) => {
            if let SheetError::Validation(failure) = &err {
                log::error!("{}: {failure}", path.display());
            }
            return Err(err).with_context(|| format!("failed to process {}", path.display()));
        }
    };

    let label = date_label(validated.date());
    for violation in validated.diagnostics() {
        log::warn!(
            "{label}[{}]: {} ({})",
            violation.game_index,
            violation.kind,
            violation.tolerance
        );
    }
    if !standings.excluded().is_empty() {
        log::info!(
            "{label}: games {:?} left out of standings",
            standings.excluded()
        );
    }

    let relative = path
        .strip_prefix(data_dir)
        .map_or_else(|_| PathBuf::from(path.file_name().unwrap_or_default()), Path::to_path_buf);

    Ok(ProcessedSet {
        source: path.to_path_buf(),
        relative,
        validated,
        standings,
    })
}

/// Process every listed sheet; the first failure aborts the whole batch.
pub fn run_batch(data_dir: &Path, files: &[PathBuf]) -> Result<Vec<ProcessedSet>> {
    files
        .iter()
        .map(|path| process_set_file(data_dir, path))
        .collect()
}
