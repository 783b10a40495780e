//! Exporters - post-run, read-only consumers of the final state.
//!
//! The engine guarantees order and completeness of the event log; this
//! module owns its on-disk shape: a JSONL trace (one object per event plus a
//! trailing outcome sentinel) and a visibility map export.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::json;

use crate::engine::RunReport;

/// Write the event log as JSONL: one line per event, then one sentinel line
/// carrying the terminal outcome. Returns the written path.
pub fn write_event_log(dir: &Path, report: &RunReport) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    let path = dir.join(format!("{}-events.jsonl", report.name));
    let mut file = File::create(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    for event in report.events.iter() {
        let line = serde_json::to_string(event)?;
        writeln!(file, "{line}")?;
    }
    let sentinel = json!({
        "outcome": report.outcome,
        "turns": report.events.len(),
        "remaining_budget": report.remaining_budget,
    });
    writeln!(file, "{sentinel}")?;

    Ok(path)
}

/// Write the visited/scanned coordinate sets as JSON. Returns the written
/// path.
pub fn write_visibility(dir: &Path, report: &RunReport) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    let path = dir.join(format!("{}-visibility.json", report.name));

    let payload = serde_json::to_string_pretty(&report.visibility)?;
    std::fs::write(&path, payload)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(path)
}
