use crate::error::{AppError, Result};
use crate::render::ReportFormat;
use indexmap::IndexMap;
use log;
use std::fs;
use std::path::{Path, PathBuf};

/// Formats eligible for compression, in preference order.
pub const ONELINE_SOURCES: [ReportFormat; 2] = [ReportFormat::Text, ReportFormat::Markdown];

/// Collapses every whitespace run, newlines included, into a single space.
pub fn compress_to_oneline(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `report.txt` -> `report.oneline.txt`
pub fn oneline_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}.oneline.{}", stem, ext.to_string_lossy()),
        None => format!("{}.oneline", stem),
    };
    path.with_file_name(name)
}

pub fn pick_oneline_source(written: &IndexMap<ReportFormat, PathBuf>) -> Option<&PathBuf> {
    ONELINE_SOURCES
        .iter()
        .find_map(|format| written.get(format))
}

/// Writes the compressed sibling of `source` and returns its path.
pub fn write_oneline_variant(source: &Path) -> Result<PathBuf> {
    log::info!("Compressing {} to a single line...", source.display());
    let bytes = fs::read(source)?;
    let compressed = compress_to_oneline(&String::from_utf8_lossy(&bytes));
    let target = oneline_path(source);
    fs::write(&target, compressed).map_err(|e| AppError::FileWrite {
        path: target.clone(),
        source: e,
    })?;
    log::debug!("One-line variant written to {}", target.display());
    Ok(target)
}
