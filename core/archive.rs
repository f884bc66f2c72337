//! `<stem>.zip` bundle: the written reports at the top level plus every
//! collected source under `extracted_files/`.

use crate::collect::CollectedFile;
use crate::error::{AppError, Result};
use crate::render::ReportFormat;
use indexmap::IndexMap;
use log;
use std::collections::HashSet;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const EXTRACTED_DIR: &str = "extracted_files";

pub fn archive_path(stem: &Path) -> PathBuf {
    let mut name = stem.as_os_str().to_owned();
    name.push(".zip");
    PathBuf::from(name)
}

pub fn write_archive(
    stem: &Path,
    reports: &IndexMap<ReportFormat, PathBuf>,
    files: &[CollectedFile],
) -> Result<PathBuf> {
    let path = archive_path(stem);
    let file = File::create(&path).map_err(|e| AppError::FileWrite {
        path: path.clone(),
        source: e,
    })?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for report in reports.values() {
        let Some(name) = report.file_name() else {
            continue;
        };
        let mut source = File::open(report)?;
        zip.start_file(name.to_string_lossy().into_owned(), options)?;
        io::copy(&mut source, &mut zip)?;
    }

    // Two roots can share a relative path; the first one wins.
    let mut seen = HashSet::new();
    let mut added = 0;
    for collected in files {
        let entry_name = format!("{}/{}", EXTRACTED_DIR, collected.relative_path);
        if !seen.insert(entry_name.clone()) {
            log::warn!("Archive already has {}; skipping {}", entry_name, collected.absolute_path.display());
            continue;
        }
        let mut source = match File::open(&collected.absolute_path) {
            Ok(source) => source,
            Err(e) => {
                log::warn!("Leaving {} out of the archive: {}", collected.absolute_path.display(), e);
                continue;
            }
        };
        zip.start_file(entry_name, options)?;
        io::copy(&mut source, &mut zip)?;
        added += 1;
    }

    zip.finish()?;
    log::info!(
        "Wrote {} with {} report(s) and {} source file(s)",
        path.display(),
        reports.len(),
        added
    );
    Ok(path)
}
