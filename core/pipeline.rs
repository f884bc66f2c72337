//! End-to-end extraction: resolve, walk, read, assemble, render, write.
//!
//! Each stage is a separate method so callers can step in between loading
//! and writing (the CLI asks about secret findings there). Secret findings
//! are only recorded here; whether they stop a run is the caller's decision.

use crate::chunking::{self, Chunk};
use crate::archive::write_archive;
use crate::collect::{CollectedFile, collect_from_root, collect_standalone};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::ignore_rules::IgnoreFilter;
use crate::loader::{ContentReader, FileBlock, FsContentReader, load_contents};
use crate::oneline::{pick_oneline_source, write_oneline_variant};
use crate::paths::{ResolvedTargets, display_name, resolve_targets};
use crate::render::{ReportFormat, render_all};
use crate::report::{DirectorySummary, ReportModel};
use crate::secrets::{SecretFinding, scan_blocks};
use crate::system::gather_host_info;
use crate::tree::{TreeStats, build_tree};
use chrono::{DateTime, Local};
use indexmap::IndexMap;
use log;
use std::fs;
use std::path::{Path, PathBuf};

pub const REPORT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
pub const MULTI_TARGET_NAME: &str = "multi_targets";

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionOptions {
    pub formats: Vec<ReportFormat>,
    pub output_dir: PathBuf,
    pub base_name: Option<String>,
    pub ignore_patterns: Vec<String>,
    pub use_builtin_ignores: bool,
    pub use_ignore_file: bool,
    pub oneline: bool,
    pub archive: bool,
    pub scan_secrets: bool,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        ExtractionOptions {
            formats: vec![ReportFormat::Text],
            output_dir: PathBuf::from("."),
            base_name: None,
            ignore_patterns: Vec::new(),
            use_builtin_ignores: true,
            use_ignore_file: true,
            oneline: false,
            archive: false,
            scan_secrets: true,
        }
    }
}

impl ExtractionOptions {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(ExtractionOptions {
            formats: ReportFormat::parse_list(&config.output.formats)?,
            output_dir: config.output.directory.clone(),
            base_name: config.output.base_name.clone(),
            ignore_patterns: config.effective_ignore_patterns(),
            use_builtin_ignores: config.filters.use_builtin_ignores,
            use_ignore_file: config.filters.use_ignore_file,
            oneline: config.report.oneline,
            archive: config.output.archive,
            scan_secrets: config.secrets.enabled,
        })
    }
}

/// Result of the walk phase, before any file body is read.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub targets: ResolvedTargets,
    pub summaries: Vec<DirectorySummary>,
    pub files: Vec<CollectedFile>,
}

#[derive(Debug, Clone)]
pub struct ExtractionOutcome {
    pub written: IndexMap<ReportFormat, PathBuf>,
    pub oneline: Option<PathBuf>,
    pub archive: Option<PathBuf>,
    pub stats: TreeStats,
    pub extracted_count: usize,
    pub findings: Vec<SecretFinding>,
}

#[derive(Debug, Clone)]
pub struct ChunkOutcome {
    pub written: Vec<PathBuf>,
    pub chunks: Vec<Chunk>,
    pub findings: Vec<SecretFinding>,
}

pub fn default_base_name(targets: &ResolvedTargets, now: &DateTime<Local>) -> String {
    let name = match targets.requested.as_slice() {
        [single] => display_name(single),
        _ => MULTI_TARGET_NAME.to_string(),
    };
    format!("codebase_{}_{}", name, now.format(FILE_TIMESTAMP_FORMAT))
}

/// `report.txt` -> `report`; the extension comes from each format.
pub fn strip_extension(base_name: &str) -> PathBuf {
    Path::new(base_name).with_extension("")
}

pub struct Extractor<R: ContentReader = FsContentReader> {
    options: ExtractionOptions,
    filter: IgnoreFilter,
    reader: R,
}

impl Extractor<FsContentReader> {
    pub fn new(options: ExtractionOptions) -> Result<Self> {
        Self::with_reader(options, FsContentReader)
    }
}

impl<R: ContentReader> Extractor<R> {
    pub fn with_reader(options: ExtractionOptions, reader: R) -> Result<Self> {
        let filter = IgnoreFilter::new(
            &options.ignore_patterns,
            options.use_builtin_ignores,
            options.use_ignore_file,
        )?;
        Ok(Extractor {
            options,
            filter,
            reader,
        })
    }

    pub fn options(&self) -> &ExtractionOptions {
        &self.options
    }

    /// Resolves targets, builds one tree per clean root and lists the files
    /// to read. Fails when nothing is left to extract.
    pub fn collect<S: AsRef<str>>(&self, raw_paths: &[S]) -> Result<Snapshot> {
        let targets = resolve_targets(raw_paths);
        if targets.is_empty() {
            return Err(AppError::NothingToExtract(
                "no valid input path was given".to_string(),
            ));
        }

        let mut summaries = Vec::with_capacity(targets.directories.len());
        let mut files = Vec::new();
        for root in &targets.directories {
            log::info!("Scanning {}", root.display());
            let dynamic = self.filter.load_dynamic_patterns(root);
            let tree = build_tree(root, &self.filter, &dynamic);
            let found = collect_from_root(root, &self.filter, &dynamic);
            log::info!("Collected {} file(s) from {}", found.len(), root.display());
            files.extend(found);
            summaries.push(DirectorySummary {
                root: root.clone(),
                tree,
            });
        }
        for file in &targets.files {
            match collect_standalone(file) {
                Some(entry) => files.push(entry),
                None => log::info!("Skipping non-code standalone file: {}", file.display()),
            }
        }

        if files.is_empty() {
            return Err(AppError::NothingToExtract(
                "no textual file found under the given paths".to_string(),
            ));
        }
        Ok(Snapshot {
            targets,
            summaries,
            files,
        })
    }

    pub fn load(&self, snapshot: &Snapshot) -> Result<Vec<FileBlock>> {
        load_contents(&snapshot.files, &self.reader)
    }

    pub fn scan(&self, blocks: &[FileBlock]) -> Vec<SecretFinding> {
        if self.options.scan_secrets {
            scan_blocks(blocks)
        } else {
            log::debug!("Secret scanning disabled.");
            Vec::new()
        }
    }

    pub fn assemble(
        &self,
        snapshot: &Snapshot,
        blocks: Vec<FileBlock>,
        now: &DateTime<Local>,
    ) -> ReportModel {
        ReportModel::assemble(
            &snapshot.targets,
            &snapshot.summaries,
            blocks,
            now.format(REPORT_DATE_FORMAT).to_string(),
            gather_host_info().descriptor(),
        )
    }

    pub fn output_stem(&self, targets: &ResolvedTargets, now: &DateTime<Local>) -> PathBuf {
        let base = match &self.options.base_name {
            Some(name) => strip_extension(name),
            None => PathBuf::from(default_base_name(targets, now)),
        };
        self.options.output_dir.join(base)
    }

    /// Renders every format first, then writes them; a rendering error leaves
    /// the disk untouched.
    pub fn write(
        &self,
        report: &ReportModel,
        stem: &Path,
    ) -> Result<IndexMap<ReportFormat, PathBuf>> {
        let rendered = render_all(report, &self.options.formats)?;

        if let Some(parent) = stem.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| AppError::DirCreation {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut written = IndexMap::new();
        for (format, content) in rendered {
            let mut file_name = stem.as_os_str().to_owned();
            file_name.push(".");
            file_name.push(format.extension());
            let path = PathBuf::from(file_name);
            fs::write(&path, content).map_err(|e| AppError::FileWrite {
                path: path.clone(),
                source: e,
            })?;
            log::info!("Wrote {}", path.display());
            written.insert(format, path);
        }
        Ok(written)
    }

    /// Full report run. Secret findings end up in the outcome and never
    /// stop the write.
    pub fn run<S: AsRef<str>>(&self, raw_paths: &[S]) -> Result<ExtractionOutcome> {
        self.run_with_gate(raw_paths, |_| Ok(()))
    }

    /// Like `run`, but `gate` sees the secret findings (possibly empty)
    /// after loading and before anything is written; an error aborts.
    pub fn run_with_gate<S, G>(&self, raw_paths: &[S], gate: G) -> Result<ExtractionOutcome>
    where
        S: AsRef<str>,
        G: FnOnce(&[SecretFinding]) -> Result<()>,
    {
        let snapshot = self.collect(raw_paths)?;
        let blocks = self.load(&snapshot)?;
        let findings = self.scan(&blocks);
        gate(&findings)?;

        let now = Local::now();
        let report = self.assemble(&snapshot, blocks, &now);
        let stem = self.output_stem(&snapshot.targets, &now);
        let written = self.write(&report, &stem)?;

        let oneline = if self.options.oneline {
            match pick_oneline_source(&written) {
                Some(source) => Some(write_oneline_variant(source)?),
                None => {
                    log::warn!("One-line output needs a txt or md report; skipping.");
                    None
                }
            }
        } else {
            None
        };

        let archive = if self.options.archive {
            Some(write_archive(&stem, &written, &snapshot.files)?)
        } else {
            None
        };

        Ok(ExtractionOutcome {
            written,
            oneline,
            archive,
            stats: report.header.stats,
            extracted_count: report.extracted_count,
            findings,
        })
    }

    /// Chunking run: packs file bodies into `<stem>_chunk_<n>.txt` files
    /// instead of rendering a report.
    pub fn run_chunked<S, G>(&self, raw_paths: &[S], chunk_size: usize, gate: G) -> Result<ChunkOutcome>
    where
        S: AsRef<str>,
        G: FnOnce(&[SecretFinding]) -> Result<()>,
    {
        if chunk_size == 0 {
            return Err(AppError::Chunking(
                "Chunk size must be greater than 0 characters".to_string(),
            ));
        }
        if self.options.archive {
            log::warn!("Archives are only built for report runs; ignoring it in chunking mode.");
        }
        let snapshot = self.collect(raw_paths)?;
        let blocks = self.load(&snapshot)?;
        let findings = self.scan(&blocks);
        gate(&findings)?;

        let chunks = chunking::split_blocks_into_chunks(&blocks, chunk_size)?;
        let stem = self.output_stem(&snapshot.targets, &Local::now());
        let dir = stem
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let prefix = stem
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| MULTI_TARGET_NAME.to_string());
        let written = chunking::write_chunks(&chunks, &dir, &prefix)?;
        Ok(ChunkOutcome {
            written,
            chunks,
            findings,
        })
    }
}
