pub mod archive;
pub mod chunking;
pub mod collect;
pub mod config;
pub mod error;
pub mod ignore_rules;
pub mod loader;
pub mod oneline;
pub mod paths;
pub mod pipeline;
pub mod render;
pub mod report;
pub mod secrets;
pub mod system;
pub mod tree;

pub use archive::write_archive;
pub use chunking::{Chunk, ChunkInfo, split_blocks_into_chunks, write_chunks};
pub use collect::{CollectedFile, is_code_file};
pub use config::Config;
pub use error::{AppError, Result};
pub use ignore_rules::{IgnoreFilter, PatternSet};
pub use loader::{BlockStatus, ContentReader, FileBlock, FsContentReader, read_file_content};
pub use oneline::{compress_to_oneline, pick_oneline_source, write_oneline_variant};
pub use paths::{ResolvedTargets, resolve_targets};
pub use pipeline::{ChunkOutcome, ExtractionOptions, ExtractionOutcome, Extractor};
pub use render::{ReportFormat, ReportRenderer};
pub use report::ReportModel;
pub use secrets::{SecretFinding, scan_blocks};
pub use system::{HostInfo, gather_host_info};
pub use tree::{TreeNode, TreeStats};
