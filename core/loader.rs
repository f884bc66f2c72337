//! File body loading. Reads never fail from the caller's point of view: an
//! unreadable file becomes an inline error block.

use crate::collect::CollectedFile;
use crate::error::Result;
use log;
use std::fs;
use std::path::Path;
use std::sync::mpsc;
use std::thread;

/// Character cap per file. Part of the output format, not a tunable.
pub const MAX_CONTENT_CHARS: usize = 1_000_000;

/// Pool size when the core count cannot be determined.
pub const FALLBACK_WORKERS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf16,
    Utf8,
}

impl TextEncoding {
    /// UTF-16 needs a byte order mark; unpaired surrogates are substituted.
    fn decode_utf16(bytes: &[u8]) -> Option<String> {
        let (body, little_endian) = match bytes {
            [0xFF, 0xFE, rest @ ..] => (rest, true),
            [0xFE, 0xFF, rest @ ..] => (rest, false),
            _ => return None,
        };
        let units: Vec<u16> = body
            .chunks_exact(2)
            .map(|pair| {
                if little_endian {
                    u16::from_le_bytes([pair[0], pair[1]])
                } else {
                    u16::from_be_bytes([pair[0], pair[1]])
                }
            })
            .collect();
        Some(String::from_utf16_lossy(&units))
    }
}

/// A UTF-16 byte order mark wins; everything else is UTF-8 with invalid
/// sequences replaced by U+FFFD, so one stray byte never garbles the rest.
pub fn decode_bytes(bytes: &[u8]) -> (TextEncoding, String) {
    match TextEncoding::decode_utf16(bytes) {
        Some(text) => (TextEncoding::Utf16, text),
        None => (
            TextEncoding::Utf8,
            String::from_utf8_lossy(bytes).into_owned(),
        ),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStatus {
    Complete,
    Truncated { original_chars: usize },
    Unreadable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedContent {
    pub content: String,
    pub status: BlockStatus,
}

/// One file's contribution to a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBlock {
    pub path: String,
    pub content: String,
    pub status: BlockStatus,
}

impl FileBlock {
    pub fn is_readable(&self) -> bool {
        self.status != BlockStatus::Unreadable
    }
}

/// Source of file bodies for the loader pool.
pub trait ContentReader: Sync {
    fn read(&self, path: &Path) -> LoadedContent;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FsContentReader;

impl ContentReader for FsContentReader {
    fn read(&self, path: &Path) -> LoadedContent {
        read_file_content(path)
    }
}

pub fn read_file_content(path: &Path) -> LoadedContent {
    match fs::read(path) {
        Ok(bytes) => {
            let (encoding, decoded) = decode_bytes(&bytes);
            log::trace!("Decoded {} as {:?}", path.display(), encoding);
            cap_content(decoded)
        }
        Err(e) => {
            log::warn!("Could not read {}: {}", path.display(), e);
            LoadedContent {
                content: unreadable_sentinel(path),
                status: BlockStatus::Unreadable,
            }
        }
    }
}

pub fn unreadable_sentinel(path: &Path) -> String {
    format!("[Error: Unable to read file {}]", path.display())
}

/// Keeps the first `MAX_CONTENT_CHARS` characters and appends a marker with
/// the original length.
pub fn cap_content(content: String) -> LoadedContent {
    let Some((cut, _)) = content.char_indices().nth(MAX_CONTENT_CHARS) else {
        return LoadedContent {
            content,
            status: BlockStatus::Complete,
        };
    };
    let original_chars = content.chars().count();
    let mut truncated = content[..cut].to_string();
    truncated.push_str(&truncation_marker(original_chars));
    LoadedContent {
        content: truncated,
        status: BlockStatus::Truncated { original_chars },
    }
}

pub fn truncation_marker(original_chars: usize) -> String {
    format!(
        "\n\n[... File truncated - original size: {} characters]",
        original_chars
    )
}

pub fn worker_count() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(FALLBACK_WORKERS)
}

/// Reads every file on a pool sized to the host's cores. Blocks arrive in
/// completion order and are sorted by relative path before returning.
pub fn load_contents<R: ContentReader>(
    files: &[CollectedFile],
    reader: &R,
) -> Result<Vec<FileBlock>> {
    let workers = worker_count();
    log::info!(
        "Reading {} file(s) with {} worker(s)...",
        files.len(),
        workers
    );
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("codedump-read-{}", i))
        .build()?;

    let (tx, rx) = mpsc::channel::<FileBlock>();
    pool.scope(|scope| {
        for file in files {
            let tx = tx.clone();
            scope.spawn(move |_| {
                let loaded = reader.read(&file.absolute_path);
                log::debug!("Read: {}", file.relative_path);
                let block = FileBlock {
                    path: file.relative_path.clone(),
                    content: loaded.content,
                    status: loaded.status,
                };
                if tx.send(block).is_err() {
                    log::error!("Receiver dropped before {} was delivered", file.relative_path);
                }
            });
        }
    });
    drop(tx);

    let mut blocks: Vec<FileBlock> = rx.into_iter().collect();
    blocks.sort_by(|a, b| a.path.cmp(&b.path));
    log::info!("File reading complete.");
    Ok(blocks)
}
