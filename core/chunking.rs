use crate::error::{AppError, Result};
use crate::loader::FileBlock;
use log;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkInfo {
    pub current_part: usize,
    pub total_parts: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub files: Vec<String>,
    pub content: String,
    pub chunk_info: ChunkInfo,
}

pub fn format_segment(block: &FileBlock) -> String {
    format!(
        "--- START FILE: {path} ---\n{}\n--- END FILE: {path} ---\n\n",
        block.content,
        path = block.path
    )
}

/// Greedy packing by character count. A segment larger than `chunk_size`
/// gets a chunk of its own; unreadable blocks are left out.
pub fn split_blocks_into_chunks(blocks: &[FileBlock], chunk_size: usize) -> Result<Vec<Chunk>> {
    if chunk_size == 0 {
        return Err(AppError::Chunking(
            "Chunk size must be greater than 0 characters".to_string(),
        ));
    }

    let mut chunks_data: Vec<(Vec<String>, String)> = Vec::new();
    let mut current_files: Vec<String> = Vec::new();
    let mut current_content = String::new();
    let mut current_size: usize = 0;

    for block in blocks {
        if !block.is_readable() || block.content.is_empty() {
            log::trace!("Skipping unreadable or empty file: {}", block.path);
            continue;
        }
        let segment = format_segment(block);
        let segment_size = segment.chars().count();

        if segment_size > chunk_size {
            log::trace!(
                "File {} ({} chars) exceeds chunk size ({}), putting in its own chunk.",
                block.path,
                segment_size,
                chunk_size
            );
            if !current_files.is_empty() {
                chunks_data.push((
                    std::mem::take(&mut current_files),
                    std::mem::take(&mut current_content),
                ));
                current_size = 0;
            }
            chunks_data.push((vec![block.path.clone()], segment));
            continue;
        }

        if !current_files.is_empty() && current_size.saturating_add(segment_size) > chunk_size {
            chunks_data.push((
                std::mem::take(&mut current_files),
                std::mem::take(&mut current_content),
            ));
            current_size = 0;
        }
        current_size = current_size.saturating_add(segment_size);
        current_files.push(block.path.clone());
        current_content.push_str(&segment);
    }

    if !current_files.is_empty() {
        chunks_data.push((current_files, current_content));
    }

    let total_parts = chunks_data.len();
    if total_parts == 0 {
        log::debug!("No readable files to chunk.");
        return Ok(Vec::new());
    }
    log::info!("Split content into {} chunks.", total_parts);

    Ok(chunks_data
        .into_iter()
        .enumerate()
        .map(|(i, (files, content))| Chunk {
            files,
            content,
            chunk_info: ChunkInfo {
                current_part: i + 1,
                total_parts,
            },
        })
        .collect())
}

pub fn chunk_file_name(prefix: &str, part: usize) -> String {
    format!("{}_chunk_{}.txt", prefix, part)
}

/// Writes `<prefix>_chunk_<n>.txt` files into `dir`, creating it if needed.
pub fn write_chunks(chunks: &[Chunk], dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).map_err(|e| AppError::DirCreation {
        path: dir.to_path_buf(),
        source: e,
    })?;
    let mut written = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        let path = dir.join(chunk_file_name(prefix, chunk.chunk_info.current_part));
        fs::write(&path, &chunk.content).map_err(|e| AppError::FileWrite {
            path: path.clone(),
            source: e,
        })?;
        log::debug!(
            "Wrote chunk {}/{} to {}",
            chunk.chunk_info.current_part,
            chunk.chunk_info.total_parts,
            path.display()
        );
        written.push(path);
    }
    Ok(written)
}
