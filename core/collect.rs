use crate::ignore_rules::{IgnoreFilter, PatternSet};
use log;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions (with leading dot) and exact filenames treated as text/code.
static SUPPORTED_EXTENSIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        ".py", ".js", ".mjs", ".ts", ".txt", ".jsx", ".tsx", ".java", ".c", ".cpp", ".h", ".hpp",
        ".cs", ".php", ".rb", ".go", ".rs", ".swift", ".kt", ".sh", ".bash", ".html", ".css",
        ".scss", ".json", ".yaml", ".yml", ".toml", ".ini", ".md", ".sql", "Dockerfile",
        "Makefile",
    ]
    .into_iter()
    .collect()
});

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CollectedFile {
    pub absolute_path: PathBuf,
    /// `/`-separated path relative to the originating root, or the bare
    /// filename for standalone files.
    pub relative_path: String,
}

/// Allow-list heuristic, not content sniffing: a binary file with a listed
/// extension is still accepted. Extensionless names only pass when listed
/// (`Dockerfile`, `Makefile`); a MIME guess has nothing to go on for them.
pub fn is_code_file(path: &Path) -> bool {
    let Some(file_name) = path.file_name().map(|n| n.to_string_lossy()) else {
        return false;
    };
    if SUPPORTED_EXTENSIONS.contains(&*file_name) {
        return true;
    }
    match path.extension().map(|e| e.to_string_lossy().to_lowercase()) {
        Some(ext) if !ext.is_empty() => SUPPORTED_EXTENSIONS.contains(format!(".{}", ext).as_str()),
        _ => false,
    }
}

/// Walks one clean root. Symlinked directories are not followed.
pub fn collect_from_root(
    root: &Path,
    filter: &IgnoreFilter,
    dynamic: &PatternSet,
) -> Vec<CollectedFile> {
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !filter.should_ignore(
                    entry.path(),
                    &entry.file_name().to_string_lossy(),
                    dynamic,
                )
        });

    let mut files = Vec::new();
    for entry_result in walker {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Error walking directory: {}", e);
                continue;
            }
        };
        let path = entry.path();
        if entry.depth() == 0 || !path.is_file() || !is_code_file(path) {
            continue;
        }
        match pathdiff::diff_paths(path, root) {
            Some(relative) => {
                log::trace!("Collected: {}", relative.display());
                files.push(CollectedFile {
                    absolute_path: path.to_path_buf(),
                    relative_path: to_slash(&relative),
                });
            }
            None => log::warn!("Could not get relative path for: {}", path.display()),
        }
    }
    files
}

pub fn collect_standalone(file: &Path) -> Option<CollectedFile> {
    if !is_code_file(file) {
        return None;
    }
    let name = file.file_name()?.to_string_lossy().into_owned();
    Some(CollectedFile {
        absolute_path: file.to_path_buf(),
        relative_path: name,
    })
}

fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
