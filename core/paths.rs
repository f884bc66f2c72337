//! Target resolution: turns raw user paths into a minimal set of directory
//! roots plus the standalone files not already covered by one of them.

use log;
use std::collections::BTreeSet;
use std::env;
use std::path::{Component, MAIN_SEPARATOR, Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedTargets {
    /// Clean directory roots, none nested inside another.
    pub directories: Vec<PathBuf>,
    /// Standalone files outside every directory root.
    pub files: Vec<PathBuf>,
    /// Inputs that did not exist when resolved.
    pub missing: Vec<PathBuf>,
    /// Every requested path in absolute form, sorted and deduplicated.
    pub requested: Vec<PathBuf>,
}

impl ResolvedTargets {
    pub fn is_empty(&self) -> bool {
        self.directories.is_empty() && self.files.is_empty()
    }
}

pub fn resolve_targets<S: AsRef<str>>(raw_paths: &[S]) -> ResolvedTargets {
    let requested: BTreeSet<PathBuf> = raw_paths
        .iter()
        .map(|p| absolutize(p.as_ref()))
        .collect();

    let mut dirs = Vec::new();
    let mut files = Vec::new();
    let mut missing = Vec::new();
    for path in &requested {
        if path.is_dir() {
            dirs.push(path.clone());
        } else if path.is_file() {
            files.push(path.clone());
        } else {
            log::warn!(
                "Skipping path (missing or permission denied): {}",
                path.display()
            );
            missing.push(path.clone());
        }
    }

    let directories = dedup_directory_roots(&dirs);
    let files: Vec<PathBuf> = files
        .into_iter()
        .filter(|file| {
            let covered = directories.iter().any(|dir| is_under(file, dir));
            if covered {
                log::debug!(
                    "Dropping standalone file already covered by a directory: {}",
                    file.display()
                );
            }
            !covered
        })
        .collect();

    log::debug!(
        "Resolved {} directory root(s) and {} standalone file(s)",
        directories.len(),
        files.len()
    );
    ResolvedTargets {
        directories,
        files,
        missing,
        requested: requested.into_iter().collect(),
    }
}

/// Keeps the minimal covering set of directories. Sorting with a trailing
/// separator places every descendant right after its ancestor.
pub fn dedup_directory_roots(dirs: &[PathBuf]) -> Vec<PathBuf> {
    let mut keyed: Vec<(String, &PathBuf)> = dirs
        .iter()
        .map(|d| (with_trailing_separator(d), d))
        .collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    keyed.dedup_by(|a, b| a.0 == b.0);

    let mut roots = Vec::new();
    let mut last_kept: Option<String> = None;
    for (key, dir) in keyed {
        if last_kept.as_deref().is_some_and(|kept| key.starts_with(kept)) {
            log::trace!("Directory {} is covered by a previous root", dir.display());
            continue;
        }
        roots.push(dir.clone());
        last_kept = Some(key);
    }
    roots
}

fn is_under(file: &Path, dir: &Path) -> bool {
    file.to_string_lossy()
        .starts_with(&with_trailing_separator(dir))
}

fn with_trailing_separator(path: &Path) -> String {
    let mut s = path.to_string_lossy().into_owned();
    if !s.ends_with(MAIN_SEPARATOR) {
        s.push(MAIN_SEPARATOR);
    }
    s
}

/// Expands `~`, anchors relative paths at the working directory and folds
/// `.` / `..` lexically. Symlinks are left alone.
pub fn absolutize(raw: &str) -> PathBuf {
    let expanded = PathBuf::from(shellexpand::tilde(raw).into_owned());
    let anchored = if expanded.is_absolute() {
        expanded
    } else {
        match env::current_dir() {
            Ok(cwd) => cwd.join(expanded),
            Err(e) => {
                log::warn!("Could not read current directory ({}); using '{}' as is", e, raw);
                expanded
            }
        }
    };
    normalize_lexically(&anchored)
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Final component of a path as display text; falls back to the whole path
/// for roots such as `/`.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn s(p: &Path) -> String {
        p.to_string_lossy().into_owned()
    }

    #[test]
    fn nested_directories_collapse_to_roots() {
        let temp = tempfile::tempdir().unwrap();
        let a = temp.path().join("a");
        let ab = a.join("b");
        let c = temp.path().join("c");
        fs::create_dir_all(&ab).unwrap();
        fs::create_dir_all(&c).unwrap();

        let resolved = resolve_targets(&[s(&a), s(&ab), s(&c)]);
        assert_eq!(resolved.directories, vec![a, c]);
        assert!(resolved.files.is_empty());
        assert!(resolved.missing.is_empty());
    }

    #[test]
    fn sibling_with_shared_prefix_is_kept() {
        let dirs = vec![
            PathBuf::from("/work/app"),
            PathBuf::from("/work/app-extra"),
            PathBuf::from("/work/app/src"),
        ];
        assert_eq!(
            dedup_directory_roots(&dirs),
            vec![PathBuf::from("/work/app"), PathBuf::from("/work/app-extra")]
        );
    }

    #[test]
    fn files_inside_selected_directory_are_dropped() {
        let temp = tempfile::tempdir().unwrap();
        let a = temp.path().join("a");
        let nested = a.join("b").join("file.py");
        let outside = temp.path().join("main.rs");
        fs::create_dir_all(nested.parent().unwrap()).unwrap();
        fs::write(&nested, "print(1)").unwrap();
        fs::write(&outside, "fn main() {}").unwrap();

        let resolved = resolve_targets(&[s(&a), s(&nested), s(&outside)]);
        assert_eq!(resolved.directories, vec![a]);
        assert_eq!(resolved.files, vec![outside]);
        assert_eq!(resolved.requested.len(), 3);
    }

    #[test]
    fn duplicates_and_dot_segments_are_merged() {
        let temp = tempfile::tempdir().unwrap();
        let a = temp.path().join("a");
        fs::create_dir_all(&a).unwrap();
        let dotted = format!("{}/./a/../a", s(temp.path()));

        let resolved = resolve_targets(&[s(&a), dotted]);
        assert_eq!(resolved.directories, vec![a]);
        assert_eq!(resolved.requested.len(), 1);
    }

    #[test]
    fn missing_paths_are_reported_not_fatal() {
        let temp = tempfile::tempdir().unwrap();
        let ghost = temp.path().join("ghost");
        let resolved = resolve_targets(&[s(&ghost)]);
        assert!(resolved.is_empty());
        assert_eq!(resolved.missing, vec![ghost]);
    }

    #[test]
    fn display_name_handles_root() {
        assert_eq!(display_name(Path::new("/srv/project")), "project");
        assert_eq!(display_name(Path::new("/")), "/");
    }
}
