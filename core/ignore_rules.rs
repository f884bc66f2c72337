use crate::error::{AppError, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use log;
use std::fs;
use std::path::Path;

/// Per-root ignore file. Only the copy at a directory root is read.
pub const IGNORE_FILE_NAME: &str = ".gitignore";

pub const BUILTIN_IGNORE_PATTERNS: &[&str] = &[
    "__pycache__",
    ".git",
    "node_modules",
    "venv",
    "env",
    ".venv",
    "build",
    "dist",
    "target",
    "*.log",
    ".DS_Store",
];

/// Dotfiles that survive the hidden-entry rule.
pub const HIDDEN_EXEMPTIONS: &[&str] = &[IGNORE_FILE_NAME, ".dockerignore", ".env", ".env.example"];

/// A compiled list of glob patterns. Each pattern is tested against the bare
/// entry name and, as `*/<pattern>`, against the full path.
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<String>,
    names: GlobSet,
    paths: GlobSet,
}

impl Default for PatternSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl PatternSet {
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
            names: GlobSet::empty(),
            paths: GlobSet::empty(),
        }
    }

    /// Builds the set, failing on the first invalid pattern.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        Self::build(patterns, true)
    }

    /// Builds the set, skipping invalid patterns with a warning. Used for
    /// ignore files, where one bad line should not abort the run.
    pub fn lenient<S: AsRef<str>>(patterns: &[S]) -> Self {
        match Self::build(patterns, false) {
            Ok(set) => set,
            Err(e) => {
                log::warn!("Ignoring unusable pattern set: {}", e);
                Self::empty()
            }
        }
    }

    fn build<S: AsRef<str>>(patterns: &[S], strict: bool) -> Result<Self> {
        let mut names = GlobSetBuilder::new();
        let mut paths = GlobSetBuilder::new();
        let mut kept = Vec::new();
        for raw in patterns {
            let Some(pattern) = normalize_pattern(raw.as_ref()) else {
                continue;
            };
            let compiled = Glob::new(&pattern)
                .and_then(|name_glob| Ok((name_glob, Glob::new(&format!("*/{}", pattern))?)));
            match compiled {
                Ok((name_glob, path_glob)) => {
                    log::trace!("Adding ignore pattern: {}", pattern);
                    names.add(name_glob);
                    paths.add(path_glob);
                    kept.push(pattern);
                }
                Err(e) if strict => {
                    return Err(AppError::Glob(format!(
                        "Invalid glob pattern \"{}\": {}",
                        raw.as_ref(),
                        e
                    )));
                }
                Err(e) => {
                    log::warn!("Skipping invalid glob pattern \"{}\": {}", raw.as_ref(), e);
                }
            }
        }
        Ok(Self {
            patterns: kept,
            names: names.build()?,
            paths: paths.build()?,
        })
    }

    pub fn is_match(&self, full_path: &Path, name: &str) -> bool {
        self.names.is_match(name) || self.paths.is_match(full_path)
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Trims a pattern and drops the slashes that anchor gitignore entries,
/// since matching here is plain glob matching on names and path tails.
fn normalize_pattern(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_start_matches('/').trim_end_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Exclusion decisions shared by the tree builder and the file collector.
/// Immutable once built.
#[derive(Debug, Clone)]
pub struct IgnoreFilter {
    base: PatternSet,
    use_ignore_file: bool,
}

impl IgnoreFilter {
    pub fn new(extra_patterns: &[String], use_builtin: bool, use_ignore_file: bool) -> Result<Self> {
        let mut patterns: Vec<String> = if use_builtin {
            BUILTIN_IGNORE_PATTERNS.iter().map(|p| p.to_string()).collect()
        } else {
            Vec::new()
        };
        patterns.extend(extra_patterns.iter().cloned());
        Ok(Self {
            base: PatternSet::new(&patterns)?,
            use_ignore_file,
        })
    }

    pub fn should_ignore(&self, full_path: &Path, name: &str, dynamic: &PatternSet) -> bool {
        if self.base.is_match(full_path, name) || dynamic.is_match(full_path, name) {
            log::trace!("Ignored by pattern: {}", full_path.display());
            return true;
        }
        if name.starts_with('.') && !HIDDEN_EXEMPTIONS.contains(&name) {
            log::trace!("Ignored hidden entry: {}", full_path.display());
            return true;
        }
        false
    }

    /// Patterns from `root`'s ignore file, or an empty set when the file is
    /// absent or ignore files are disabled.
    pub fn load_dynamic_patterns(&self, root: &Path) -> PatternSet {
        if !self.use_ignore_file {
            return PatternSet::empty();
        }
        let lines = read_ignore_file(&root.join(IGNORE_FILE_NAME));
        if !lines.is_empty() {
            log::info!(
                "Loaded {} pattern(s) from {} in {}",
                lines.len(),
                IGNORE_FILE_NAME,
                root.display()
            );
        }
        PatternSet::lenient(&lines)
    }
}

/// Reads one glob per line, skipping blanks, `#` comments and `!` negations.
pub fn read_ignore_file(path: &Path) -> Vec<String> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            if path.exists() {
                log::warn!("Could not read {}: {}", path.display(), e);
            }
            return Vec::new();
        }
    };
    String::from_utf8_lossy(&bytes)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter(|line| {
            if line.starts_with('!') {
                log::debug!("Negated ignore pattern not supported, skipping: {}", line);
                false
            } else {
                true
            }
        })
        .map(str::to_string)
        .collect()
}
