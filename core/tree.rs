use crate::collect::is_code_file;
use crate::ignore_rules::{IgnoreFilter, PatternSet};
use log;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::ops::AddAssign;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TreeStats {
    pub total_files: usize,
    pub total_dirs: usize,
    pub code_files: usize,
}

impl AddAssign for TreeStats {
    fn add_assign(&mut self, other: Self) {
        self.total_files += other.total_files;
        self.total_dirs += other.total_dirs;
        self.code_files += other.code_files;
    }
}

/// Summary of one directory. `stats` covers the whole subtree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeNode {
    pub files: Vec<String>,
    pub dirs: BTreeMap<String, TreeNode>,
    pub stats: TreeStats,
    /// Set when the directory listing failed; whatever was read is kept.
    pub error: Option<String>,
}

/// Serializable `{name, type, children}` projection of a tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructureEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<StructureEntry>>,
}

impl StructureEntry {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            node_type: "file".to_string(),
            children: None,
        }
    }

    pub fn directory(name: impl Into<String>, children: Vec<StructureEntry>) -> Self {
        Self {
            name: name.into(),
            node_type: "directory".to_string(),
            children: Some(children),
        }
    }
}

/// Builds the summary for `dir`. Symlinked directories are listed but not
/// descended into.
pub fn build_tree(dir: &Path, filter: &IgnoreFilter, dynamic: &PatternSet) -> TreeNode {
    let mut node = TreeNode::default();

    let mut entries: Vec<(String, PathBuf)> = match fs::read_dir(dir) {
        Ok(read_dir) => read_dir
            .filter_map(|entry| match entry {
                Ok(entry) => Some((
                    entry.file_name().to_string_lossy().into_owned(),
                    entry.path(),
                )),
                Err(e) => {
                    log::warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                    None
                }
            })
            .collect(),
        Err(e) => {
            log::warn!("Could not list {}: {}", dir.display(), e);
            node.error = Some(e.to_string());
            return node;
        }
    };
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    for (name, path) in entries {
        if filter.should_ignore(&path, &name, dynamic) {
            continue;
        }
        if path.is_file() {
            node.stats.total_files += 1;
            if is_code_file(&path) {
                node.stats.code_files += 1;
            }
            node.files.push(name);
        } else if path.is_dir() {
            let child = if path.is_symlink() {
                log::debug!("Not descending into symlinked directory: {}", path.display());
                TreeNode::default()
            } else {
                build_tree(&path, filter, dynamic)
            };
            node.stats.total_dirs += 1;
            node.stats += child.stats;
            node.dirs.insert(name, child);
        }
    }
    node
}

impl TreeNode {
    /// Connector-drawn listing: directories and files interleaved by name,
    /// directories suffixed with `/`. Deterministic for a given tree.
    pub fn render(&self) -> String {
        let mut lines = Vec::new();
        self.render_into("", &mut lines);
        lines.join("\n")
    }

    fn render_into(&self, prefix: &str, lines: &mut Vec<String>) {
        let mut items: Vec<&str> = self
            .dirs
            .keys()
            .map(String::as_str)
            .chain(self.files.iter().map(String::as_str))
            .collect();
        items.sort_unstable();

        let count = items.len();
        for (i, name) in items.into_iter().enumerate() {
            let is_last = i + 1 == count;
            let connector = if is_last { "└── " } else { "├── " };
            match self.dirs.get(name) {
                Some(child) => {
                    let marker = if child.error.is_some() { " [unreadable]" } else { "" };
                    lines.push(format!("{}{}{}/{}", prefix, connector, name, marker));
                    let next_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
                    child.render_into(&next_prefix, lines);
                }
                None => lines.push(format!("{}{}{}", prefix, connector, name)),
            }
        }
    }

    pub fn to_entries(&self) -> Vec<StructureEntry> {
        let mut entries: Vec<StructureEntry> = self
            .dirs
            .iter()
            .map(|(name, child)| StructureEntry::directory(name.clone(), child.to_entries()))
            .chain(self.files.iter().map(|name| StructureEntry::file(name.clone())))
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }
}
