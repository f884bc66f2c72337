use crate::collect::is_code_file;
use crate::loader::FileBlock;
use crate::paths::{ResolvedTargets, display_name};
use crate::tree::{StructureEntry, TreeNode, TreeStats};
use log;
use serde::Serialize;
use std::path::PathBuf;

/// Tree summary of one clean directory root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorySummary {
    pub root: PathBuf,
    pub tree: TreeNode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportHeader {
    pub projects: Vec<String>,
    pub direct_files: Vec<String>,
    pub paths: Vec<String>,
    pub date: String,
    pub system: String,
    pub stats: TreeStats,
}

/// Everything a renderer needs for one run. Built once, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportModel {
    pub header: ReportHeader,
    pub structure_string: String,
    pub structure_tree: Vec<StructureEntry>,
    pub files: Vec<FileBlock>,
    pub extracted_count: usize,
}

impl ReportModel {
    /// Pure aggregation; `files` must already be sorted by path.
    pub fn assemble(
        targets: &ResolvedTargets,
        summaries: &[DirectorySummary],
        files: Vec<FileBlock>,
        date: String,
        system: String,
    ) -> Self {
        let mut stats = TreeStats::default();
        let mut structure_parts = Vec::new();
        let mut structure_tree = Vec::new();

        for summary in summaries {
            let name = display_name(&summary.root);
            let rendered = summary.tree.render();
            if rendered.is_empty() {
                structure_parts.push(format!("{}/", name));
            } else {
                structure_parts.push(format!("{}/\n{}", name, rendered));
            }
            structure_tree.push(StructureEntry::directory(
                name,
                summary.tree.to_entries(),
            ));
            stats += summary.tree.stats;
        }

        for file in &targets.files {
            let name = display_name(file);
            structure_parts.push(format!("{} (direct file)", name));
            structure_tree.push(StructureEntry::file(name));
            stats.total_files += 1;
            if is_code_file(file) {
                stats.code_files += 1;
            }
        }

        let header = ReportHeader {
            projects: targets.directories.iter().map(|d| display_name(d)).collect(),
            direct_files: targets.files.iter().map(|f| display_name(f)).collect(),
            paths: targets
                .requested
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect(),
            date,
            system,
            stats,
        };
        let extracted_count = files.len();
        log::debug!(
            "Report assembled: {} file block(s), stats {:?}",
            extracted_count,
            stats
        );
        ReportModel {
            header,
            structure_string: structure_parts.join("\n"),
            structure_tree,
            files,
            extracted_count,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::loader::BlockStatus;

    /// Hand-built model shared by the renderer tests.
    pub fn sample_report() -> ReportModel {
        ReportModel {
            header: ReportHeader {
                projects: vec!["demo".to_string()],
                direct_files: vec!["setup.sh".to_string()],
                paths: vec!["/work/demo".to_string(), "/work/setup.sh".to_string()],
                date: "2026-10-19 09:30:00".to_string(),
                system: "linux x86_64".to_string(),
                stats: TreeStats {
                    total_files: 3,
                    total_dirs: 1,
                    code_files: 3,
                },
            },
            structure_string: "demo/\n├── main.py\n└── web/\n    └── index.html\nsetup.sh (direct file)"
                .to_string(),
            structure_tree: vec![
                StructureEntry::directory(
                    "demo",
                    vec![
                        StructureEntry::file("main.py"),
                        StructureEntry::directory("web", vec![StructureEntry::file("index.html")]),
                    ],
                ),
                StructureEntry::file("setup.sh"),
            ],
            files: vec![
                FileBlock {
                    path: "main.py".to_string(),
                    content: "print(\"a < b && c\")\n".to_string(),
                    status: BlockStatus::Complete,
                },
                FileBlock {
                    path: "setup.sh".to_string(),
                    content: "echo 'hi'".to_string(),
                    status: BlockStatus::Complete,
                },
                FileBlock {
                    path: "web/index.html".to_string(),
                    content: "<script>alert(1)</script>\n```\nfenced\n```".to_string(),
                    status: BlockStatus::Complete,
                },
            ],
            extracted_count: 3,
        }
    }
}
