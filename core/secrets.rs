//! Pattern scan for credentials in loaded file contents, run before anything
//! is written to disk.

use crate::loader::FileBlock;
use log;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

const SECRET_PATTERNS: [&str; 5] = [
    r#"(?i)(api[_-]?key|secret|token|password|passwd|pwd)["'\s:=]+[\w\-+/=]{8,}"#,
    r#"(?i)aws[_-]?secret[_-]?access[_-]?key["'\s:=]+[\w\-+/=]{8,}"#,
    r"(?i)ghp_[0-9a-zA-Z]{36,}",
    r"(?i)sk_live_[0-9a-zA-Z]{24,}",
    r"(?i)AIza[0-9A-Za-z\-_]{35,}",
];

/// Visible characters kept at the start of a masked excerpt.
const VISIBLE_PREFIX: usize = 6;

static SECRET_REGEXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    SECRET_PATTERNS
        .iter()
        .filter_map(|pattern| match Regex::new(pattern) {
            Ok(re) => Some(re),
            Err(e) => {
                log::error!("Secret pattern {} failed to compile: {}", pattern, e);
                None
            }
        })
        .collect()
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecretFinding {
    pub path: String,
    pub line: usize,
    pub excerpt: String,
}

/// Keeps a short prefix so the user can locate the match without the report
/// repeating the secret.
pub fn mask_excerpt(matched: &str) -> String {
    let visible: String = matched.chars().take(VISIBLE_PREFIX).collect();
    if matched.chars().count() <= VISIBLE_PREFIX {
        return "*".repeat(matched.chars().count());
    }
    format!("{}***", visible)
}

pub fn scan_content(path: &str, content: &str) -> Vec<SecretFinding> {
    let mut findings = Vec::new();
    for (index, line) in content.lines().enumerate() {
        for re in SECRET_REGEXES.iter() {
            for m in re.find_iter(line) {
                log::trace!("Secret pattern matched in {}:{}", path, index + 1);
                findings.push(SecretFinding {
                    path: path.to_string(),
                    line: index + 1,
                    excerpt: mask_excerpt(m.as_str()),
                });
            }
        }
    }
    findings
}

/// Scans readable blocks in order; unreadable sentinels are skipped.
pub fn scan_blocks(blocks: &[FileBlock]) -> Vec<SecretFinding> {
    let findings: Vec<SecretFinding> = blocks
        .iter()
        .filter(|block| block.is_readable())
        .flat_map(|block| scan_content(&block.path, &block.content))
        .collect();
    if !findings.is_empty() {
        log::warn!("{} potential secret(s) found", findings.len());
    }
    findings
}
