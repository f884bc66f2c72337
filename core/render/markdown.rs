use super::{REPORT_TITLE, ReportFormat, ReportRenderer, extracted_summary};
use crate::error::Result;
use crate::report::ReportModel;
use std::path::Path;

const MIN_FENCE_LEN: usize = 3;

#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

fn longest_backtick_run(text: &str) -> usize {
    text.split(|c| c != '`').map(str::len).max().unwrap_or(0)
}

/// A backtick fence strictly longer than any run inside `content`.
pub fn fence_for(content: &str) -> String {
    "`".repeat((longest_backtick_run(content) + 1).max(MIN_FENCE_LEN))
}

/// Inline code span that survives backticks in `text`. A leading or trailing
/// backtick needs a space of padding, which renderers strip again.
pub fn inline_code(text: &str) -> String {
    let ticks = "`".repeat(longest_backtick_run(text) + 1);
    if text.starts_with('`') || text.ends_with('`') {
        format!("{ticks} {text} {ticks}")
    } else {
        format!("{ticks}{text}{ticks}")
    }
}

/// Language hint taken from the file extension; empty when there is none.
pub fn language_hint(path: &str) -> &str {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
}

fn fenced(content: &str, hint: &str) -> String {
    let fence = fence_for(content);
    let body = content.strip_suffix('\n').unwrap_or(content);
    format!("{fence}{hint}\n{body}\n{fence}\n")
}

impl ReportRenderer for MarkdownRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Markdown
    }

    fn render(&self, report: &ReportModel) -> Result<String> {
        let header = &report.header;
        let mut parts = vec![
            format!("# {}\n", REPORT_TITLE),
            format!("**Extraction date**: {}\n", header.date),
            format!("**System**: {}\n", header.system),
        ];
        if !header.projects.is_empty() {
            parts.push(format!("**Projects/Directories**: {}\n", header.projects.join(", ")));
        }
        if !header.direct_files.is_empty() {
            parts.push(format!("**Direct files**: {}\n", header.direct_files.join(", ")));
        }
        parts.push(format!("**Analyzed paths**: {}\n", header.paths.join(", ")));

        parts.push("## Statistics\n".to_string());
        parts.push(format!("- Total directories: {}", header.stats.total_dirs));
        parts.push(format!("- Total files: {}", header.stats.total_files));
        parts.push(format!("- Code files: {}\n", header.stats.code_files));

        parts.push("## Project structure\n".to_string());
        parts.push(fenced(&report.structure_string, ""));

        parts.push("## Code file contents\n".to_string());
        for block in &report.files {
            parts.push(format!("**File: {}**\n", inline_code(&block.path)));
            parts.push(fenced(&block.content, language_hint(&block.path)));
        }

        parts.push(format!("{}\n", extracted_summary(report.extracted_count)));
        parts.push(format!("Extraction completed on {}\n", header.date));
        Ok(parts.join("\n"))
    }
}
