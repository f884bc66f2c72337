use super::{REPORT_TITLE, ReportFormat, ReportRenderer, extracted_summary};
use crate::error::Result;
use crate::loader::FileBlock;
use crate::report::ReportModel;

pub const BLOCK_DELIMITER: &str = " &&& ";
pub const EMPTY_CONTENT_PLACEHOLDER: &str = "[No content read]";

const HEAVY_RULE_WIDTH: usize = 80;
const LIGHT_RULE_WIDTH: usize = 50;
const SECTION_RULE_WIDTH: usize = 30;

/// Plain-text report; the format other tools in this family consume.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

/// `'<path>': [` framed body. Chunk files reuse this layout.
pub fn format_block(block: &FileBlock) -> String {
    let rule = "-".repeat(LIGHT_RULE_WIDTH);
    let content = if block.content.is_empty() {
        EMPTY_CONTENT_PLACEHOLDER
    } else {
        block.content.as_str()
    };
    format!("'{}': [\n{}\n{}\n{}\n]", block.path, rule, content, rule)
}

fn banner(title: &str) -> [String; 3] {
    let rule = "=".repeat(HEAVY_RULE_WIDTH);
    [rule.clone(), title.to_string(), rule]
}

impl ReportRenderer for TextRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Text
    }

    fn render(&self, report: &ReportModel) -> Result<String> {
        let header = &report.header;
        let section_rule = "-".repeat(SECTION_RULE_WIDTH);
        let mut parts: Vec<String> = Vec::new();

        parts.extend(banner(&REPORT_TITLE.to_uppercase()));
        if !header.projects.is_empty() {
            parts.push(format!("Projects/Directories: {}", header.projects.join(", ")));
        }
        if !header.direct_files.is_empty() {
            parts.push(format!("Direct files: {}", header.direct_files.join(", ")));
        }
        parts.push(format!("Analyzed paths: {}", header.paths.join(", ")));
        parts.push(format!("Extraction date: {}", header.date));
        parts.push(format!("System: {}", header.system));

        parts.push(format!("\nPROJECT STATISTICS:\n{}", section_rule));
        parts.push(format!("Total directories: {}", header.stats.total_dirs));
        parts.push(format!("Total files: {}", header.stats.total_files));
        parts.push(format!("Code files: {}", header.stats.code_files));

        parts.push(format!("\nPROJECT STRUCTURE:\n{}", section_rule));
        parts.push(report.structure_string.clone());

        parts.push(String::new());
        parts.extend(banner("CODE FILE CONTENTS"));

        let mut output = parts.join("\n");
        if !report.files.is_empty() {
            let blocks: Vec<String> = report.files.iter().map(format_block).collect();
            output.push_str("\n\n");
            output.push_str(&blocks.join(BLOCK_DELIMITER));
        }

        let mut footer = vec![String::new(), String::new()];
        footer.extend(banner("END OF EXTRACTION"));
        footer.push(extracted_summary(report.extracted_count));
        footer.push(format!("Extraction completed on {}", header.date));
        output.push_str(&footer.join("\n"));
        output.push('\n');
        Ok(output)
    }
}
