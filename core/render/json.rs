use super::{ReportFormat, ReportRenderer};
use crate::error::{AppError, Result};
use crate::report::{ReportHeader, ReportModel};
use crate::tree::StructureEntry;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileEntry<'a> {
    pub path: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    header: &'a ReportHeader,
    structure_tree: &'a [StructureEntry],
    files: Vec<FileEntry<'a>>,
    extracted_count: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

pub fn serialize_to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(AppError::JsonSerialize)
}

impl ReportRenderer for JsonRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }

    fn render(&self, report: &ReportModel) -> Result<String> {
        let document = JsonReport {
            header: &report.header,
            structure_tree: &report.structure_tree,
            files: report
                .files
                .iter()
                .map(|block| FileEntry {
                    path: &block.path,
                    content: &block.content,
                })
                .collect(),
            extracted_count: report.extracted_count,
        };
        serialize_to_json(&document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures::sample_report;
    use serde_json::Value;

    #[test]
    fn contents_survive_a_parse_unchanged() {
        let report = sample_report();
        let output = JsonRenderer.render(&report).unwrap();
        assert!(output.contains("\n  \"header\""));
        let value: Value = serde_json::from_str(&output).unwrap();

        let files = value["files"].as_array().unwrap();
        assert_eq!(files.len(), report.files.len());
        for (entry, block) in files.iter().zip(&report.files) {
            assert_eq!(entry["path"], block.path.as_str());
            assert_eq!(entry["content"], block.content.as_str());
        }
        assert_eq!(value["extracted_count"], 3);
    }

    #[test]
    fn header_and_tree_are_structured() {
        let value: Value =
            serde_json::from_str(&JsonRenderer.render(&sample_report()).unwrap())
                .unwrap();
        assert_eq!(value["header"]["projects"][0], "demo");
        assert_eq!(value["header"]["stats"]["total_files"], 3);
        assert_eq!(value["header"]["date"], "2026-10-19 09:30:00");
        assert_eq!(value["structure_tree"][0]["type"], "directory");
        assert_eq!(value["structure_tree"][0]["children"][1]["name"], "web");
        assert_eq!(value["structure_tree"][1]["type"], "file");
        assert!(value["structure_tree"][1].get("children").is_none());
    }
}
