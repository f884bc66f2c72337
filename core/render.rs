pub mod html;
pub mod json;
pub mod markdown;
pub mod text;

use crate::error::{AppError, Result};
use crate::report::ReportModel;
use log;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

pub const REPORT_TITLE: &str = "Codebase Extraction Report";

/// Shared footer sentence; every format embeds the same count.
pub fn extracted_summary(count: usize) -> String {
    format!("{} files extracted successfully", count)
}

pub trait ReportRenderer: Send + Sync {
    fn format(&self) -> ReportFormat;

    fn extension(&self) -> &'static str {
        self.format().extension()
    }

    /// Serializes the report. Renderers never touch the filesystem.
    fn render(&self, report: &ReportModel) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Text,
    Json,
    Markdown,
    Html,
}

impl ReportFormat {
    pub const ALL: [ReportFormat; 4] = [
        ReportFormat::Text,
        ReportFormat::Json,
        ReportFormat::Markdown,
        ReportFormat::Html,
    ];

    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
            ReportFormat::Markdown => "md",
            ReportFormat::Html => "html",
        }
    }

    pub fn renderer(self) -> Box<dyn ReportRenderer> {
        match self {
            ReportFormat::Text => Box::new(text::TextRenderer),
            ReportFormat::Json => Box::new(json::JsonRenderer),
            ReportFormat::Markdown => Box::new(markdown::MarkdownRenderer),
            ReportFormat::Html => Box::new(html::HtmlRenderer),
        }
    }

    /// Parses names that may themselves be comma-separated lists. Unknown
    /// names are skipped with a warning; duplicates keep their first position.
    pub fn parse_list<S: AsRef<str>>(raw: &[S]) -> Result<Vec<ReportFormat>> {
        let mut formats = Vec::new();
        for name in raw.iter().flat_map(|r| r.as_ref().split(',')) {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            match name.parse::<ReportFormat>() {
                Ok(format) if !formats.contains(&format) => formats.push(format),
                Ok(_) => {}
                Err(e) => log::warn!("{}", e),
            }
        }
        if formats.is_empty() {
            return Err(AppError::InvalidArgument(
                "No valid output format given (expected txt, json, md or html)".to_string(),
            ));
        }
        Ok(formats)
    }
}

impl FromStr for ReportFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "txt" | "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            "md" | "markdown" => Ok(ReportFormat::Markdown),
            "html" | "htm" => Ok(ReportFormat::Html),
            other => Err(AppError::InvalidArgument(format!(
                "Unknown report format: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Renders `report` in each format, in the order given.
pub fn render_all(report: &ReportModel, formats: &[ReportFormat]) -> Result<Vec<(ReportFormat, String)>> {
    formats
        .iter()
        .map(|format| {
            log::info!("Rendering format: {}", format.extension().to_uppercase());
            let renderer = format.renderer();
            Ok((*format, renderer.render(report)?))
        })
        .collect()
}
