use super::{REPORT_TITLE, ReportFormat, ReportRenderer, extracted_summary};
use crate::error::Result;
use crate::report::ReportModel;

const STYLE: &str = "body{font-family:sans-serif;line-height:1.6;margin:2em;} \
pre{background-color:#f4f4f4;padding:1em;border-radius:5px;white-space:pre-wrap;word-wrap:break-word;} \
h3{border-bottom:1px solid #ccc;padding-bottom:5px;}";

#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn joined_escaped(values: &[String]) -> String {
    escape_html(&values.join(", "))
}

impl ReportRenderer for HtmlRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Html
    }

    fn render(&self, report: &ReportModel) -> Result<String> {
        let header = &report.header;
        let stats = &header.stats;

        let mut summary = format!(
            "<b>Extraction date:</b> {}<br><b>System:</b> {}<br>",
            escape_html(&header.date),
            escape_html(&header.system)
        );
        if !header.projects.is_empty() {
            summary.push_str(&format!(
                "<b>Projects/Directories:</b> {}<br>",
                joined_escaped(&header.projects)
            ));
        }
        if !header.direct_files.is_empty() {
            summary.push_str(&format!(
                "<b>Direct files:</b> {}<br>",
                joined_escaped(&header.direct_files)
            ));
        }
        summary.push_str(&format!(
            "<b>Analyzed paths:</b> {}",
            joined_escaped(&header.paths)
        ));

        let mut html = vec![
            "<!DOCTYPE html>".to_string(),
            format!(
                "<html><head><meta charset=\"utf-8\"><title>{}</title>",
                REPORT_TITLE
            ),
            format!("<style>{}</style>", STYLE),
            "</head><body>".to_string(),
            format!("<h1>{}</h1>", REPORT_TITLE),
            format!("<p>{}</p>", summary),
            format!(
                "<h2>Statistics</h2><ul><li>Total directories: {}</li><li>Total files: {}</li><li>Code files: {}</li></ul>",
                stats.total_dirs, stats.total_files, stats.code_files
            ),
            "<h2>Project structure</h2>".to_string(),
            format!("<pre>{}</pre>", escape_html(&report.structure_string)),
            "<h2>Code file contents</h2>".to_string(),
        ];

        for block in &report.files {
            html.push(format!(
                "<h3>File: <code>{}</code></h3>",
                escape_html(&block.path)
            ));
            html.push(format!(
                "<pre><code>{}</code></pre>",
                escape_html(&block.content)
            ));
        }

        html.push(format!(
            "<p>{}<br>Extraction completed on {}</p>",
            extracted_summary(report.extracted_count),
            escape_html(&header.date)
        ));
        html.push("</body></html>".to_string());
        Ok(html.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures::sample_report;

    #[test]
    fn escapes_the_five_special_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn file_contents_cannot_inject_markup() {
        let output = HtmlRenderer.render(&sample_report()).unwrap();
        assert!(!output.contains("<script>"));
        assert!(output.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(output.contains("print(&quot;a &lt; b &amp;&amp; c&quot;)"));
        assert!(output.contains("echo &#x27;hi&#x27;"));
    }

    #[test]
    fn page_is_standalone_with_headings() {
        let output = HtmlRenderer.render(&sample_report()).unwrap();
        assert!(output.starts_with("<!DOCTYPE html>"));
        assert!(output.trim_end().ends_with("</body></html>"));
        assert!(output.contains("<h3>File: <code>web/index.html</code></h3>"));
        assert!(output.contains("<li>Total files: 3</li>"));
        assert!(output.contains("3 files extracted successfully"));
    }

    #[test]
    fn header_values_are_escaped() {
        let mut report = sample_report();
        report.header.projects = vec!["a<b>".to_string()];
        let output = HtmlRenderer.render(&report).unwrap();
        assert!(output.contains("<b>Projects/Directories:</b> a&lt;b&gt;<br>"));
    }
}
