use codedump_core::{ChunkOutcome, ExtractionOutcome, SecretFinding};
use colored::*;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table, presets::UTF8_FULL};
use std::path::Path;

pub fn print_extraction_summary(outcome: &ExtractionOutcome, quiet: bool) {
    if quiet {
        return;
    }
    println!();
    println!("{}", " Extraction Summary ".green().bold().underline());
    println!(
        "{:<20} {}",
        "Files extracted:".green(),
        outcome.extracted_count.to_string().cyan()
    );
    println!(
        "{:<20} {}",
        "Total files:".green(),
        outcome.stats.total_files.to_string().cyan()
    );
    println!(
        "{:<20} {}",
        "Code files:".green(),
        outcome.stats.code_files.to_string().cyan()
    );
    println!(
        "{:<20} {}",
        "Directories:".green(),
        outcome.stats.total_dirs.to_string().cyan()
    );

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Format").fg(Color::Green),
        Cell::new("File").fg(Color::Green),
    ]);
    for (format, path) in &outcome.written {
        table.add_row(vec![
            Cell::new(format.extension().to_uppercase()).set_alignment(CellAlignment::Center),
            Cell::new(path.display()).fg(Color::Cyan),
        ]);
    }
    if let Some(path) = &outcome.oneline {
        table.add_row(vec![
            Cell::new("ONELINE").set_alignment(CellAlignment::Center),
            Cell::new(path.display()).fg(Color::Cyan),
        ]);
    }
    println!("{table}");
}

pub fn print_chunk_summary(outcome: &ChunkOutcome, quiet: bool) {
    if quiet {
        return;
    }
    if outcome.written.is_empty() {
        println!("{}", "No readable content to chunk.".yellow());
        return;
    }
    for (chunk, path) in outcome.chunks.iter().zip(&outcome.written) {
        println!(
            "{} Chunk {}/{} ({} files, {} chars) -> {}",
            "📦".blue(),
            chunk.chunk_info.current_part,
            chunk.chunk_info.total_parts,
            chunk.files.len(),
            chunk.content.chars().count(),
            path.display().to_string().dimmed()
        );
    }
}

pub fn print_written(label: &str, path: &Path, quiet: bool) {
    if !quiet {
        println!(
            "{} {}: {}",
            "✅".green(),
            label,
            path.display().to_string().blue()
        );
    }
}

/// Findings go to stderr even with `-q`.
pub fn print_secret_findings(findings: &[SecretFinding]) {
    eprintln!(
        "\n{} {}",
        "⚠️ ".yellow(),
        "Potential secrets or credentials were found:".yellow().bold()
    );
    for finding in findings {
        eprintln!(
            "  - {}:{} {}",
            finding.path.cyan(),
            finding.line,
            finding.excerpt.dimmed()
        );
    }
    eprintln!(
        "{}",
        "Remove these values or the files containing them before sharing the report.".yellow()
    );
}

pub fn print_unconfirmed_warning() {
    eprintln!(
        "{}",
        "No one to confirm in non-interactive mode; writing the output anyway. Review it before sharing.".yellow()
    );
}

pub fn print_forced_warning() {
    eprintln!(
        "{}",
        "Secrets detected but export forced with --force. Be careful with the output.".red()
    );
}
