use crate::output;
use crate::prompt;
use anyhow::{Context, Result};
use codedump_core::{
    self as core, AppError, Config, ExtractionOptions, Extractor, SecretFinding,
    pick_oneline_source, write_oneline_variant,
};
use log;
use std::io;

pub fn handle_extract_command(
    paths: &[String],
    config: &Config,
    chunk_size: Option<usize>,
    quiet: bool,
) -> Result<()> {
    let options = ExtractionOptions::from_config(config).context("Invalid output settings")?;
    let interactive = prompt::is_interactive(config.report.interactive);
    let force = config.secrets.force;
    log::debug!(
        "Extracting {} path(s), formats {:?}, interactive: {}",
        paths.len(),
        options.formats,
        interactive
    );

    let extractor = Extractor::new(options).context("Failed to build ignore rules")?;
    let gate = |findings: &[SecretFinding]| {
        secret_gate(findings, force, interactive, |q| prompt::confirm(q, false))
    };

    if let Some(size) = chunk_size {
        log::info!("Chunking mode with size: {} characters", size);
        let outcome = extractor
            .run_chunked(paths, size, gate)
            .context("Chunked extraction failed")?;
        output::print_chunk_summary(&outcome, quiet);
        return Ok(());
    }

    let outcome = extractor
        .run_with_gate(paths, gate)
        .context("Extraction failed")?;
    output::print_extraction_summary(&outcome, quiet);
    if let Some(path) = &outcome.archive {
        output::print_written("Archive written", path, quiet);
    }

    if outcome.oneline.is_none() && interactive {
        if let Some(source) = pick_oneline_source(&outcome.written) {
            let question = format!(
                "Create a one-line copy of '{}' for LLM prompts?",
                source.display()
            );
            if prompt::confirm(&question, false).context("Failed to read answer")? {
                let path = write_oneline_variant(source)
                    .context("Failed to write the one-line copy")?;
                output::print_written("One-line copy written", &path, quiet);
            }
        }
    }
    Ok(())
}

/// Decides whether an export with secret findings goes ahead. Only an
/// explicit "no" at the prompt stops it.
fn secret_gate<A>(
    findings: &[SecretFinding],
    force: bool,
    interactive: bool,
    ask: A,
) -> core::Result<()>
where
    A: FnOnce(&str) -> io::Result<bool>,
{
    if findings.is_empty() {
        return Ok(());
    }
    output::print_secret_findings(findings);
    if force {
        output::print_forced_warning();
        return Ok(());
    }
    if !interactive {
        output::print_unconfirmed_warning();
        return Ok(());
    }
    if ask("Write the report anyway?")? {
        log::warn!("Continuing despite {} secret finding(s)", findings.len());
        Ok(())
    } else {
        Err(AppError::SecretsDetected(findings.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn finding() -> Vec<SecretFinding> {
        vec![SecretFinding {
            path: "settings.py".to_string(),
            line: 2,
            excerpt: "API_KE***".to_string(),
        }]
    }

    #[test]
    fn declining_the_prompt_cancels_the_export() {
        let err = secret_gate(&finding(), false, true, |_| Ok(false)).unwrap_err();
        assert!(matches!(err, AppError::SecretsDetected(1)));
        assert!(secret_gate(&finding(), false, true, |_| Ok(true)).is_ok());
    }

    #[test]
    fn unattended_and_forced_runs_never_ask() {
        let asked = Cell::new(false);
        let ask = |_: &str| -> io::Result<bool> {
            asked.set(true);
            Ok(false)
        };
        assert!(secret_gate(&finding(), false, false, ask).is_ok());
        assert!(secret_gate(&finding(), true, true, ask).is_ok());
        assert!(secret_gate(&[], false, true, ask).is_ok());
        assert!(!asked.get());
    }
}
