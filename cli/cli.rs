mod cli_args;
mod commands;
mod output;
mod prompt;

use anyhow::{Context, Result};
use clap::Parser;
use codedump_core::{AppError, Config};
use colored::*;
use log;
use std::env;
use std::process;

use cli_args::{Cli, ConfigOpts};

fn main() {
    let cli_args = Cli::parse();

    setup_logging(cli_args.quiet, cli_args.verbose);

    let quiet = cli_args.quiet;

    log::debug!("CLI args parsed: {:?}", cli_args);

    let exit_code = match run_app(cli_args, quiet) {
        Ok(_) => {
            log::info!("Application finished successfully.");
            0
        }
        Err(e) => {
            let exit_code = exit_code_for(&e);
            // Input and argument problems are always shown, even with -q.
            if !quiet || exit_code == 1 || exit_code == 5 {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
            } else {
                log::error!("Application failed: {:#}", e);
            }
            exit_code
        }
    };
    log::debug!("Exiting with code {}", exit_code);
    process::exit(exit_code);
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<AppError>() {
        Some(AppError::Config(_)) => 1,
        Some(AppError::TomlParse(_)) => 1,
        Some(AppError::Glob(_)) => 1,
        Some(AppError::NothingToExtract(_)) => 1,
        Some(AppError::Io(_)) => 2,
        Some(AppError::FileWrite { .. }) => 2,
        Some(AppError::DirCreation { .. }) => 2,
        Some(AppError::WorkerPool(_)) => 2,
        Some(AppError::Archive(_)) => 2,
        Some(AppError::Chunking(_)) => 3,
        Some(AppError::SecretsDetected(_)) => 4,
        Some(AppError::InvalidArgument(_)) => 5,
        Some(_) => 1,
        None => 1,
    }
}

fn setup_logging(quiet: bool, verbose: u8) {
    let log_level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();
    log::trace!("Logger initialized with level: {:?}", log_level);
}

fn run_app(cli: Cli, quiet: bool) -> Result<()> {
    let config = load_config(&cli.config)?;
    let config = merge_cli_overrides(config, &cli);
    config.validate().context("Invalid configuration after CLI overrides")?;
    commands::extract::handle_extract_command(&cli.paths, &config, cli.output.chunk_size, quiet)
}

fn load_config(opts: &ConfigOpts) -> Result<Config> {
    let cwd = env::current_dir().context("Failed to determine the working directory")?;
    let config_path = Config::resolve_config_path(&cwd, opts.config.as_ref(), opts.no_config)
        .context("Failed to resolve configuration path")?;

    match &config_path {
        Some(path) => Config::load_from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(Config::default()),
    }
}

fn merge_cli_overrides(mut config: Config, cli: &Cli) -> Config {
    log::trace!("Applying CLI overrides to config...");

    if !cli.output.formats.is_empty() {
        config.output.formats = cli.output.formats.clone();
    }
    if let Some(name) = &cli.output.output {
        config.output.base_name = Some(name.clone());
    }
    if let Some(dir) = &cli.output.output_dir {
        config.output.directory = dir.clone();
    }
    if cli.output.oneline {
        config.report.oneline = true;
    }
    if cli.output.zip {
        config.output.archive = true;
    }

    config
        .filters
        .ignore_patterns
        .extend(cli.filters.ignore_patterns.iter().cloned());

    if cli.safety.force {
        config.secrets.force = true;
    }
    if cli.safety.no_secret_scan {
        config.secrets.enabled = false;
    }
    if cli.safety.no_interactive {
        config.report.interactive = false;
    }

    log::trace!("Config after CLI overrides: {:?}", config);
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn cli_flags_override_config_values() {
        let cli = Cli::try_parse_from([
            "codedump",
            ".",
            "--format",
            "md",
            "-o",
            "snap.txt",
            "--ignore-patterns",
            "tests",
            "--force",
            "--no-interactive",
            "--zip",
        ])
        .unwrap();
        let mut config = Config::default();
        config.filters.ignore_patterns = vec!["*.lock".to_string()];

        let merged = merge_cli_overrides(config, &cli);
        assert_eq!(merged.output.formats, vec!["md"]);
        assert_eq!(merged.output.base_name.as_deref(), Some("snap.txt"));
        assert_eq!(merged.filters.ignore_patterns, vec!["*.lock", "tests"]);
        assert!(merged.secrets.force);
        assert!(merged.secrets.enabled);
        assert!(!merged.report.interactive);
        assert!(!merged.report.oneline);
        assert!(merged.output.archive);
    }

    #[test]
    fn exit_codes_follow_error_kind() {
        let code = |e: AppError| exit_code_for(&anyhow::Error::from(e));
        assert_eq!(code(AppError::NothingToExtract("x".into())), 1);
        assert_eq!(code(AppError::Io(io::Error::other("x"))), 2);
        assert_eq!(code(AppError::Chunking("x".into())), 3);
        assert_eq!(code(AppError::SecretsDetected(2)), 4);
        assert_eq!(code(AppError::InvalidArgument("x".into())), 5);
        let wrapped = anyhow::Error::from(AppError::SecretsDetected(1)).context("while extracting");
        assert_eq!(exit_code_for(&wrapped), 4);
        assert_eq!(exit_code_for(&anyhow::anyhow!("plain")), 1);
    }
}
