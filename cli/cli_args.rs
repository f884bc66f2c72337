use clap::{Args, Parser};
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
pub struct ConfigOpts {
    #[arg(
        long,
        help = "Path of the TOML config file (default: ./codedump.toml when present).",
        value_name = "FILE",
        conflicts_with = "no_config",
        help_heading = "Configuration"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        help = "Do not load any TOML config file.",
        conflicts_with = "config",
        help_heading = "Configuration"
    )]
    pub no_config: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct OutputOpts {
    #[arg(
        short,
        long,
        help = "Base name of the report files; any extension is dropped.",
        value_name = "NAME",
        help_heading = "Output"
    )]
    pub output: Option<String>,

    #[arg(
        long = "format",
        help = "Report formats, comma-separated: txt, json, md, html [default: txt].",
        value_name = "FORMATS",
        value_delimiter = ',',
        help_heading = "Output"
    )]
    pub formats: Vec<String>,

    #[arg(
        long,
        help = "Directory the report files are written to.",
        value_name = "DIR",
        help_heading = "Output"
    )]
    pub output_dir: Option<PathBuf>,

    #[arg(
        long,
        help = "Also write a whitespace-collapsed copy of the txt (or md) report.",
        help_heading = "Output"
    )]
    pub oneline: bool,

    #[arg(
        long,
        help = "Also pack the reports and the extracted files into <NAME>.zip.",
        help_heading = "Output"
    )]
    pub zip: bool,

    #[arg(
        long,
        help = "Split file contents into <NAME>_chunk_<n>.txt files of at most CHARS characters instead of writing a report.",
        value_name = "CHARS",
        help_heading = "Output"
    )]
    pub chunk_size: Option<usize>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterOpts {
    #[arg(
        long,
        help = "Extra ignore globs, comma-separated (e.g. 'tests,*.min.js').",
        value_name = "PATTERNS",
        value_delimiter = ',',
        help_heading = "Filtering"
    )]
    pub ignore_patterns: Vec<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct SafetyOpts {
    #[arg(
        long,
        help = "Write the report even when potential secrets are found.",
        help_heading = "Safety"
    )]
    pub force: bool,

    #[arg(
        long,
        help = "Skip scanning file contents for secrets.",
        help_heading = "Safety"
    )]
    pub no_secret_scan: bool,

    #[arg(
        long,
        help = "Never prompt; unanswered questions take their safe default.",
        help_heading = "Safety"
    )]
    pub no_interactive: bool,
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Snapshot source trees into a single shareable report.",
    long_about = "codedump walks the given directories and files, skips ignored and non-code entries, \nand writes the directory structure plus every file's contents as txt, json, md or html.",
    help_template = "{about-section}\nUsage: {usage}\n\n{all-args}{after-help}",
    after_help = "EXAMPLES:\n  codedump ./api ./web --format txt,md\n  codedump src -o snapshot --oneline\n  codedump . --chunk-size 50000 --output-dir ./chunks",
    arg_required_else_help = true
)]
pub struct Cli {
    #[arg(required = true, value_name = "PATHS", help = "Directories and files to extract.")]
    pub paths: Vec<String>,

    #[command(flatten)]
    pub output: OutputOpts,

    #[command(flatten)]
    pub filters: FilterOpts,

    #[command(flatten)]
    pub safety: SafetyOpts,

    #[command(flatten)]
    pub config: ConfigOpts,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase message verbosity (-v, -vv, -vvv).")]
    pub verbose: u8,

    #[arg(short, long, help = "Silence informational messages and warnings.")]
    pub quiet: bool,
}
