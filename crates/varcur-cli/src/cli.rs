//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "varcur",
    version,
    about = "Inspect variant curation drafts, ACMG codes and import jobs",
    long_about = "Offline tooling around the variant curation state library.\n\n\
                  Normalises allele drafts against backend documents, walks ACMG\n\
                  strength orderings and parses pasted VCF, SeqPilot or HGVS text\n\
                  into import payloads."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Configuration file (TOML, or the backend's JSON config document).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show classification options and ACMG strength orderings.
    Config,

    /// Parse pasted import text and build import payloads.
    Import(ImportArgs),

    /// Show how ACMG codes upgrade and downgrade.
    Acmg(AcmgArgs),

    /// Normalise an allele draft and show its finalize payload.
    State(StateArgs),
}

#[derive(Parser)]
pub struct ImportArgs {
    /// File with pasted text; `-` reads stdin.
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Genepanel as NAME:VERSION.
    #[arg(long = "genepanel", value_name = "NAME:VERSION")]
    pub genepanel: Option<String>,

    #[arg(long = "type", value_enum, default_value = "variants")]
    pub import_type: ImportTypeArg,

    #[arg(long = "mode", value_enum, default_value = "create")]
    pub mode: ModeArg,

    /// Name of the analysis to create or append to.
    #[arg(long = "analysis-name", value_name = "NAME")]
    pub analysis_name: Option<String>,

    /// Id of the existing analysis when appending.
    #[arg(long = "analysis-id", value_name = "ID")]
    pub analysis_id: Option<i64>,

    #[arg(long = "technology", value_enum, default_value = "hts")]
    pub technology: TechnologyArg,

    #[arg(long = "priority", default_value_t = 1)]
    pub priority: u8,

    /// Print only the payloads as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct AcmgArgs {
    /// Codes such as PM2, PSxPM2 or BS1.
    #[arg(value_name = "CODE", required = true)]
    pub codes: Vec<String>,
}

#[derive(Parser)]
pub struct StateArgs {
    /// Allele document as returned by the backend.
    #[arg(value_name = "ALLELE_JSON")]
    pub allele: PathBuf,

    /// Existing draft; an empty draft is used when omitted.
    #[arg(value_name = "STATE_JSON")]
    pub state: Option<PathBuf>,

    /// User id put on fresh assessments in the finalize payload.
    #[arg(long = "user-id", default_value_t = 1)]
    pub user_id: i64,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ImportTypeArg {
    Variants,
    Analysis,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Create,
    Append,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum TechnologyArg {
    Hts,
    Sanger,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
