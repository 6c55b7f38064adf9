//! `varcur` command line.

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::Path;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

use varcur_cli::commands::{
    ImportOptions, load_app_config, parse_genepanel, run_acmg, run_config, run_import, run_state,
};
use varcur_cli::logging::{LogConfig, LogFormat, init_logging};
use varcur_ingest::{CreateOrAppend, ImportType, Technology};

mod cli;

use crate::cli::{
    Cli, Command, ImportArgs, ImportTypeArg, LogFormatArg, LogLevelArg, ModeArg, StateArgs,
    TechnologyArg,
};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> Result<i32> {
    let config = load_app_config(cli.config.as_deref())?;
    match &cli.command {
        Command::Config => {
            println!("{}", run_config(&config));
            Ok(0)
        }
        Command::Acmg(args) => {
            println!("{}", run_acmg(&args.codes, &config));
            Ok(0)
        }
        Command::Import(args) => {
            let text = read_input(&args.input)?;
            let outcome = run_import(&text, &import_options(args)?)?;
            println!("{}", outcome.output);
            Ok(if outcome.complete { 0 } else { 2 })
        }
        Command::State(args) => {
            println!("{}", state_output(args, &config)?);
            Ok(0)
        }
    }
}

fn state_output(args: &StateArgs, config: &varcur_config::AppConfig) -> Result<String> {
    let allele = read_input(&args.allele)?;
    let state = args.state.as_deref().map(read_input).transpose()?;
    run_state(&allele, state.as_deref(), args.user_id, config)
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("read stdin")?;
        return Ok(text);
    }
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}

fn import_options(args: &ImportArgs) -> Result<ImportOptions> {
    Ok(ImportOptions {
        import_type: match args.import_type {
            ImportTypeArg::Variants => ImportType::Variants,
            ImportTypeArg::Analysis => ImportType::Analysis,
        },
        mode: match args.mode {
            ModeArg::Create => CreateOrAppend::Create,
            ModeArg::Append => CreateOrAppend::Append,
        },
        technology: match args.technology {
            TechnologyArg::Hts => Technology::Hts,
            TechnologyArg::Sanger => Technology::Sanger,
        },
        genepanel: args.genepanel.as_deref().map(parse_genepanel).transpose()?,
        analysis_name: args.analysis_name.clone(),
        analysis_id: args.analysis_id,
        priority: args.priority,
        json: args.json,
    })
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
