mod cli;
mod cmd;
mod config;
mod error;
mod format;
mod io;

use std::time::Instant;

use clap::Parser;

pub use cli::{Cli, Command, OutputFormat, PathOrStdin};

use crate::error::CliError;
use crate::format::{FormatterConfig, write_timing};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        // Verdict mismatches are already reported on stdout.
        if !matches!(e, CliError::VerdictNotPass { .. }) || !cli.quiet {
            eprintln!("{}", e.message());
        }
        std::process::exit(e.exit_code());
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let config = FormatterConfig::from_flags(cli.format, cli.no_color, cli.quiet, cli.verbose);
    let shape = config::load_shape(cli.shape.as_deref(), cli.max_file_size)?;
    let started = Instant::now();

    let label = match &cli.command {
        Command::Hash { file } => {
            let content = io::read_input(file, cli.max_file_size)?;
            cmd::hash::run(&content, &file.label(), &shape, cli.format)?;
            "hashed"
        }
        Command::Strip { file, wrappers } => {
            let content = io::read_input(file, cli.max_file_size)?;
            let wrappers = if wrappers.is_empty() {
                &shape.wrapper_tags
            } else {
                wrappers
            };
            cmd::strip::run(&content, &file.label(), wrappers, cli.format)?;
            "stripped"
        }
        Command::Ids { file, root_id } => {
            let content = io::read_input(file, cli.max_file_size)?;
            cmd::ids::run(&content, &file.label(), root_id, &shape, cli.format)?;
            "numbered"
        }
        Command::Rematch { record, new_markup } => {
            let (record_content, markup_content) =
                io::read_pair(record, new_markup, cli.max_file_size)?;
            cmd::rematch::run(
                &record_content,
                &record.label(),
                &markup_content,
                &new_markup.label(),
                &shape,
                &config,
            )?;
            "rematched"
        }
        Command::Verdict { record, report } => {
            let (record_content, report_content) =
                io::read_pair(record, report, cli.max_file_size)?;
            cmd::verdict::run(
                &record_content,
                &record.label(),
                &report_content,
                &report.label(),
                &config,
            )?;
            "classified"
        }
    };

    let stderr = std::io::stderr();
    let mut err = stderr.lock();
    write_timing(&mut err, label, started.elapsed(), &config).map_err(|e| CliError::output(&e))
}
