//! Command-line front end for the cinder translator.
//!
//! Glue only: config layering, logging setup, and file handling around
//! [`cinder_syntax`] (parsing) and [`cinder_emit`] (C generation).

pub mod commands;
pub mod config;
pub mod logging;

use anyhow::Context as _;
use clap::{ArgAction, Parser, Subcommand};
use commands::batch::BatchArgs;
use commands::dump::DumpArgs;
use commands::translate::TranslateArgs;
use config::CinderConfig;
use std::path::PathBuf;

/// Translate a restricted Python subset to C
#[derive(Parser, Debug)]
#[command(name = "cinder", version, about)]
pub struct Cli {
    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file applied on top of the global and project configs
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Translate one file to C
    Translate(TranslateArgs),
    /// Translate every .py file under a directory
    Batch(BatchArgs),
    /// Print the parsed syntax tree as JSON
    Dump(DumpArgs),
}

/// Run a parsed command line; returns the process exit code.
pub fn run(cli: Cli) -> anyhow::Result<i32> {
    let root = std::env::current_dir().context("cannot determine working directory")?;
    let config = CinderConfig::load(&root, cli.config.as_deref())?;

    match cli.command {
        Command::Translate(args) => {
            commands::translate::run(&args, &config)?;
            Ok(0)
        }
        Command::Batch(args) => {
            let report = commands::batch::run(&args, &config)?;
            for line in &report.failed {
                eprintln!("{line}");
            }
            eprintln!(
                "translated {} of {} files",
                report.translated.len(),
                report.translated.len() + report.failed.len()
            );
            Ok(if report.is_success() { 0 } else { 1 })
        }
        Command::Dump(args) => {
            commands::dump::run(&args)?;
            Ok(0)
        }
    }
}
