//! Dump command - print the syntax tree as JSON.
//!
//! The output is accepted back by `translate --from json`, so another
//! parser can stand in for the built-in one.

use super::{SourceFormat, read_input, select_reader};
use anyhow::Context as _;
use clap::Args;
use std::path::PathBuf;

/// Dump command arguments
#[derive(Args, Debug)]
pub struct DumpArgs {
    /// Input file, use - for stdin
    pub input: PathBuf,

    /// Input format (detected from the extension otherwise)
    #[arg(short, long)]
    pub from: Option<SourceFormat>,
}

pub fn render(args: &DumpArgs) -> anyhow::Result<String> {
    let source = read_input(&args.input)?;
    let reader = select_reader(&args.input, args.from)?;
    let module = reader
        .read(&source)
        .with_context(|| format!("failed to parse {}", args.input.display()))?;
    Ok(module.to_json()?)
}

pub fn run(args: &DumpArgs) -> anyhow::Result<()> {
    println!("{}", render(args)?);
    Ok(())
}
