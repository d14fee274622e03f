//! Batch command - translate every Python file under a directory.
//!
//! Each file gets its own translation context, so files run in parallel
//! when `[batch] parallel` is on. A failing file is reported and skipped;
//! it never stops the rest of the batch.

use super::translate_source;
use crate::config::CinderConfig;
use anyhow::Context as _;
use cinder_emit::CWriter;
use cinder_syntax::Reader;
use clap::Args;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Batch command arguments
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Directory to scan for .py files
    pub dir: PathBuf,

    /// Output directory (next to each input if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Generated files.
    pub translated: Vec<PathBuf>,
    /// One `path:line:column: message` line per failed input.
    pub failed: Vec<String>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Python files under `dir`, in a stable order.
fn find_inputs(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "py"))
        .collect()
}

/// Where the translation of `input` goes.
fn output_path(input: &Path, dir: &Path, out_dir: Option<&Path>, extension: &str) -> PathBuf {
    match out_dir {
        Some(out_dir) => {
            let relative = input
                .strip_prefix(dir)
                .unwrap_or_else(|_| Path::new(input.file_name().unwrap_or_default()));
            out_dir.join(relative).with_extension(extension)
        }
        None => input.with_extension(extension),
    }
}

enum Outcome {
    Translated(PathBuf),
    Failed(String),
}

fn translate_one(
    input: &Path,
    output: PathBuf,
    reader: &dyn Reader,
    writer: &CWriter,
) -> anyhow::Result<Outcome> {
    let source = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;

    let c = match translate_source(&source, reader, writer) {
        Ok(c) => c,
        Err(err) => {
            let line = err.diagnostic(input);
            tracing::warn!("{line}");
            return Ok(Outcome::Failed(line));
        }
    };

    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(&output, c).with_context(|| format!("failed to write {}", output.display()))?;
    tracing::info!(input = %input.display(), output = %output.display(), "translated");
    Ok(Outcome::Translated(output))
}

pub fn run(args: &BatchArgs, config: &CinderConfig) -> anyhow::Result<BatchReport> {
    if !args.dir.is_dir() {
        anyhow::bail!("{} is not a directory", args.dir.display());
    }
    let reader = cinder_syntax::reader_for_language("python")
        .context("this build has no Python reader")?;
    let writer = CWriter::new(config.emit_options());
    let inputs = find_inputs(&args.dir);
    tracing::info!(count = inputs.len(), dir = %args.dir.display(), "translating directory");

    let job = |input: &PathBuf| {
        let output = output_path(input, &args.dir, args.output.as_deref(), config.extension());
        // I/O failures count against the file, like translation failures.
        translate_one(input, output, reader, &writer)
            .unwrap_or_else(|err| Outcome::Failed(format!("{}: {err:#}", input.display())))
    };
    let outcomes: Vec<Outcome> = if config.parallel() {
        inputs.par_iter().map(job).collect()
    } else {
        inputs.iter().map(job).collect()
    };

    let mut report = BatchReport::default();
    for outcome in outcomes {
        match outcome {
            Outcome::Translated(path) => report.translated.push(path),
            Outcome::Failed(line) => report.failed.push(line),
        }
    }
    Ok(report)
}
