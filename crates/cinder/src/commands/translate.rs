//! Translate command - one Python file (or syntax tree) to C.

use super::{SourceFormat, is_stdin, read_input, select_reader, translate_source};
use crate::config::CinderConfig;
use anyhow::Context as _;
use cinder_emit::CWriter;
use clap::Args;
use std::io::Write;
use std::path::PathBuf;

/// Translate command arguments
#[derive(Args, Debug)]
pub struct TranslateArgs {
    /// Input file, use - for stdin
    pub input: PathBuf,

    /// Input format (detected from the extension otherwise)
    #[arg(short, long)]
    pub from: Option<SourceFormat>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &TranslateArgs, config: &CinderConfig) -> anyhow::Result<()> {
    let source = read_input(&args.input)?;
    let reader = select_reader(&args.input, args.from)?;
    let writer = CWriter::new(config.emit_options());

    let display_path = if is_stdin(&args.input) {
        PathBuf::from("<stdin>")
    } else {
        args.input.clone()
    };
    let c = translate_source(&source, reader, &writer)
        .map_err(|err| anyhow::anyhow!(err.diagnostic(&display_path)))?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &c)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(input = %display_path.display(), output = %path.display(), "translated");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(c.as_bytes())
                .and_then(|()| stdout.flush())
                .context("failed to write stdout")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_translate_to_file() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("prog.py");
        let output = dir.path().join("prog.c");
        std::fs::write(&input, "x: int = 5\n").unwrap();

        let args = TranslateArgs {
            input,
            from: None,
            output: Some(output.clone()),
        };
        run(&args, &CinderConfig::default()).unwrap();
        assert_eq!(std::fs::read_to_string(output).unwrap(), "int x = 5;\n");
    }

    #[test]
    fn test_failure_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("bad.py");
        let output = dir.path().join("bad.c");
        std::fs::write(&input, "x = 1\nfor i in y:\n    pass\n").unwrap();

        let args = TranslateArgs {
            input,
            from: None,
            output: Some(output.clone()),
        };
        let err = run(&args, &CinderConfig::default()).unwrap_err();
        assert!(err.to_string().ends_with("bad.py:2:0: unknown node: for_statement"));
        assert!(!output.exists());
    }
}
