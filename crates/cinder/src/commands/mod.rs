//! Subcommands and the translation steps they share.

pub mod batch;
pub mod dump;
pub mod translate;

use anyhow::Context as _;
use cinder_emit::{CWriter, TranslationError};
use cinder_syntax::{Position, ReadError, Reader};
use clap::ValueEnum;
use std::io::Read;
use std::path::Path;

/// Input formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SourceFormat {
    /// Python source
    Python,
    /// Syntax tree as produced by `cinder dump`
    Json,
}

impl SourceFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFormat::Python => "python",
            SourceFormat::Json => "json",
        }
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pick a reader from an explicit format or the input's extension. Stdin
/// without `--from` is read as Python.
pub fn select_reader(
    input: &Path,
    from: Option<SourceFormat>,
) -> anyhow::Result<&'static dyn Reader> {
    let language = match from {
        Some(format) => format.as_str(),
        None if is_stdin(input) => SourceFormat::Python.as_str(),
        None => {
            let ext = input.extension().and_then(|e| e.to_str()).unwrap_or("");
            return cinder_syntax::reader_for_extension(ext).with_context(|| {
                format!(
                    "cannot detect input format of {}; use --from",
                    input.display()
                )
            });
        }
    };
    cinder_syntax::reader_for_language(language)
        .with_context(|| format!("no reader available for {language}"))
}

pub fn is_stdin(input: &Path) -> bool {
    input.as_os_str() == "-"
}

/// Read a file, or stdin for `-`.
pub fn read_input(input: &Path) -> anyhow::Result<String> {
    if is_stdin(input) {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("failed to read {}", input.display()))
    }
}

/// Why one input could not be translated.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error(transparent)]
    Read(#[from] ReadError),

    #[error(transparent)]
    Translate(#[from] TranslationError),
}

impl FileError {
    pub fn position(&self) -> Option<Position> {
        match self {
            FileError::Read(ReadError::Syntax { line, column }) => {
                Some(Position::new(*line, *column))
            }
            FileError::Read(_) => None,
            FileError::Translate(err) => err.position(),
        }
    }

    /// `path:line:column: message`, or `path: message` without a position.
    pub fn diagnostic(&self, path: &Path) -> String {
        match self.position() {
            Some(pos) => format!(
                "{}:{}:{}: {}",
                path.display(),
                pos.line,
                pos.column,
                self.message()
            ),
            None => format!("{}: {}", path.display(), self),
        }
    }

    fn message(&self) -> String {
        match self {
            FileError::Read(ReadError::Syntax { .. }) => "syntax error".to_string(),
            FileError::Read(err) => err.to_string(),
            FileError::Translate(err) => err.message(),
        }
    }
}

/// Parse and translate one source text. Nothing is returned on failure.
pub fn translate_source(
    source: &str,
    reader: &dyn Reader,
    writer: &CWriter,
) -> Result<String, FileError> {
    let module = reader.read(source)?;
    Ok(writer.emit_to_string(&module)?)
}
