//! Configuration for cinder.
//!
//! Layers, later ones winning key by key:
//! 1. Built-in defaults
//! 2. Global: ~/.config/cinder/config.toml (or $XDG_CONFIG_HOME/cinder/)
//! 3. Per-project: .cinder/config.toml
//! 4. The file named by `--config`
//!
//! Example config.toml:
//! ```toml
//! [emit]
//! indent = "\t"
//! untyped = "int"
//!
//! [batch]
//! extension = "h"
//! parallel = false
//! ```

use anyhow::Context as _;
use cinder_emit::EmitOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Emitter settings.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct EmitConfig {
    /// One level of indentation.
    pub indent: Option<String>,
    /// Type written for parameters and returns with no annotation.
    pub untyped: Option<String>,
}

/// Directory translation settings.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BatchConfig {
    /// Extension of generated files, without the dot.
    pub extension: Option<String>,
    /// Translate files on all cores.
    pub parallel: Option<bool>,
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CinderConfig {
    pub emit: EmitConfig,
    pub batch: BatchConfig,
}

impl CinderConfig {
    /// Load configuration for a project rooted at `root`, with an optional
    /// explicit file on top.
    pub fn load(root: &Path, explicit: Option<&Path>) -> anyhow::Result<Self> {
        Self::load_layers(Self::global_config_path().as_deref(), root, explicit)
    }

    fn load_layers(
        global: Option<&Path>,
        root: &Path,
        explicit: Option<&Path>,
    ) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(global) = global {
            if let Some(layer) = Self::load_file(global)? {
                config = config.merge(layer);
            }
        }

        let project_path = root.join(".cinder").join("config.toml");
        if let Some(layer) = Self::load_file(&project_path)? {
            config = config.merge(layer);
        }

        if let Some(path) = explicit {
            let layer = Self::load_file(path)?
                .with_context(|| format!("config file {} does not exist", path.display()))?;
            config = config.merge(layer);
        }

        Ok(config)
    }

    fn global_config_path() -> Option<PathBuf> {
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))?;
        Some(config_home.join("cinder").join("config.toml"))
    }

    /// `Ok(None)` when the file does not exist.
    fn load_file(path: &Path) -> anyhow::Result<Option<Self>> {
        if !path.is_file() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("invalid config in {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config layer");
        Ok(Some(config))
    }

    /// Keys set in `other` override those in `self`.
    fn merge(self, other: Self) -> Self {
        Self {
            emit: EmitConfig {
                indent: other.emit.indent.or(self.emit.indent),
                untyped: other.emit.untyped.or(self.emit.untyped),
            },
            batch: BatchConfig {
                extension: other.batch.extension.or(self.batch.extension),
                parallel: other.batch.parallel.or(self.batch.parallel),
            },
        }
    }

    pub fn emit_options(&self) -> EmitOptions {
        let defaults = EmitOptions::default();
        EmitOptions {
            indent: self.emit.indent.clone().unwrap_or(defaults.indent),
            untyped: self.emit.untyped.clone().unwrap_or(defaults.untyped),
        }
    }

    pub fn extension(&self) -> &str {
        self.batch.extension.as_deref().unwrap_or("c")
    }

    pub fn parallel(&self) -> bool {
        self.batch.parallel.unwrap_or(true)
    }
}
