//! Garden configuration, optionally stored as TOML.

use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::filter::PatternFilter;

/// Settings passed once to a garden before it runs.
///
/// Missing fields default to a quiet run with no filter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GardenConfig {
    /// Print `T:`/`S:`/`P:`/`I:` lines in addition to failures and errors.
    pub verbose: bool,

    /// Case-insensitive regexes; entry `i` must match the topic at depth `i`.
    pub patterns: Vec<String>,

    /// Stop a run that is still exploring after this many passes.
    pub max_passes: usize,

    /// Backtrace frames kept in `E:` lines (when `RUST_BACKTRACE` is set).
    pub backtrace_depth: usize,
}

impl Default for GardenConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            patterns: Vec::new(),
            max_passes: 10_000,
            backtrace_depth: 8,
        }
    }
}

impl GardenConfig {
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_passes == 0 {
            return Err(anyhow!("max_passes must be > 0"));
        }
        PatternFilter::new(&self.patterns)?;
        Ok(())
    }
}

/// Load config from a TOML file. A missing file means defaults.
pub fn load_config(path: &Path) -> Result<GardenConfig> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(GardenConfig::default()),
        Err(err) => return Err(err).with_context(|| format!("read {}", path.display())),
    };
    let cfg: GardenConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg)
}

/// Save config as TOML, replacing any existing file in one rename.
pub fn write_config(path: &Path, cfg: &GardenConfig) -> Result<()> {
    cfg.validate()?;
    let contents = toml::to_string_pretty(cfg).context("encode config as toml")?;
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let staged = path.with_extension("toml.partial");
    fs::write(&staged, contents).with_context(|| format!("write {}", staged.display()))?;
    fs::rename(&staged, path)
        .with_context(|| format!("move {} into place", staged.display()))?;
    Ok(())
}
