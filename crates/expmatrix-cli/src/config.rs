//! Table source resolution.
//!
//! Lookup order:
//! 1. `--tables <path>`
//! 2. `$EXPMATRIX_TABLES` environment variable
//! 3. Built-in tables
//!
//! There is no implicit per-user file: a bare `expmatrix` run always prints
//! the built-in matrix.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use expmatrix_core::Catalog;

pub const TABLES_ENV: &str = "EXPMATRIX_TABLES";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TablesSource {
    Flag(PathBuf),
    Env(PathBuf),
    Builtin,
}

impl TablesSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Flag(p) | Self::Env(p) => Some(p),
            Self::Builtin => None,
        }
    }
}

/// Resolve where the tables come from. `env` is the value of
/// `$EXPMATRIX_TABLES`, passed in so callers and tests control it.
pub fn resolve_source(flag: Option<PathBuf>, env: Option<String>) -> TablesSource {
    if let Some(p) = flag {
        return TablesSource::Flag(p);
    }
    match env {
        Some(p) if !p.is_empty() => TablesSource::Env(PathBuf::from(p)),
        _ => TablesSource::Builtin,
    }
}

pub fn source_from_env(flag: Option<PathBuf>) -> TablesSource {
    resolve_source(flag, std::env::var(TABLES_ENV).ok())
}

/// Load tables from the resolved source. Unlike the built-ins, an explicitly
/// named file must exist.
pub fn load_catalog(source: &TablesSource) -> Result<Catalog> {
    let Some(path) = source.path() else {
        return Ok(Catalog::default());
    };
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let catalog =
        Catalog::from_toml_str(&content).with_context(|| format!("parsing {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        benchmarks = catalog.benchmarks.len(),
        memory = catalog.memory.len(),
        "loaded tables"
    );
    Ok(catalog)
}

/// Describe the active source (for `expmatrix config`).
pub fn show_tables_source(source: &TablesSource) -> String {
    match source {
        TablesSource::Flag(p) => format!("{} (from --tables)", p.display()),
        TablesSource::Env(p) => format!("{} (from ${TABLES_ENV})", p.display()),
        TablesSource::Builtin => "built-in tables".into(),
    }
}
