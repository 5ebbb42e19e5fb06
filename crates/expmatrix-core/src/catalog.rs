//! Built-in benchmark and memory tables, and benchmark selection.
//!
//! Only `closure` is enabled by default; the other targets are kept in the
//! table so they can be switched on with `--all` or `--benchmark <id>`.

use tracing::debug;

use crate::error::{MatrixError, MatrixResult};
use crate::model::{BenchmarkDescriptor, CatalogEntry, MemorySetting};

/// (enabled, id, class, method, coveragePackages)
const DEFAULT_BENCHMARKS: &[(bool, &str, &str, &str, &str)] = &[
    (
        false,
        "ant",
        "edu.berkeley.cs.jqf.examples.ant.ProjectBuilderTest",
        "testWithGenerator",
        "org/apache/tools/ant/*",
    ),
    (
        false,
        "bcel",
        "edu.berkeley.cs.jqf.examples.bcel.ParserTest",
        "testWithGenerator",
        "org/apache/bcel/*",
    ),
    (
        true,
        "closure",
        "edu.berkeley.cs.jqf.examples.closure.CompilerTest",
        "testWithGenerator",
        "com/google/javascript/jscomp/*",
    ),
    (
        false,
        "maven",
        "edu.berkeley.cs.jqf.examples.maven.ModelReaderTest",
        "testWithGenerator",
        "org/apache/maven/model/*",
    ),
    (
        false,
        "rhino",
        "edu.berkeley.cs.jqf.examples.rhino.CompilerTest",
        "testWithGenerator",
        "org/mozilla/javascript/optimizer/*:org/mozilla/javascript/CodeGenerator*",
    ),
];

const DEFAULT_MEMORY: &[&[(&str, &str)]] = &[
    &[("JQF", "6g"), ("Central", "6g"), ("Knarr", "6g")],
    &[("JQF", "3g"), ("Central", "3g"), ("Knarr", "3g")],
    &[("JQF", "4g"), ("Central", "4g"), ("Knarr", "4g")],
    &[("JQF", "4g"), ("Central", "5g"), ("Knarr", "3g")],
];

/// Which catalog entries take part in an expansion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    /// Entries whose `enabled` flag is set.
    #[default]
    Enabled,
    /// Every entry, enabled or not.
    All,
    /// Exactly these ids, in the order given.
    Ids(Vec<String>),
}

/// The benchmark table plus the memory presets to expand it against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub benchmarks: Vec<CatalogEntry>,
    pub memory: Vec<MemorySetting>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            benchmarks: default_benchmarks(),
            memory: default_memory(),
        }
    }
}

impl Catalog {
    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.benchmarks.iter().find(|e| e.descriptor.id == id)
    }

    /// Resolve a selection to descriptors, preserving table order (or the
    /// caller's order for explicit ids).
    pub fn select(&self, selection: &Selection) -> MatrixResult<Vec<BenchmarkDescriptor>> {
        let picked: Vec<BenchmarkDescriptor> = match selection {
            Selection::Enabled => self
                .benchmarks
                .iter()
                .filter(|e| e.enabled)
                .map(|e| e.descriptor.clone())
                .collect(),
            Selection::All => self
                .benchmarks
                .iter()
                .map(|e| e.descriptor.clone())
                .collect(),
            Selection::Ids(ids) => ids
                .iter()
                .map(|id| {
                    self.get(id)
                        .map(|e| e.descriptor.clone())
                        .ok_or_else(|| MatrixError::UnknownBenchmark(id.clone()))
                })
                .collect::<MatrixResult<_>>()?,
        };
        debug!(?selection, count = picked.len(), "selected benchmarks");
        Ok(picked)
    }
}

pub fn default_benchmarks() -> Vec<CatalogEntry> {
    DEFAULT_BENCHMARKS
        .iter()
        .map(|&(enabled, id, class, method, coverage)| CatalogEntry {
            enabled,
            descriptor: BenchmarkDescriptor::new(id, class, method, coverage),
        })
        .collect()
}

pub fn default_memory() -> Vec<MemorySetting> {
    DEFAULT_MEMORY
        .iter()
        .map(|row| row.iter().copied().collect())
        .collect()
}
