use tracing::debug;

use crate::catalog::{Catalog, Selection};
use crate::error::MatrixResult;
use crate::model::{BenchmarkDescriptor, ConfigMatrix, ExpandedConfig, MemorySetting};

/// Cartesian product of memory presets over benchmarks.
///
/// Output is memory-major: entry `im * benchmarks.len() + ib` pairs
/// `memory[im]` with `benchmarks[ib]`.
#[derive(Debug, Clone)]
pub struct MatrixExpander {
    benchmarks: Vec<BenchmarkDescriptor>,
    memory: Vec<MemorySetting>,
}

impl MatrixExpander {
    pub fn new(benchmarks: Vec<BenchmarkDescriptor>, memory: Vec<MemorySetting>) -> Self {
        Self { benchmarks, memory }
    }

    pub fn from_catalog(catalog: &Catalog, selection: &Selection) -> MatrixResult<Self> {
        Ok(Self::new(catalog.select(selection)?, catalog.memory.clone()))
    }

    pub fn benchmarks(&self) -> &[BenchmarkDescriptor] {
        &self.benchmarks
    }

    pub fn memory(&self) -> &[MemorySetting] {
        &self.memory
    }

    /// Number of entries `expand` will produce.
    pub fn len(&self) -> usize {
        self.memory.len() * self.benchmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn expand(&self) -> ConfigMatrix {
        let mut config = Vec::with_capacity(self.len());
        for xmx in &self.memory {
            for benchmark in &self.benchmarks {
                config.push(ExpandedConfig {
                    benchmark: benchmark.clone(),
                    xmx: xmx.clone(),
                });
            }
        }
        debug!(
            memory = self.memory.len(),
            benchmarks = self.benchmarks.len(),
            entries = config.len(),
            "expanded matrix"
        );
        ConfigMatrix { config }
    }
}
