pub mod catalog;
pub mod error;
pub mod expander;
pub mod model;
pub mod render;
pub mod tables;

pub use catalog::{Catalog, Selection};
pub use error::{MatrixError, MatrixResult};
pub use expander::MatrixExpander;
pub use model::{BenchmarkDescriptor, CatalogEntry, ConfigMatrix, ExpandedConfig, MemorySetting};
pub use render::{render, OutputStyle};
