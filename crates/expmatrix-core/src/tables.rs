//! Loading benchmark and memory tables from TOML, and checking them.
//!
//! A missing section falls back to the built-in table for that section, so a
//! file with only `[[memory]]` rows reuses the default benchmarks.

use std::collections::HashSet;

use serde::Deserialize;
use tracing::warn;

use crate::catalog::{default_benchmarks, default_memory, Catalog};
use crate::error::{MatrixError, MatrixResult};
use crate::model::{BenchmarkDescriptor, CatalogEntry, MemorySetting};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TablesFile {
    benchmarks: Option<Vec<BenchmarkRow>>,
    memory: Option<Vec<MemorySetting>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BenchmarkRow {
    id: String,
    class: String,
    method: String,
    #[serde(rename = "coveragePackages")]
    coverage_packages: String,
    #[serde(default = "enabled_by_default")]
    enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl From<BenchmarkRow> for CatalogEntry {
    fn from(row: BenchmarkRow) -> Self {
        Self {
            enabled: row.enabled,
            descriptor: BenchmarkDescriptor {
                id: row.id,
                class: row.class,
                method: row.method,
                coverage_packages: row.coverage_packages,
            },
        }
    }
}

impl Catalog {
    /// Parse and validate a tables document.
    pub fn from_toml_str(content: &str) -> MatrixResult<Self> {
        let file: TablesFile =
            toml::from_str(content).map_err(|e| MatrixError::Parse(e.to_string()))?;
        let catalog = Self {
            benchmarks: match file.benchmarks {
                Some(rows) => rows.into_iter().map(CatalogEntry::from).collect(),
                None => default_benchmarks(),
            },
            memory: file.memory.unwrap_or_else(default_memory),
        };
        validate(&catalog)?;
        Ok(catalog)
    }
}

/// Reject tables that would produce a malformed matrix. Empty tables are
/// allowed; they just expand to nothing.
pub fn validate(catalog: &Catalog) -> MatrixResult<()> {
    let mut seen = HashSet::new();
    for (i, entry) in catalog.benchmarks.iter().enumerate() {
        let b = &entry.descriptor;
        for (field, value) in [
            ("id", &b.id),
            ("class", &b.class),
            ("method", &b.method),
            ("coveragePackages", &b.coverage_packages),
        ] {
            if value.trim().is_empty() {
                return Err(MatrixError::Invalid(format!(
                    "benchmark #{} has an empty `{field}`",
                    i + 1
                )));
            }
        }
        if !seen.insert(b.id.as_str()) {
            return Err(MatrixError::Invalid(format!(
                "duplicate benchmark id `{}`",
                b.id
            )));
        }
    }

    for (i, setting) in catalog.memory.iter().enumerate() {
        if setting.is_empty() {
            return Err(MatrixError::Invalid(format!(
                "memory setting #{} names no components",
                i + 1
            )));
        }
        for (component, size) in setting.iter() {
            if component.trim().is_empty() {
                return Err(MatrixError::Invalid(format!(
                    "memory setting #{} has an empty component name",
                    i + 1
                )));
            }
            if !is_heap_size(size) {
                return Err(MatrixError::Invalid(format!(
                    "memory setting #{}: `{size}` is not a heap size for {component}",
                    i + 1
                )));
            }
        }
    }

    if catalog.benchmarks.is_empty() {
        warn!("benchmark table is empty");
    }
    if catalog.memory.is_empty() {
        warn!("memory table is empty");
    }
    Ok(())
}

/// Accepts what the JVM takes after `-Xmx`: a positive integer with an
/// optional k/m/g/t unit.
pub fn is_heap_size(size: &str) -> bool {
    let digits = size
        .strip_suffix(|c: char| matches!(c, 'k' | 'K' | 'm' | 'M' | 'g' | 'G' | 't' | 'T'))
        .unwrap_or(size);
    !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && digits.parse::<u64>().is_ok_and(|n| n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heap_sizes() {
        assert!(is_heap_size("6g"));
        assert!(is_heap_size("512M"));
        assert!(is_heap_size("1073741824"));
        assert!(!is_heap_size(""));
        assert!(!is_heap_size("g"));
        assert!(!is_heap_size("0g"));
        assert!(!is_heap_size("6gb"));
        assert!(!is_heap_size("-1g"));
        assert!(!is_heap_size("1.5g"));
    }

    #[test]
    fn test_parse_full_tables() {
        let toml_str = r#"
[[benchmarks]]
id = "x"
class = "C"
method = "m"
coveragePackages = "p/*"

[[benchmarks]]
id = "y"
class = "D"
method = "n"
coveragePackages = "q/*"
enabled = false

[[memory]]
Knarr = "2g"
JQF = "1g"
"#;
        let catalog = Catalog::from_toml_str(toml_str).unwrap();
        assert_eq!(catalog.benchmarks.len(), 2);
        assert!(catalog.benchmarks[0].enabled);
        assert!(!catalog.benchmarks[1].enabled);
        // Document order, not alphabetical
        assert_eq!(catalog.memory[0].to_string(), "Knarr=2g JQF=1g");
    }

    #[test]
    fn test_memory_order_reaches_rendered_json() {
        let toml_str = r#"
[[benchmarks]]
id = "x"
class = "C"
method = "m"
coveragePackages = "p/*"

[[memory]]
Knarr = "3g"
JQF = "4g"
Central = "5g"
"#;
        let catalog = Catalog::from_toml_str(toml_str).unwrap();
        let matrix = crate::MatrixExpander::from_catalog(&catalog, &crate::Selection::Enabled)
            .unwrap()
            .expand();
        let out = crate::render(&matrix, crate::OutputStyle::Compact).unwrap();
        assert!(out.ends_with(r#""Xmx":{"Knarr":"3g","JQF":"4g","Central":"5g"}}]}"#));
    }

    #[test]
    fn test_missing_section_uses_defaults() {
        let toml_str = r#"
[[memory]]
JQF = "1g"
"#;
        let catalog = Catalog::from_toml_str(toml_str).unwrap();
        assert_eq!(catalog.benchmarks, default_benchmarks());
        assert_eq!(catalog.memory.len(), 1);
    }

    #[test]
    fn test_empty_document_is_default_catalog() {
        assert_eq!(Catalog::from_toml_str("").unwrap(), Catalog::default());
    }

    #[test]
    fn test_empty_tables_are_allowed() {
        let catalog = Catalog::from_toml_str("benchmarks = []\nmemory = []\n").unwrap();
        assert!(catalog.benchmarks.is_empty());
        assert!(catalog.memory.is_empty());
    }

    #[test]
    fn test_missing_field_is_parse_error() {
        let toml_str = r#"
[[benchmarks]]
id = "x"
class = "C"
method = "m"
"#;
        assert!(matches!(
            Catalog::from_toml_str(toml_str),
            Err(MatrixError::Parse(_))
        ));
    }

    #[test]
    fn test_unknown_field_is_parse_error() {
        let toml_str = r#"
[[benchmarks]]
id = "x"
class = "C"
method = "m"
coveragePackages = "p/*"
coverage = "typo"
"#;
        assert!(matches!(
            Catalog::from_toml_str(toml_str),
            Err(MatrixError::Parse(_))
        ));
    }

    #[test]
    fn test_duplicate_id_is_invalid() {
        let toml_str = r#"
[[benchmarks]]
id = "x"
class = "C"
method = "m"
coveragePackages = "p/*"

[[benchmarks]]
id = "x"
class = "D"
method = "n"
coveragePackages = "q/*"
"#;
        match Catalog::from_toml_str(toml_str) {
            Err(MatrixError::Invalid(msg)) => assert!(msg.contains("duplicate")),
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_heap_size_is_invalid() {
        let toml_str = r#"
[[memory]]
JQF = "lots"
"#;
        match Catalog::from_toml_str(toml_str) {
            Err(MatrixError::Invalid(msg)) => assert!(msg.contains("lots")),
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_memory_setting_is_invalid() {
        let toml_str = "memory = [{}]\n";
        assert!(matches!(
            Catalog::from_toml_str(toml_str),
            Err(MatrixError::Invalid(_))
        ));
    }

    #[test]
    fn test_blank_benchmark_field_is_invalid() {
        let toml_str = r#"
[[benchmarks]]
id = "x"
class = " "
method = "m"
coveragePackages = "p/*"
"#;
        match Catalog::from_toml_str(toml_str) {
            Err(MatrixError::Invalid(msg)) => assert!(msg.contains("class")),
            other => panic!("expected Invalid, got {other:?}"),
        }
    }
}
