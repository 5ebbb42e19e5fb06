use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ---------------------------------------------------------------------------
// Benchmark
// ---------------------------------------------------------------------------

/// A fuzzing target: the test class and method to drive, plus the package
/// filter used for coverage instrumentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkDescriptor {
    pub id: String,
    pub class: String,
    pub method: String,
    #[serde(rename = "coveragePackages")]
    pub coverage_packages: String,
}

impl BenchmarkDescriptor {
    pub fn new(
        id: impl Into<String>,
        class: impl Into<String>,
        method: impl Into<String>,
        coverage_packages: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            class: class.into(),
            method: method.into(),
            coverage_packages: coverage_packages.into(),
        }
    }
}

impl fmt::Display for BenchmarkDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{} ({})", self.class, self.method, self.coverage_packages)
    }
}

/// A benchmark as it sits in a table. Disabled entries stay listed but are
/// skipped unless selected explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub enabled: bool,
    pub descriptor: BenchmarkDescriptor,
}

// ---------------------------------------------------------------------------
// Memory presets
// ---------------------------------------------------------------------------

/// Heap sizes per process, keyed by component name (`JQF`, `Central`,
/// `Knarr`). Entries keep their insertion order through (de)serialization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySetting {
    entries: Vec<(String, String)>,
}

impl MemorySetting {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the heap size for `component`, replacing any previous value in place.
    pub fn with(mut self, component: impl Into<String>, size: impl Into<String>) -> Self {
        self.insert(component.into(), size.into());
        self
    }

    pub fn insert(&mut self, component: String, size: String) {
        match self.entries.iter_mut().find(|(c, _)| *c == component) {
            Some(entry) => entry.1 = size,
            None => self.entries.push((component, size)),
        }
    }

    pub fn get(&self, component: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(c, _)| c == component)
            .map(|(_, s)| s.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(c, s)| (c.as_str(), s.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<C: Into<String>, S: Into<String>> FromIterator<(C, S)> for MemorySetting {
    fn from_iter<I: IntoIterator<Item = (C, S)>>(iter: I) -> Self {
        let mut setting = Self::new();
        for (component, size) in iter {
            setting.insert(component.into(), size.into());
        }
        setting
    }
}

impl fmt::Display for MemorySetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (component, size)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{component}={size}")?;
        }
        Ok(())
    }
}

impl Serialize for MemorySetting {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (component, size) in &self.entries {
            map.serialize_entry(component, size)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for MemorySetting {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SettingVisitor;

        impl<'de> Visitor<'de> for SettingVisitor {
            type Value = MemorySetting;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of component name to heap size")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut setting = MemorySetting::new();
                while let Some((component, size)) = map.next_entry::<String, String>()? {
                    setting.insert(component, size);
                }
                Ok(setting)
            }
        }

        deserializer.deserialize_map(SettingVisitor)
    }
}

// ---------------------------------------------------------------------------
// Expansion output
// ---------------------------------------------------------------------------

/// One cell of the matrix: the benchmark's fields with the memory preset
/// nested under `Xmx`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandedConfig {
    #[serde(flatten)]
    pub benchmark: BenchmarkDescriptor,
    #[serde(rename = "Xmx")]
    pub xmx: MemorySetting,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigMatrix {
    pub config: Vec<ExpandedConfig>,
}

impl ConfigMatrix {
    pub fn len(&self) -> usize {
        self.config.len()
    }

    pub fn is_empty(&self) -> bool {
        self.config.is_empty()
    }
}
