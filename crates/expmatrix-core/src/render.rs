//! JSON rendering of a [`ConfigMatrix`].
//!
//! `Spaced` matches the output of the experiment scripts that consume this
//! matrix: one line, `", "` and `": "` separators, non-ASCII escaped as
//! `\uXXXX`.

use std::io;

use serde::Serialize;
use serde_json::ser::Formatter;

use crate::error::MatrixResult;
use crate::model::ConfigMatrix;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputStyle {
    #[default]
    Spaced,
    Compact,
    Pretty,
}

pub fn render(matrix: &ConfigMatrix, style: OutputStyle) -> MatrixResult<String> {
    match style {
        OutputStyle::Compact => Ok(serde_json::to_string(matrix)?),
        OutputStyle::Pretty => Ok(serde_json::to_string_pretty(matrix)?),
        OutputStyle::Spaced => {
            let mut buf = Vec::new();
            let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
            matrix.serialize(&mut ser)?;
            String::from_utf8(buf).map_err(|e| {
                serde_json::Error::io(io::Error::new(io::ErrorKind::InvalidData, e)).into()
            })
        }
    }
}

struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    // Quotes, backslashes and control characters never reach here; serde_json
    // routes those through `write_char_escape`.
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (i, c) in fragment.char_indices() {
            if (' '..='~').contains(&c) {
                continue;
            }
            writer.write_all(fragment[start..i].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = i + c.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Selection};
    use crate::expander::MatrixExpander;
    use crate::model::{BenchmarkDescriptor, MemorySetting};

    fn single() -> ConfigMatrix {
        MatrixExpander::new(
            vec![BenchmarkDescriptor::new("x", "C", "m", "p/*")],
            vec![MemorySetting::new().with("JQF", "1g")],
        )
        .expand()
    }

    #[test]
    fn test_compact() {
        assert_eq!(
            render(&single(), OutputStyle::Compact).unwrap(),
            r#"{"config":[{"id":"x","class":"C","method":"m","coveragePackages":"p/*","Xmx":{"JQF":"1g"}}]}"#
        );
    }

    #[test]
    fn test_spaced() {
        assert_eq!(
            render(&single(), OutputStyle::Spaced).unwrap(),
            r#"{"config": [{"id": "x", "class": "C", "method": "m", "coveragePackages": "p/*", "Xmx": {"JQF": "1g"}}]}"#
        );
    }

    #[test]
    fn test_pretty_parses_to_same_value() {
        let pretty = render(&single(), OutputStyle::Pretty).unwrap();
        assert!(pretty.contains('\n'));
        let a: serde_json::Value = serde_json::from_str(&pretty).unwrap();
        let b: serde_json::Value =
            serde_json::from_str(&render(&single(), OutputStyle::Compact).unwrap()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_matrix() {
        let empty = ConfigMatrix::default();
        assert_eq!(render(&empty, OutputStyle::Spaced).unwrap(), r#"{"config": []}"#);
        assert_eq!(render(&empty, OutputStyle::Compact).unwrap(), r#"{"config":[]}"#);
    }

    #[test]
    fn test_spaced_escapes_non_ascii() {
        let matrix = MatrixExpander::new(
            vec![BenchmarkDescriptor::new("caf\u{e9}", "C\u{1f600}", "m\n", "p\"/*")],
            vec![MemorySetting::new().with("JQF", "1g")],
        )
        .expand();
        let out = render(&matrix, OutputStyle::Spaced).unwrap();
        assert!(out.contains(r#""id": "caf\u00e9""#));
        assert!(out.contains(r#""class": "C\ud83d\ude00""#));
        assert!(out.contains(r#""method": "m\n""#));
        assert!(out.contains(r#""coveragePackages": "p\"/*""#));
        let back: ConfigMatrix = serde_json::from_str(&out).unwrap();
        assert_eq!(back, matrix);
    }

    #[test]
    fn test_default_matrix_output() {
        let matrix = MatrixExpander::from_catalog(&Catalog::default(), &Selection::Enabled)
            .unwrap()
            .expand();
        let entry = |jqf: &str, central: &str, knarr: &str| {
            format!(
                r#"{{"id": "closure", "class": "edu.berkeley.cs.jqf.examples.closure.CompilerTest", "method": "testWithGenerator", "coveragePackages": "com/google/javascript/jscomp/*", "Xmx": {{"JQF": "{jqf}", "Central": "{central}", "Knarr": "{knarr}"}}}}"#
            )
        };
        let expected = format!(
            r#"{{"config": [{}, {}, {}, {}]}}"#,
            entry("6g", "6g", "6g"),
            entry("3g", "3g", "3g"),
            entry("4g", "4g", "4g"),
            entry("4g", "5g", "3g"),
        );
        assert_eq!(render(&matrix, OutputStyle::Spaced).unwrap(), expected);
    }

    #[test]
    fn test_render_is_deterministic() {
        let expander = MatrixExpander::from_catalog(&Catalog::default(), &Selection::All).unwrap();
        let first = render(&expander.expand(), OutputStyle::Spaced).unwrap();
        let second = render(&expander.expand(), OutputStyle::Spaced).unwrap();
        assert_eq!(first, second);
    }
}
