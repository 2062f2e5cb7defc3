//! Canonical JSON bytes for hashing.
//!
//! Output is compact, object keys are sorted by byte order, strings are
//! escaped by `serde_json`, and every number is an integer. Real-valued
//! quantities must be converted to integer grid ticks before they get here,
//! so the same plan renders to the same bytes on every platform.

use std::fmt;
use std::io::Write;

use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonError {
    /// A number that is not an `i64` or `u64`. `pointer` is the RFC 6901
    /// location of the offending value.
    NonIntegerNumber { pointer: String, raw: String },
}

impl fmt::Display for CanonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonIntegerNumber { pointer, raw } => {
                write!(f, "non-integer number {raw} at {pointer:?} in canonical JSON")
            }
        }
    }
}

impl std::error::Error for CanonError {}

/// Render `value` as canonical bytes.
///
/// # Errors
///
/// Returns [`CanonError::NonIntegerNumber`] for the first float found in
/// document order.
pub fn canonical_json_bytes(value: &Value) -> Result<Vec<u8>, CanonError> {
    let mut writer = CanonWriter {
        out: Vec::new(),
        pointer: Vec::new(),
    };
    writer.value(value)?;
    Ok(writer.out)
}

struct CanonWriter {
    out: Vec<u8>,
    /// Path segments from the root to the value being written.
    pointer: Vec<String>,
}

impl CanonWriter {
    fn value(&mut self, value: &Value) -> Result<(), CanonError> {
        match value {
            Value::Number(n) => match (n.as_i64(), n.as_u64()) {
                (Some(i), _) => self.raw(format_args!("{i}")),
                (None, Some(u)) => self.raw(format_args!("{u}")),
                (None, None) => {
                    return Err(CanonError::NonIntegerNumber {
                        pointer: self.pointer_string(),
                        raw: n.to_string(),
                    })
                }
            },
            Value::Array(items) => {
                self.out.push(b'[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.out.push(b',');
                    }
                    self.nested(i.to_string(), item)?;
                }
                self.out.push(b']');
            }
            Value::Object(map) => {
                let mut entries: Vec<(&String, &Value)> = map.iter().collect();
                entries.sort_unstable_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));
                self.out.push(b'{');
                for (i, (key, item)) in entries.into_iter().enumerate() {
                    if i > 0 {
                        self.out.push(b',');
                    }
                    self.scalar(&Value::String(key.clone()));
                    self.out.push(b':');
                    self.nested(key.clone(), item)?;
                }
                self.out.push(b'}');
            }
            Value::Null | Value::Bool(_) | Value::String(_) => self.scalar(value),
        }
        Ok(())
    }

    fn nested(&mut self, segment: String, value: &Value) -> Result<(), CanonError> {
        self.pointer.push(segment);
        let result = self.value(value);
        self.pointer.pop();
        result
    }

    // Writing into a Vec cannot fail.
    fn scalar(&mut self, value: &Value) {
        let _ = serde_json::to_writer(&mut self.out, value);
    }

    fn raw(&mut self, args: fmt::Arguments<'_>) {
        let _ = self.out.write_fmt(args);
    }

    fn pointer_string(&self) -> String {
        self.pointer
            .iter()
            .map(|s| format!("/{}", s.replace('~', "~0").replace('/', "~1")))
            .collect()
    }
}
