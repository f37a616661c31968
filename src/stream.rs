//! Field extraction from JSON-lines record streams
//!
//! Feeds string values from one-object-per-line logs into a sketch. Lines
//! that do not parse as JSON objects, and records whose field is missing,
//! empty, or not a string, are skipped.
//!
//! # Example
//!
//! ```
//! use flowsketch::cardinality::HyperLogLog;
//! use flowsketch::stream::field_values;
//!
//! let log = "{\"remote_addr\":\"10.0.0.1\"}\nnot json\n{\"remote_addr\":\"10.0.0.2\"}\n";
//!
//! let mut hll = HyperLogLog::default();
//! for addr in field_values(log.as_bytes(), "remote_addr") {
//!     hll.insert(&addr?);
//! }
//! assert_eq!(hll.estimate(), 2);
//! # Ok::<(), std::io::Error>(())
//! ```

use serde_json::Value;
use std::io::{self, BufRead};

/// Iterator over the string values of one field across a JSON-lines stream
#[derive(Debug)]
pub struct FieldValues<R> {
    reader: R,
    buf: Vec<u8>,
    field: String,
    line_no: u64,
    skipped: u64,
}

/// Iterate the values of `field` in the JSON-lines stream `reader`
pub fn field_values<R: BufRead>(reader: R, field: &str) -> FieldValues<R> {
    FieldValues {
        reader,
        buf: Vec::new(),
        field: field.to_owned(),
        line_no: 0,
        skipped: 0,
    }
}

impl<R> FieldValues<R> {
    /// Number of lines skipped so far
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Number of lines read so far
    pub fn lines_read(&self) -> u64 {
        self.line_no
    }

    /// Field value of one raw line; invalid UTF-8 fails the JSON parse
    fn extract(&self, line: &[u8]) -> Option<String> {
        let record: Value = serde_json::from_slice(line).ok()?;
        match record.get(&self.field)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }
    }
}

impl<R: BufRead> Iterator for FieldValues<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(err) => return Some(Err(err)),
            }
            self.line_no += 1;

            match self.extract(&self.buf) {
                Some(value) => return Some(Ok(value)),
                None => {
                    self.skipped += 1;
                    log::trace!("skipping line {}: no usable {:?}", self.line_no, self.field);
                }
            }
        }
    }
}
