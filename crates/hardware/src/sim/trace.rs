//! Memory Access Trace Loading.
//!
//! This module turns text traces into access records. It provides:
//! 1. **Line parsing:** `<op> <address>` where `op` is `r`/`R` or `w`/`W` and `address` is
//!    hexadecimal with an optional `0x` prefix.
//! 2. **Streaming:** [`TraceReader`] yields records lazily from any `BufRead`.
//! 3. **File loading:** [`load_trace`] reads a whole trace file.
//!
//! Blank lines and lines starting with `#` are skipped.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use thiserror::Error;

use crate::common::Address;

/// Errors raised while reading a trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The underlying reader failed.
    #[error("failed to read trace: {0}")]
    Io(#[from] io::Error),

    /// A line could not be parsed.
    #[error("trace line {line}: {reason}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },
}

/// One access from a trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceRecord {
    /// Accessed address.
    pub address: Address,
    /// Access is a store.
    pub is_write: bool,
}

impl TraceRecord {
    /// A load from `address`.
    pub const fn read(address: u32) -> Self {
        Self {
            address: Address::new(address),
            is_write: false,
        }
    }

    /// A store to `address`.
    pub const fn write(address: u32) -> Self {
        Self {
            address: Address::new(address),
            is_write: true,
        }
    }
}

/// Parses a single trace line.
///
/// # Returns
///
/// `Ok(None)` for blank and comment lines, `Ok(Some(record))` for an access.
///
/// # Errors
///
/// Returns a description of the problem when the operation is unknown, the address is
/// missing or not a 32-bit hexadecimal number, or the line carries extra fields.
pub fn parse_line(text: &str) -> Result<Option<TraceRecord>, String> {
    let text = text.trim();
    if text.is_empty() || text.starts_with('#') {
        return Ok(None);
    }

    let mut fields = text.split_whitespace();
    let op = fields.next().unwrap_or_default();
    let is_write = match op {
        "r" | "R" => false,
        "w" | "W" => true,
        other => return Err(format!("unknown operation '{other}'")),
    };

    let raw = fields
        .next()
        .ok_or_else(|| "missing address".to_string())?;
    if let Some(extra) = fields.next() {
        return Err(format!("unexpected field '{extra}'"));
    }

    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .unwrap_or(raw);
    let address = u32::from_str_radix(digits, 16)
        .map_err(|e| format!("invalid address '{raw}': {e}"))?;

    Ok(Some(TraceRecord {
        address: Address::new(address),
        is_write,
    }))
}

/// Lazily parses trace records from a reader.
#[derive(Debug)]
pub struct TraceReader<R> {
    lines: io::Lines<R>,
    line_no: usize,
}

impl<R: BufRead> TraceReader<R> {
    /// Wraps `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<TraceRecord, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let text = match self.lines.next()? {
                Ok(text) => text,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_no += 1;
            match parse_line(&text) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => {}
                Err(reason) => {
                    return Some(Err(TraceError::Parse {
                        line: self.line_no,
                        reason,
                    }));
                }
            }
        }
    }
}

/// Reads every record from `reader`.
///
/// # Errors
///
/// Stops at the first I/O or parse error.
pub fn parse_trace<R: BufRead>(reader: R) -> Result<Vec<TraceRecord>, TraceError> {
    TraceReader::new(reader).collect()
}

/// Opens and parses the trace file at `path`.
///
/// # Errors
///
/// Returns [`TraceError::Io`] if the file cannot be opened or read, and
/// [`TraceError::Parse`] for the first malformed line.
pub fn load_trace(path: impl AsRef<Path>) -> Result<Vec<TraceRecord>, TraceError> {
    let file = File::open(path)?;
    parse_trace(BufReader::new(file))
}
