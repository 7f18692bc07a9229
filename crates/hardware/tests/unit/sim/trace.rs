//! # Trace Parsing Tests
//!
//! Line grammar, error positions, streaming, and file loading.

use std::io::{self, BufRead, Cursor, Read, Write};

use cachesim_core::sim::trace::parse_line;
use cachesim_core::sim::{TraceError, TraceReader, TraceRecord, load_trace, parse_trace};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case("r 0", TraceRecord::read(0))]
#[case("w 1f", TraceRecord::write(0x1f))]
#[case("R 0x1234", TraceRecord::read(0x1234))]
#[case("W 0XDEADBEEF", TraceRecord::write(0xDEAD_BEEF))]
#[case("  r\tffffffff  ", TraceRecord::read(u32::MAX))]
fn parses_access_lines(#[case] line: &str, #[case] expected: TraceRecord) {
    assert_eq!(parse_line(line), Ok(Some(expected)));
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("# header")]
#[case("  # indented comment")]
fn skips_blank_and_comment_lines(#[case] line: &str) {
    assert_eq!(parse_line(line), Ok(None));
}

#[rstest]
#[case::unknown_op("x 10", "unknown operation")]
#[case::missing_address("r", "missing address")]
#[case::not_hex("w 0xZZ", "invalid address")]
#[case::too_wide("r 100000000", "invalid address")]
#[case::trailing_field("r 10 4", "unexpected field")]
#[case::negative("r -10", "invalid address")]
fn rejects_malformed_lines(#[case] line: &str, #[case] reason: &str) {
    let err = parse_line(line).unwrap_err();
    assert!(err.contains(reason), "{err:?} should mention {reason:?}");
}

#[test]
fn parse_trace_collects_in_order() {
    let text = "# warmup\nr 0\n\nw 10\nR 0x20\n";
    let records = parse_trace(Cursor::new(text)).unwrap();
    assert_eq!(
        records,
        vec![
            TraceRecord::read(0x0),
            TraceRecord::write(0x10),
            TraceRecord::read(0x20),
        ]
    );
}

#[test]
fn parse_error_carries_one_based_line_number() {
    let text = "r 0\n# comment\n\nq 10\nr 20\n";
    match parse_trace(Cursor::new(text)) {
        Err(TraceError::Parse { line, reason }) => {
            assert_eq!(line, 4);
            assert!(reason.contains("'q'"));
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn parse_error_message_names_the_line() {
    let err = parse_trace(Cursor::new("r 0\nw\n")).unwrap_err();
    assert_eq!(err.to_string(), "trace line 2: missing address");
}

#[test]
fn reader_yields_records_before_the_error() {
    let mut reader = TraceReader::new(Cursor::new("r 0\nw 10\nbad\nr 20\n"));
    assert_eq!(reader.next().unwrap().unwrap(), TraceRecord::read(0));
    assert_eq!(reader.next().unwrap().unwrap(), TraceRecord::write(0x10));
    assert!(matches!(reader.next(), Some(Err(TraceError::Parse { line: 3, .. }))));
}

#[test]
fn empty_input_yields_nothing() {
    assert!(parse_trace(Cursor::new("")).unwrap().is_empty());
}

/// Reader that fails on its first read.
struct FailingReader;

impl Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::other("disk on fire"))
    }
}

impl BufRead for FailingReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        Err(io::Error::other("disk on fire"))
    }

    fn consume(&mut self, _amt: usize) {}
}

#[test]
fn io_failure_is_reported() {
    let err = parse_trace(FailingReader).unwrap_err();
    assert!(matches!(err, TraceError::Io(_)));
    assert!(err.to_string().starts_with("failed to read trace"));
}

#[test]
fn load_trace_reads_a_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "w 0x00").unwrap();
    writeln!(file, "r 0x100").unwrap();
    file.flush().unwrap();

    let records = load_trace(file.path()).unwrap();
    assert_eq!(records, vec![TraceRecord::write(0), TraceRecord::read(0x100)]);
}

#[test]
fn load_trace_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_trace(dir.path().join("absent.trace")).unwrap_err();
    assert!(matches!(err, TraceError::Io(_)));
}
