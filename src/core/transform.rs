//! Purpose: Drive the line-by-line clean over a reader/writer pair.
//! Exports: `TransformOutcome`, `transform`.
//! Role: Streaming engine used by the CLI; one pass, strictly in file order.
//! Invariants: Output is written incrementally; the whole stream is never buffered.
//! Invariants: Only successfully re-serialized records advance the comma counter.
//! Invariants: Passthrough lines are emitted byte-for-byte (minus the terminator).
use std::io::{self, BufRead, Write};

use bstr::ByteSlice;

use crate::core::clean::{LineDisposition, clean_line};
use crate::core::error::{Error, ErrorKind};

#[derive(Copy, Clone, Debug, Default)]
pub struct TransformOutcome {
    pub records: u64,
    pub passthrough: u64,
}

fn io_error(err: io::Error, message: &str) -> Error {
    Error::new(ErrorKind::Io)
        .with_message(message)
        .with_source(err)
}

/// Copy `reader` to `writer`, cleaning each record line.
///
/// Records are joined by a single comma: the first successfully written record
/// has no leading comma, every later one does. Lines that fail to parse are
/// written verbatim between whatever records surround them. Nothing emits a
/// newline; the result is a concatenated, array-like stream.
pub fn transform<R, W>(mut reader: R, mut writer: W) -> Result<TransformOutcome, Error>
where
    R: BufRead,
    W: Write,
{
    let mut outcome = TransformOutcome::default();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|err| io_error(err, "failed to read input"))?;
        if read == 0 {
            break;
        }
        let text = buf.to_str_lossy();
        let line = text.trim_end_matches(['\n', '\r']);
        match clean_line(line) {
            LineDisposition::Record(record) => {
                if outcome.records > 0 {
                    writer
                        .write_all(b",")
                        .map_err(|err| io_error(err, "failed to write output"))?;
                }
                writer
                    .write_all(record.as_bytes())
                    .map_err(|err| io_error(err, "failed to write output"))?;
                outcome.records += 1;
            }
            LineDisposition::Passthrough => {
                tracing::debug!("passing non-record line through verbatim");
                writer
                    .write_all(line.as_bytes())
                    .map_err(|err| io_error(err, "failed to write output"))?;
                outcome.passthrough += 1;
            }
        }
    }
    writer
        .flush()
        .map_err(|err| io_error(err, "failed to flush output"))?;
    Ok(outcome)
}
