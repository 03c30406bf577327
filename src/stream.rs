//! Stream driver
//!
//! Consumes the source line by line in a single sequential loop: the next
//! line is not read until the current line has been parsed, normalized, and
//! — when a batch fills — written. That ordering is the run's backpressure:
//! a fast source cannot outrun the store, and a batch being written is never
//! appended to.

use crate::batch::{Accumulator, BatchSink};
use crate::error::{Error, Result};
use crate::parse;
use crate::record::{build_nested, NormalizedRow};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Outcome of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    /// Total data rows processed and handed to the writer
    pub rows_processed: u64,
    /// The header list captured from the first non-blank line
    pub headers: Vec<String>,
}

/// Drive one run over an already-open line source.
///
/// The first non-blank line becomes the header list; every later non-blank
/// line is parsed, normalized, and appended to the batch. Validation
/// failures are annotated with the 1-based physical line number and abort the
/// run; a read error from the underlying stream aborts immediately. On clean
/// end of input the remainder batch is flushed. `on_progress` is invoked with
/// the cumulative processed-row count after every batch write, threshold or
/// final.
pub fn ingest_reader<R: BufRead>(
    reader: R,
    sink: &dyn BatchSink,
    batch_size: usize,
    mut on_progress: impl FnMut(u64),
) -> Result<IngestReport> {
    let mut acc = Accumulator::new(sink, batch_size);
    let mut headers: Option<Vec<String>> = None;
    let mut processed: u64 = 0;

    for (index, line) in reader.lines().enumerate() {
        let line_number = index as u64 + 1;
        let line = line.map_err(|e| Error::read(e.to_string()))?;
        if line.trim().is_empty() {
            continue;
        }

        match &headers {
            None => {
                let captured = parse::split_line(&line);
                tracing::debug!(line_number, columns = captured.len(), "captured header");
                headers = Some(captured);
            }
            Some(header_list) => {
                let fields = parse::split_line(&line);
                let nested = build_nested(header_list, &fields);
                let row =
                    NormalizedRow::from_nested(&nested).map_err(|e| e.at_line(line_number))?;
                let wrote = acc.push(row)?;
                processed += 1;
                if wrote {
                    on_progress(processed);
                }
            }
        }
    }

    if acc.flush()? {
        on_progress(processed);
    }

    tracing::info!(rows = processed, "ingest complete");
    Ok(IngestReport {
        rows_processed: processed,
        headers: headers.unwrap_or_default(),
    })
}

/// Drive one run over a source file.
///
/// Fails with [`Error::SourceNotFound`] before any line is consumed when the
/// path does not exist.
pub fn ingest_file(
    path: impl AsRef<Path>,
    sink: &dyn BatchSink,
    batch_size: usize,
    on_progress: impl FnMut(u64),
) -> Result<IngestReport> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::source_not_found(path.display().to_string()));
    }
    let file = File::open(path).map_err(|e| Error::read(e.to_string()))?;
    tracing::info!(source = %path.display(), batch_size, "starting ingest");
    ingest_reader(BufReader::new(file), sink, batch_size, on_progress)
}
