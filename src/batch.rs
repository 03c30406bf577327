//! Batch accumulator
//!
//! Buffers normalized rows up to a configured threshold and hands full
//! batches to a [`BatchSink`] synchronously — the caller does not advance
//! until the write has completed, so no two writes for overlapping batches
//! can ever be in flight for one run.

use crate::error::Result;
use crate::record::NormalizedRow;

/// Destination for full batches of rows.
///
/// Implementations must write the whole batch atomically or fail; a returned
/// error aborts the run.
pub trait BatchSink {
    /// Write one batch, in order
    fn write(&self, rows: &[NormalizedRow]) -> Result<()>;
}

/// Buffers rows and writes them through a sink in batches of `capacity`.
pub struct Accumulator<'a> {
    sink: &'a dyn BatchSink,
    capacity: usize,
    rows: Vec<NormalizedRow>,
}

impl<'a> Accumulator<'a> {
    /// Create an accumulator with the given batch size (clamped to at least 1)
    pub fn new(sink: &'a dyn BatchSink, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            sink,
            capacity,
            rows: Vec::with_capacity(capacity),
        }
    }

    /// Append one row. When the buffer reaches the threshold the full batch
    /// is written and cleared before this returns. Returns whether a write
    /// happened.
    pub fn push(&mut self, row: NormalizedRow) -> Result<bool> {
        self.rows.push(row);
        if self.rows.len() >= self.capacity {
            self.write_out()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Write any buffered partial batch. Returns whether a write happened.
    pub fn flush(&mut self) -> Result<bool> {
        if self.rows.is_empty() {
            return Ok(false);
        }
        self.write_out()?;
        Ok(true)
    }

    /// Rows currently buffered and not yet written
    pub fn pending(&self) -> usize {
        self.rows.len()
    }

    fn write_out(&mut self) -> Result<()> {
        self.sink.write(&self.rows)?;
        self.rows.clear();
        Ok(())
    }
}
