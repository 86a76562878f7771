// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Output sinks for accepted codes.
//!
//! A sink is either `Null` (counting-only runs) or a buffered file. The file
//! variant is owned by exactly one worker for one partition; on close it
//! sorts its own file in place, so the dispatcher's final pass only has to
//! merge pre-sorted runs.
//!
//! A write failure is logged once and the sink degrades to discarding
//! further lines for that partition — partial results remain useful, and one
//! bad disk does not abort the whole run.

pub mod external_sort;

use crate::code::CodeState;
use crate::error::SearchError;
use crate::report::ProgressFn;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::error;

/// Destination for accepted codes, one per assigned partition.
#[derive(Debug)]
pub enum OutputSink {
    /// Discard everything; close is a no-op.
    Null,
    /// Buffer lines to a file, sorted in place on close.
    File(FileSink),
}

pub struct FileSink {
    path: PathBuf,
    /// `None` once the sink has degraded after an I/O failure.
    writer: Option<BufWriter<File>>,
    /// Receives the in-place sort's reports on close.
    progress: ProgressFn,
}

impl fmt::Debug for FileSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileSink")
            .field("path", &self.path)
            .field("degraded", &self.writer.is_none())
            .finish()
    }
}

impl OutputSink {
    /// Create a file sink, truncating any existing file at `path`.
    pub fn create(path: PathBuf, progress: ProgressFn) -> Result<OutputSink, SearchError> {
        let file = File::create(&path)?;
        Ok(OutputSink::File(FileSink {
            path,
            writer: Some(BufWriter::new(file)),
            progress,
        }))
    }

    /// Write one accepted code as a line. Never fails: a file error degrades
    /// this sink to discarding.
    pub fn write_code(&mut self, code: &CodeState) {
        let OutputSink::File(sink) = self else {
            return;
        };
        let Some(writer) = sink.writer.as_mut() else {
            return;
        };
        if let Err(err) = writeln!(writer, "{}", code.to_line()) {
            error!(path = %sink.path.display(), %err, "write failed; discarding further codes");
            sink.writer = None;
        }
    }

    /// Flush and sort the file in place. Errors are logged, not propagated;
    /// an unsortable partial file is still better than none.
    pub fn close(self) {
        let OutputSink::File(mut sink) = self else {
            return;
        };
        let Some(mut writer) = sink.writer.take() else {
            // Degraded sink: leave whatever made it to disk unsorted.
            return;
        };
        if let Err(err) = writer.flush() {
            error!(path = %sink.path.display(), %err, "flush failed");
            return;
        }
        drop(writer);
        if let Err(err) = external_sort::sort_file(&sink.path, &sink.progress) {
            error!(path = %sink.path.display(), %err, "in-place sort failed");
        }
    }
}
