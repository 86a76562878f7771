// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! External merge sort over line-oriented files.
//!
//! Two phases, after the classic external-memory sort design:
//!
//! 1. **Batch sort**: read the source in bounded blocks, sort each block in
//!    memory, spill it to a run file next to the source.
//! 2. **k-way merge**: one cursor per run, a priority queue keyed by each
//!    cursor's next line; pop the minimum, write, refill. A run file is
//!    deleted the moment its cursor is exhausted.
//!
//! [`sort_file`] combines both phases to sort one file in place; the
//! dispatcher calls [`merge_sorted_files`] directly on the per-worker files,
//! since merging pre-sorted runs is cheaper than re-sorting their
//! concatenation.

use crate::report::ProgressFn;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Upper bound on run files produced by the batch phase.
const MAX_RUN_FILES: u64 = 1024;

/// In-memory block budget for the batch phase.
const MEMORY_BUDGET: u64 = 64 * 1024 * 1024;

/// Pick a block size: large enough to stay under [`MAX_RUN_FILES`] runs,
/// small enough to respect the memory budget when the file allows it.
fn block_size(file_len: u64) -> u64 {
    let min_for_fan_out = file_len / MAX_RUN_FILES;
    min_for_fan_out.max(MEMORY_BUDGET / 2)
}

/// One pre-sorted input to the merge: a run file and its cached next line.
///
/// Ordered by the cached line so it can live in the merge heap; exhausted
/// sources delete their file immediately.
struct MergeSource {
    path: PathBuf,
    reader: BufReader<File>,
    head: String,
}

impl MergeSource {
    /// Open a run file. Returns `None` for an empty run, deleting it.
    fn open(path: PathBuf) -> io::Result<Option<MergeSource>> {
        let reader = BufReader::new(File::open(&path)?);
        let mut source = MergeSource {
            path,
            reader,
            head: String::new(),
        };
        if source.reload()? {
            Ok(Some(source))
        } else {
            source.delete();
            Ok(None)
        }
    }

    /// Read the next line into `head`. False on end of input; a blank line
    /// also terminates the source (codes are never blank).
    fn reload(&mut self) -> io::Result<bool> {
        self.head.clear();
        let n = self.reader.read_line(&mut self.head)?;
        if self.head.ends_with('\n') {
            self.head.pop();
        }
        Ok(n > 0 && !self.head.is_empty())
    }

    fn delete(&self) {
        if let Err(err) = fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), %err, "could not delete temporary file");
        }
    }
}

impl PartialEq for MergeSource {
    fn eq(&self, other: &Self) -> bool {
        self.head == other.head
    }
}

impl Eq for MergeSource {}

impl PartialOrd for MergeSource {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MergeSource {
    fn cmp(&self, other: &Self) -> Ordering {
        self.head.cmp(&other.head)
    }
}

/// Merge pre-sorted files into `output`, reporting progress as
/// `lines_written / expected_lines`. Every input file is deleted as soon as
/// it is exhausted.
pub fn merge_sorted_files(
    files: Vec<PathBuf>,
    output: &Path,
    progress: &ProgressFn,
    expected_lines: u64,
) -> io::Result<()> {
    let mut heap = BinaryHeap::new();
    for path in files {
        if let Some(source) = MergeSource::open(path)? {
            heap.push(Reverse(source));
        }
    }

    let mut writer = BufWriter::new(File::create(output)?);
    let denominator = expected_lines.max(1) as f32;
    let mut written = 0u64;

    while let Some(Reverse(mut source)) = heap.pop() {
        writer.write_all(source.head.as_bytes())?;
        writer.write_all(b"\n")?;
        written += 1;
        progress("Merging files...", written as f32 / denominator);

        if source.reload()? {
            heap.push(Reverse(source));
        } else {
            source.delete();
        }
    }
    writer.flush()?;
    progress("Closing files...", 1.0);
    debug!(output = %output.display(), lines = written, "merge complete");
    Ok(())
}

/// Batch phase: split `input` into sorted run files placed next to it,
/// reporting bytes consumed against the file length.
fn sort_in_batch(input: &Path, progress: &ProgressFn) -> io::Result<(Vec<PathBuf>, u64)> {
    let file_len = fs::metadata(input)?.len();
    let block = block_size(file_len);
    let mut reader = BufReader::new(File::open(input)?);
    let mut runs = Vec::new();
    let mut lines: Vec<String> = Vec::new();
    let mut total_lines = 0u64;
    let mut consumed = 0u64;
    let mut block_bytes = 0u64;
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let n = reader.read_line(&mut buffer)?;
        if n > 0 {
            if buffer.ends_with('\n') {
                buffer.pop();
            }
            block_bytes += buffer.len() as u64 + 1;
            total_lines += 1;
            lines.push(buffer.clone());
            if block_bytes < block {
                continue;
            }
        }
        if !lines.is_empty() {
            runs.push(save_run(input, runs.len(), &mut lines)?);
            consumed += block_bytes;
            block_bytes = 0;
            progress("Sorting files...", consumed as f32 / file_len.max(1) as f32);
        }
        if n == 0 {
            return Ok((runs, total_lines));
        }
    }
}

/// Sort one block and spill it to a run file.
fn save_run(input: &Path, index: usize, lines: &mut Vec<String>) -> io::Result<PathBuf> {
    lines.sort_unstable();
    let mut path = input.to_path_buf();
    path.set_extension(format!("run{:04}", index));
    let mut writer = BufWriter::new(File::create(&path)?);
    for line in lines.iter() {
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    lines.clear();
    Ok(path)
}

/// Sort `path` in place: batch-sort into runs, then merge the runs back over
/// the original file.
pub fn sort_file(path: &Path, progress: &ProgressFn) -> io::Result<()> {
    let (runs, lines) = sort_in_batch(path, progress)?;
    merge_sorted_files(runs, path, progress, lines)
}
