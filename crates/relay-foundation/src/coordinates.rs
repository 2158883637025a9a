//! Coordinate resolution
//!
//! Converts 1-based `(line, column)` positions into byte offsets within a text
//! buffer. Columns count characters, offsets count bytes, so the returned
//! offset can be used to slice the buffer directly.
//!
//! Line counting follows `str::lines`: a trailing line terminator does not open
//! a new line, and an empty buffer consists of a single empty line.

use crate::error::{RelayError, RelayResult};
use serde::{Deserialize, Serialize};

/// A normalized position inside a buffer. Always `0 <= offset <= buffer.len()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResolvedOffset(usize);

impl ResolvedOffset {
    pub fn new(offset: usize) -> Self {
        Self(offset)
    }

    pub fn value(self) -> usize {
        self.0
    }
}

/// Start/end offsets and character lengths of every line in a buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Byte offset of the first character of each line
    starts: Vec<usize>,
    /// Byte offset one past the last content character of each line (terminator excluded)
    ends: Vec<usize>,
    /// Character count of each line (terminator excluded)
    lengths: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut starts = Vec::new();
        let mut ends = Vec::new();
        let mut lengths = Vec::new();

        let mut start = 0;
        for line in text.split_inclusive('\n') {
            let content = line
                .strip_suffix('\n')
                .map(|l| l.strip_suffix('\r').unwrap_or(l))
                .unwrap_or(line);
            starts.push(start);
            ends.push(start + content.len());
            lengths.push(content.chars().count());
            start += line.len();
        }

        if starts.is_empty() {
            starts.push(0);
            ends.push(0);
            lengths.push(0);
        }

        Self {
            starts,
            ends,
            lengths,
            len: text.len(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    /// Character length of a 1-based line
    pub fn line_length(&self, line: usize) -> Option<usize> {
        line.checked_sub(1).and_then(|idx| self.lengths.get(idx).copied())
    }

    /// Byte offset where a 1-based line starts
    pub fn line_start(&self, line: usize) -> Option<usize> {
        line.checked_sub(1).and_then(|idx| self.starts.get(idx).copied())
    }

    /// Byte offset where a 1-based line's content ends
    pub fn line_end(&self, line: usize) -> Option<usize> {
        line.checked_sub(1).and_then(|idx| self.ends.get(idx).copied())
    }

    pub fn buffer_len(&self) -> usize {
        self.len
    }

    /// Content of a 1-based line, terminator excluded
    pub fn line_text<'a>(&self, text: &'a str, line: usize) -> Option<&'a str> {
        let start = self.line_start(line)?;
        let end = self.line_end(line)?;
        text.get(start..end)
    }

    /// 1-based `(line, column)` of a byte offset
    pub fn position_of(&self, text: &str, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.len);
        let idx = match self.starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        };
        let start = self.starts[idx];
        let column = text
            .get(start..offset)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(0);
        (idx + 1, column + 1)
    }
}

/// Resolve a 1-based coordinate against a buffer
pub fn resolve(
    text: &str,
    index: &LineIndex,
    line: usize,
    column: usize,
) -> RelayResult<ResolvedOffset> {
    let line_count = index.line_count();
    if line < 1 || line > line_count {
        return Err(RelayError::line_out_of_bounds(line, line_count));
    }

    let line_length = index.line_length(line).unwrap_or(0);
    let max_column = line_length + 1;
    if column < 1 || column > max_column {
        return Err(RelayError::column_out_of_bounds(column, line, max_column));
    }

    let start = index.line_start(line).unwrap_or(0);
    let end = index.line_end(line).unwrap_or(start);
    let byte_in_line = text
        .get(start..end)
        .and_then(|content| content.char_indices().nth(column - 1).map(|(i, _)| i))
        .unwrap_or(end - start);

    Ok(ResolvedOffset(start + byte_in_line))
}

/// Resolve a start/end pair for range operations
///
/// Both ends are validated independently, then `start_line <= end_line` is
/// enforced. Columns on the same line are not ordered against each other.
pub fn resolve_range(
    text: &str,
    index: &LineIndex,
    start_line: usize,
    start_column: usize,
    end_line: usize,
    end_column: usize,
) -> RelayResult<(ResolvedOffset, ResolvedOffset)> {
    let start = resolve(text, index, start_line, start_column)?;
    let end = resolve(text, index, end_line, end_column)?;

    if start_line > end_line {
        return Err(RelayError::invalid_field(
            "startLine",
            format!(
                "Start line {} must not be after end line {}",
                start_line, end_line
            ),
        ));
    }

    Ok((start, end))
}
