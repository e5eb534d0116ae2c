use crate::deshaker_log::parser::LogRecordParser;
use crate::prelude::{DeltaRecord, PipelineResult};
use log::warn;
use std::io::{BufRead, Lines};

/// Forward-only iterator over the records of a Deshaker log.
///
/// Blank lines are skipped. The first I/O or parse failure is yielded once
/// and ends the iteration.
pub struct LogRecords<R> {
    lines: Lines<R>,
    parser: LogRecordParser,
    line_number: usize,
    failed: bool,
}

impl<R: BufRead> LogRecords<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            parser: LogRecordParser::new(),
            line_number: 0,
            failed: false,
        }
    }
}

/// A stream of parsed records that knows how much of its input it consumed.
pub trait RecordSource: Iterator<Item = PipelineResult<DeltaRecord>> {
    /// Number of physical lines consumed so far, blank ones included.
    fn lines_read(&self) -> usize;
}

impl<R: BufRead> RecordSource for LogRecords<R> {
    fn lines_read(&self) -> usize {
        self.line_number
    }
}

impl<R: BufRead> Iterator for LogRecords<R> {
    type Item = PipelineResult<DeltaRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(err) => {
                    self.failed = true;
                    return Some(Err(err.into()));
                }
            };
            self.line_number += 1;

            if line.trim().is_empty() {
                warn!("skipping blank line {}", self.line_number);
                continue;
            }

            let parsed = self.parser.parse_line(&line, self.line_number);
            if parsed.is_err() {
                self.failed = true;
            }
            return Some(parsed.map_err(Into::into));
        }
    }
}
