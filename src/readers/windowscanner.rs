// src/readers/windowscanner.rs

//! Implements a [`WindowScanner`], the driver that walks the day files of a
//! room to collect a window of replayable messages relative to an
//! [`Anchor`].
//!
//! The scan always proceeds from most recent toward least recent:
//! day files newest first, and lines within a day file last first.
//! Each qualifying line is classified and formatted and collected. Scanning
//! stops the moment the limit is reached, or when the day files run out.
//! This keeps the amount of work bounded by the limit, whatever the
//! [`Direction`].
//!
//! A scan is two phases:
//!
//! 1. collect, most recent first (descending)
//! 2. reverse once, so the result is ascending chronological order
//!
//! The anchor time only filters lines of the anchor's own day file. A
//! backward scan keeps lines strictly before the anchor time, a forward scan
//! keeps lines strictly after it. Lines of every older day file qualify.
//!
//! [`Anchor`]: crate::data::datetime::Anchor

use crate::common::Count;
use crate::data::datetime::Anchor;
use crate::data::line::LogLine;
use crate::data::message::CanonicalMessage;
#[allow(unused_imports)]
use crate::debug::printers::{de_err, de_wrn};
use crate::printer::formatter::EventFormatter;
use crate::readers::classifier::LineClassifier;
use crate::readers::logstore::{
    DayFile,
    DayFiles,
    LogStore,
    ResultS3ReadDay,
};
use crate::readers::summary::SummaryScan;

use std::fmt;

use ::more_asserts::debug_assert_le;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Direction, ScanState
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Which side of the anchor a query wants.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    /// lines older than the anchor; a negative count
    Backward,
    /// lines newer than the anchor; a positive count
    Forward,
}

/// The states of a [`WindowScanner`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ScanState {
    /// iterating the lines of the current day file
    ScanningFile,
    /// moving to the next (older) day file
    AdvancingFile,
    /// limit reached or day files exhausted
    Done,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// WindowScanner
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Collects up to `limit` [`CanonicalMessage`]s from a [`LogStore`].
///
/// A `WindowScanner` is used once, for one query.
///
/// [`CanonicalMessage`]: crate::data::message::CanonicalMessage
/// [`LogStore`]: crate::readers::logstore::LogStore
pub struct WindowScanner<'a> {
    logstore: LogStore,
    classifier: LineClassifier,
    formatter: &'a EventFormatter,
    anchor: Anchor,
    direction: Direction,
    /// maximum number of messages to collect, never zero
    limit: usize,
    /// strip control codes before classification
    strip: bool,
    /// room name rendered into each message
    target: String,
    state: ScanState,
    /// collected messages, most recent first
    collected: Vec<CanonicalMessage>,
    summary: SummaryScan,
}

impl fmt::Debug for WindowScanner<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        f.debug_struct("WindowScanner")
            .field("logstore", &self.logstore)
            .field("extras", &self.classifier.extras())
            .field("anchor", &self.anchor)
            .field("direction", &self.direction)
            .field("limit", &self.limit)
            .field("strip", &self.strip)
            .field("target", &self.target)
            .field("state", &self.state)
            .field("collected", &self.collected.len())
            .finish()
    }
}

impl<'a> WindowScanner<'a> {
    /// Create a new `WindowScanner`. `limit` must not be zero.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        logstore: LogStore,
        classifier: LineClassifier,
        formatter: &'a EventFormatter,
        anchor: Anchor,
        direction: Direction,
        limit: usize,
        strip: bool,
        target: String,
    ) -> WindowScanner<'a> {
        debug_assert!(limit > 0, "limit must not be zero");
        WindowScanner {
            logstore,
            classifier,
            formatter,
            anchor,
            direction,
            limit,
            strip,
            target,
            state: ScanState::ScanningFile,
            collected: Vec::with_capacity(limit.min(1024)),
            summary: SummaryScan::default(),
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn summary(&self) -> &SummaryScan {
        &self.summary
    }

    fn limit_reached(&self) -> bool {
        self.collected.len() >= self.limit
    }

    /// Run the scan to completion and return the collected messages in
    /// ascending chronological order.
    ///
    /// An unreadable room directory or day file is not an error; it
    /// contributes nothing.
    pub fn scan(&mut self) -> Vec<CanonicalMessage> {
        defn!("{:?}", self);
        let dayfiles: DayFiles = match self.logstore.list_days(&self.anchor.date) {
            Ok(val) => val,
            Err(err) => {
                de_wrn!("cannot list day files of {:?}; {}", self.logstore.dir(), err);
                self.summary.set_error(&err);
                DayFiles::new()
            }
        };
        self.summary.LogStore_days = dayfiles.len() as Count;
        self.summary.LogStore_ignored = self.logstore.ignored();

        // phase 1: collect, most recent first
        let mut dayfiles_iter = dayfiles.iter();
        let mut dayfile_opt: Option<&DayFile> = dayfiles_iter.next();
        self.state = match dayfile_opt {
            Some(_) => ScanState::ScanningFile,
            None => ScanState::Done,
        };
        loop {
            defo!("state {:?}", self.state);
            match self.state {
                ScanState::ScanningFile => {
                    if let Some(dayfile) = dayfile_opt {
                        self.scan_day(dayfile);
                    }
                    self.state = if self.limit_reached() {
                        ScanState::Done
                    } else {
                        ScanState::AdvancingFile
                    };
                }
                ScanState::AdvancingFile => {
                    dayfile_opt = dayfiles_iter.next();
                    self.state = match dayfile_opt {
                        Some(_) => ScanState::ScanningFile,
                        None => ScanState::Done,
                    };
                }
                ScanState::Done => break,
            }
        }
        debug_assert_le!(self.collected.len(), self.limit);

        // phase 2: ascending chronological order
        let mut messages: Vec<CanonicalMessage> = std::mem::take(&mut self.collected);
        messages.reverse();
        self.summary.WindowScanner_messages = messages.len() as Count;
        defx!("return {} messages", messages.len());

        messages
    }

    /// Does `line` pass the anchor filter?
    ///
    /// Only lines of the anchor's own day are filtered. A line of that day
    /// without a valid clock time cannot be placed and does not qualify.
    fn passes_anchor(&self, line: &LogLine) -> bool {
        if line.date != self.anchor.date {
            return true;
        }
        match line.clock() {
            Some(clock) => match self.direction {
                Direction::Backward => clock < self.anchor.time,
                Direction::Forward => clock > self.anchor.time,
            },
            None => false,
        }
    }

    /// Collect from one day file, last line first, until the limit is
    /// reached.
    fn scan_day(&mut self, dayfile: &DayFile) {
        defn!("({:?})", dayfile.path);
        let lines: Vec<LogLine> = match self.logstore.read_day(dayfile) {
            ResultS3ReadDay::Found(val) => val,
            ResultS3ReadDay::Done => {
                self.summary.WindowScanner_days_read += 1;
                self.summary.WindowScanner_days_empty += 1;
                defx!("empty");
                return;
            }
            ResultS3ReadDay::Err(err) => {
                de_wrn!("skip unreadable day file {:?}; {}", dayfile.path, err);
                self.summary.WindowScanner_days_failed += 1;
                self.summary.set_error(&err);
                defx!("error {}", err);
                return;
            }
        };
        self.summary.WindowScanner_days_read += 1;

        for mut line in lines.into_iter().rev() {
            if self.limit_reached() {
                break;
            }
            self.summary.WindowScanner_lines += 1;
            if self.strip {
                line.strip_control_codes();
            }
            if !self.passes_anchor(&line) {
                self.summary.WindowScanner_lines_filtered += 1;
                continue;
            }
            let message: Option<CanonicalMessage> = self
                .classifier
                .classify(&line)
                .and_then(|event| self.formatter.format(&event, &self.target));
            match message {
                Some(msg) => self.collected.push(msg),
                None => {
                    defo!("unclassified line {}", line.index);
                    self.summary.WindowScanner_lines_unclassified += 1;
                }
            }
        }
        defx!("collected {}", self.collected.len());
    }
}
