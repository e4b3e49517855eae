// src/readers/summary.rs

//! Implements `SummaryScan` statistics tracking struct.

#![allow(non_snake_case)]

use crate::common::Count;

use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SummaryScan
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Accumulated statistics about the scanning activity of a single query
/// processed by a [`WindowScanner`] and it's underlying [`LogStore`].
///
/// For CLI option `--summary`.
///
/// [`WindowScanner`]: crate::readers::windowscanner::WindowScanner
/// [`LogStore`]: crate::readers::logstore::LogStore
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SummaryScan {
    /// `LogStore::list_days` count of day files on or before the anchor date
    pub LogStore_days: Count,
    /// `LogStore::list_days` count of directory entries ignored for their name
    pub LogStore_ignored: Count,
    /// day files read
    pub WindowScanner_days_read: Count,
    /// day files that could not be read and were skipped
    pub WindowScanner_days_failed: Count,
    /// day files that were empty
    pub WindowScanner_days_empty: Count,
    /// lines visited
    pub WindowScanner_lines: Count,
    /// lines on the anchor day on the wrong side of the anchor time
    pub WindowScanner_lines_filtered: Count,
    /// lines that matched no known pattern, or were extras with extras disabled
    pub WindowScanner_lines_unclassified: Count,
    /// lines collected into the result
    pub WindowScanner_messages: Count,
    /// The first encountered [`Error`], if any, as a `String`.
    ///
    /// Annoyingly, cannot [Clone or Copy `Error`].
    ///
    /// [`Error`]: std::io::Error
    /// [Clone or Copy `Error`]: https://github.com/rust-lang/rust/issues/24135
    pub error: Option<String>,
}

impl SummaryScan {
    /// Record `error` if no error was recorded before.
    pub fn set_error(&mut self, error: &std::io::Error) {
        if self.error.is_none() {
            self.error = Some(error.to_string());
        }
    }
}

impl fmt::Display for SummaryScan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "day files           : {}", self.LogStore_days)?;
        writeln!(f, "  ignored entries   : {}", self.LogStore_ignored)?;
        writeln!(f, "  read              : {}", self.WindowScanner_days_read)?;
        writeln!(f, "  failed            : {}", self.WindowScanner_days_failed)?;
        writeln!(f, "  empty             : {}", self.WindowScanner_days_empty)?;
        writeln!(f, "lines               : {}", self.WindowScanner_lines)?;
        writeln!(f, "  filtered          : {}", self.WindowScanner_lines_filtered)?;
        writeln!(f, "  unclassified      : {}", self.WindowScanner_lines_unclassified)?;
        writeln!(f, "messages            : {}", self.WindowScanner_messages)?;
        match &self.error {
            Some(error) => write!(f, "error               : {}", error),
            None => write!(f, "error               : None"),
        }
    }
}
