// src/data/line.rs

//! Implement [`LogLine`], one line of text from a day file.

use crate::data::datetime::{
    parse_clock,
    ClockTimeOpt,
    LogDate,
};
use crate::debug::printers::str_to_String_noraw;

use std::borrow::Cow;
use std::fmt;

use ::lazy_static::lazy_static;
use ::regex::Regex;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// LogLine
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Index of a line within its day file, starting at zero.
pub type LineIndex = usize;

lazy_static! {
    /// The leading clock time of every log line, e.g. `[13:10:01]`.
    static ref REGEX_CLOCK: Regex = Regex::new(
        r"^\[(\d{2}:\d{2}:\d{2})\]"
    ).unwrap();

    /// In-band text styling and color control sequences.
    ///
    /// bold `\x02`, color `\x03` with optional `fg[,bg]`, reset `\x0F`,
    /// reverse `\x16`, italic `\x1D`, underline `\x1F`.
    static ref REGEX_CONTROL_CODES: Regex = Regex::new(
        r"\x02|\x03(?:\d{1,2}(?:,\d{1,2})?)?|\x0F|\x16|\x1D|\x1F"
    ).unwrap();
}

/// One line of a day file.
///
/// The trailing newline (and carriage return, if any) is not part of `text`.
#[derive(Clone, Eq, PartialEq)]
pub struct LogLine {
    /// date of the day file this line came from
    pub date: LogDate,
    /// position of this line in the day file
    pub index: LineIndex,
    pub text: String,
}

impl fmt::Debug for LogLine {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        f.debug_struct("LogLine")
            .field("date", &self.date)
            .field("index", &self.index)
            .field("text", &str_to_String_noraw(&self.text))
            .finish()
    }
}

impl LogLine {
    pub fn new(date: LogDate, index: LineIndex, text: String) -> LogLine {
        LogLine { date, index, text }
    }

    /// The clock time from the leading `[HH:MM:SS]`, if there is a valid one.
    pub fn clock(&self) -> ClockTimeOpt {
        let captures = REGEX_CLOCK.captures(&self.text)?;

        parse_clock(&captures[1])
    }

    /// Remove text styling and color control sequences from `text`.
    pub fn strip_control_codes(&mut self) {
        if let Cow::Owned(stripped) = strip_control_codes(&self.text) {
            self.text = stripped;
        }
    }
}

/// Remove text styling and color control sequences.
///
/// Idempotent; stripping an already stripped `str` returns it unchanged.
pub fn strip_control_codes(text: &str) -> Cow<'_, str> {
    REGEX_CONTROL_CODES.replace_all(text, "")
}
