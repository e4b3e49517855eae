// src/data/datetime.rs

//! Functions and types for the datetimes found in chat logs and in client
//! queries.
//!
//! A day file carries the calendar date in its file name, e.g.
//! `2016-11-12.log`. Each line within carries only a clock time, e.g.
//! `[13:10:01]`. Combined they make a [`LogDateTime`], rendered into the
//! IRCv3 `server-time` tag value `2016-11-12T13:10:01.000Z`.
//!
//! A client query carries an [`Anchor`], written the same way as a
//! `server-time` tag value.

use std::fmt;

pub use ::chrono::{
    NaiveDate,
    NaiveDateTime,
    NaiveTime,
};
use ::lazy_static::lazy_static;
use ::regex::Regex;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// types and formats
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The calendar date of a day file.
pub type LogDate = NaiveDate;
pub type LogDateOpt = Option<LogDate>;

/// The clock time of a log line, taken from the leading `[HH:MM:SS]`.
pub type ClockTime = NaiveTime;
pub type ClockTimeOpt = Option<ClockTime>;

/// A [`LogDate`] combined with a [`ClockTime`]. Always interpreted as UTC.
pub type LogDateTime = NaiveDateTime;

/// [`chrono` strftime] format of the date portion of a day file name.
///
/// [`chrono` strftime]: https://docs.rs/chrono/latest/chrono/format/strftime/
pub const FILENAME_DATE_FORMAT: &str = "%Y-%m-%d";

/// File name extension of a day file.
pub const FILENAME_EXTENSION: &str = "log";

/// [`chrono` strftime] format of the clock time within a log line.
///
/// [`chrono` strftime]: https://docs.rs/chrono/latest/chrono/format/strftime/
pub const CLOCK_FORMAT: &str = "%H:%M:%S";

/// [`chrono` strftime] format of an IRCv3 `server-time` value, absolute UTC
/// with millisecond precision.
///
/// [`chrono` strftime]: https://docs.rs/chrono/latest/chrono/format/strftime/
pub const SERVER_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Name of the IRCv3 `server-time` message tag.
pub const SERVER_TIME_TAG: &str = "time";

lazy_static! {
    /// A strict day file name, e.g. `2016-11-12.log`.
    static ref REGEX_FILENAME: Regex = Regex::new(
        r"^(\d{4}-\d{2}-\d{2})\.log$"
    ).unwrap();

    /// A query anchor, e.g. `2016-11-12T13:10:01.000Z`.
    /// Some clients send it as `timestamp=2016-11-12T13:10:01.000Z`.
    static ref REGEX_ANCHOR: Regex = Regex::new(
        r"(?i)^(?:timestamp=)?([0-9]{4}-[0-1][0-9]-[0-3][0-9])T([0-2][0-9]:[0-5][0-9]:[0-5][0-9])\.[0-9]{3}Z$"
    ).unwrap();
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Anchor
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The reference datetime a query scans relative to.
///
/// Sub-second precision of the client's value is discarded; log lines only
/// record whole seconds.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Anchor {
    pub date: LogDate,
    pub time: ClockTime,
}

impl Anchor {
    pub fn new(date: LogDate, time: ClockTime) -> Anchor {
        Anchor { date, time }
    }

    /// Parse a client-supplied anchor such as `2016-11-12T13:10:01.000Z`.
    ///
    /// Returns `None` for anything not matching that exact shape or naming
    /// an impossible date or time.
    pub fn parse(value: &str) -> Option<Anchor> {
        defn!("({:?})", value);
        let captures = match REGEX_ANCHOR.captures(value) {
            Some(val) => val,
            None => {
                defx!("no regex match; return None");
                return None;
            }
        };
        let date = NaiveDate::parse_from_str(&captures[1], FILENAME_DATE_FORMAT).ok()?;
        let time = parse_clock(&captures[2])?;
        let anchor = Anchor::new(date, time);
        defx!("return {:?}", anchor);

        Some(anchor)
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", server_time(&self.date, &self.time))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// helper functions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Return the date embedded in a day file name, e.g. `2016-11-12.log`.
///
/// Names that are not exactly `YYYY-MM-DD.log`, or that name an impossible
/// date like `2016-02-31.log`, return `None`.
pub fn filename_to_date(name: &str) -> LogDateOpt {
    let captures = REGEX_FILENAME.captures(name)?;
    match NaiveDate::parse_from_str(&captures[1], FILENAME_DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(_err) => {
            defñ!("NaiveDate::parse_from_str({:?}) failed {}", &captures[1], _err);
            None
        }
    }
}

/// Return the day file name for `date`, e.g. `2016-11-12.log`.
pub fn date_to_filename(date: &LogDate) -> String {
    format!("{}.{}", date.format(FILENAME_DATE_FORMAT), FILENAME_EXTENSION)
}

/// Parse a `HH:MM:SS` clock time.
pub fn parse_clock(value: &str) -> ClockTimeOpt {
    NaiveTime::parse_from_str(value, CLOCK_FORMAT).ok()
}

/// Render a `server-time` value, e.g. `2016-11-12T13:10:01.000Z`.
pub fn server_time(date: &LogDate, time: &ClockTime) -> String {
    let dt: LogDateTime = NaiveDateTime::new(*date, *time);

    dt.format(SERVER_TIME_FORMAT).to_string()
}
