// src/tests/common.rs

//! Common data and helpers for tests.

use crate::data::datetime::{
    Anchor,
    ClockTime,
    LogDate,
    NaiveDate,
    NaiveTime,
};

pub fn ymd(y: i32, m: u32, d: u32) -> LogDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn hms(h: u32, m: u32, s: u32) -> ClockTime {
    NaiveTime::from_hms_opt(h, m, s).unwrap()
}

pub fn anchor(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> Anchor {
    Anchor::new(ymd(y, mo, d), hms(h, mi, s))
}

/// room directory of the test rooms, relative to a temporary directory
pub const ROOM: &str = "#rust";

/// one message, the canonical single-line example
pub const DAY_20161112_ONE: &str = "[13:10:01] <alice> hello\n";

/// five messages one minute apart, 10:00 to 10:04
pub const DAY_20161110: &str = "\
[10:00:00] <alice> one
[10:01:00] <bob> two
[10:02:00] <alice> three
[10:03:00] <bob> four
[10:04:00] <alice> five
";

/// three messages, 09:00 to 09:02
pub const DAY_20161111: &str = "\
[09:00:00] <carol> six
[09:01:00] <dave> seven
[09:02:00] <carol> eight
";

/// messages mixed with extras and garbage, 12:00 to 12:09
pub const DAY_20161112_MIXED: &str = "\
[12:00:00] <alice> nine
[12:01:00] *** Joins: bob (bobby@example.org)
[12:02:00] -bob- ten
this line has no clock
[12:03:00] *** alice sets mode: +o bob
[12:04:00] <bob> eleven
[12:05:00] *** Quits: carol (carol@example.net) (Quit: bye)
[12:06:00] <alice> twelve
[12:07:00] *** bob changes topic to 'rust things'
[12:08:00] <bob> thirteen
[12:09:00] <alice> fourteen
";
