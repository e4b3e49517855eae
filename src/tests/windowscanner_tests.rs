// src/tests/windowscanner_tests.rs

//! tests for `windowscanner.rs`

use crate::common::FPath;
use crate::data::datetime::Anchor;
use crate::data::message::CanonicalMessage;
use crate::debug::helpers::{
    create_dir_in_tmpdir,
    create_room_in_tmpdir,
    create_temp_dir,
    TempDir,
};
use crate::printer::formatter::EventFormatter;
use crate::readers::classifier::LineClassifier;
use crate::readers::logstore::LogStore;
use crate::readers::windowscanner::{Direction, ScanState, WindowScanner};
use crate::tests::common::{
    anchor,
    DAY_20161110,
    DAY_20161111,
    DAY_20161112_MIXED,
    DAY_20161112_ONE,
    ROOM,
};

use std::path::PathBuf;

use ::more_asserts::assert_le;
use ::test_case::test_case;

/// room with day files 2016-11-10, 2016-11-11, 2016-11-12 (mixed)
fn room_three_days() -> (TempDir, FPath) {
    let tmpdir = create_temp_dir();
    let room: FPath = create_room_in_tmpdir(
        &tmpdir,
        ROOM,
        &[
            ("2016-11-10.log", DAY_20161110),
            ("2016-11-11.log", DAY_20161111),
            ("2016-11-12.log", DAY_20161112_MIXED),
        ],
    );

    (tmpdir, room)
}

fn scan(
    room: &FPath,
    anchor_: Anchor,
    direction: Direction,
    limit: usize,
    extras: bool,
    strip: bool,
) -> Vec<CanonicalMessage> {
    let formatter = EventFormatter::default();
    let mut scanner = WindowScanner::new(
        LogStore::new(room.clone()),
        LineClassifier::new(extras),
        &formatter,
        anchor_,
        direction,
        limit,
        strip,
        String::from(ROOM),
    );
    let messages = scanner.scan();
    assert_eq!(scanner.state(), ScanState::Done);
    assert_le!(messages.len(), limit);

    messages
}

/// the trailing parameter of each message, or the command when there is none
fn texts(messages: &[CanonicalMessage]) -> Vec<String> {
    messages
        .iter()
        .map(|m| match &m.trailing {
            Some(t) if m.command == "PRIVMSG" || m.command == "NOTICE" => t.clone(),
            _ => m.command.clone(),
        })
        .collect()
}

#[test]
fn test_scan_single_line_backward() {
    let tmpdir = create_temp_dir();
    let room: FPath = create_room_in_tmpdir(&tmpdir, ROOM, &[("2016-11-12.log", DAY_20161112_ONE)]);
    let messages = scan(&room, anchor(2016, 11, 12, 13, 10, 5), Direction::Backward, 1, false, false);
    assert_eq!(messages.len(), 1);
    assert_eq!(
        messages[0].to_string(),
        "@time=2016-11-12T13:10:01.000Z :alice!chathistory@znc.in PRIVMSG #rust :hello"
    );
}

#[test]
fn test_scan_anchor_time_is_exclusive() {
    let tmpdir = create_temp_dir();
    let room: FPath = create_room_in_tmpdir(&tmpdir, ROOM, &[("2016-11-12.log", DAY_20161112_ONE)]);
    let at = anchor(2016, 11, 12, 13, 10, 1);
    assert!(scan(&room, at, Direction::Backward, 5, false, false).is_empty());
    assert!(scan(&room, at, Direction::Forward, 5, false, false).is_empty());
}

#[test]
fn test_scan_forward_partial() {
    let tmpdir = create_temp_dir();
    let room: FPath = create_room_in_tmpdir(&tmpdir, ROOM, &[("2016-11-10.log", DAY_20161110)]);
    let messages = scan(&room, anchor(2016, 11, 10, 10, 2, 30), Direction::Forward, 5, false, false);
    assert_eq!(texts(&messages), vec!["four", "five"]);
}

#[test]
fn test_scan_backward_crosses_days() {
    let (_tmpdir, room) = room_three_days();
    let messages = scan(&room, anchor(2016, 11, 12, 12, 4, 30), Direction::Backward, 5, false, false);
    assert_eq!(texts(&messages), vec!["seven", "eight", "nine", "ten", "eleven"]);
}

#[test]
fn test_scan_backward_extras() {
    let (_tmpdir, room) = room_three_days();
    let messages = scan(&room, anchor(2016, 11, 12, 12, 4, 30), Direction::Backward, 5, true, false);
    assert_eq!(texts(&messages), vec!["nine", "JOIN", "ten", "MODE", "eleven"]);
}

#[test]
fn test_scan_ascending_order() {
    let (_tmpdir, room) = room_three_days();
    for direction in [Direction::Backward, Direction::Forward] {
        let messages = scan(&room, anchor(2016, 11, 12, 12, 5, 0), direction, 50, true, false);
        assert!(!messages.is_empty());
        let times: Vec<&str> = messages
            .iter()
            .map(|m| m.tag_value("time").unwrap())
            .collect();
        let mut sorted: Vec<&str> = times.clone();
        sorted.sort();
        assert_eq!(times, sorted, "{:?}", direction);
    }
}

#[test]
fn test_scan_anchor_day_without_file() {
    let (_tmpdir, room) = room_three_days();
    let messages = scan(&room, anchor(2016, 11, 13, 0, 0, 0), Direction::Backward, 3, false, false);
    assert_eq!(texts(&messages), vec!["twelve", "thirteen", "fourteen"]);
}

#[test]
fn test_scan_before_all_days() {
    let (_tmpdir, room) = room_three_days();
    let messages = scan(&room, anchor(2016, 11, 9, 23, 59, 59), Direction::Backward, 3, false, false);
    assert!(messages.is_empty());
}

#[test_case(1, 1; "one")]
#[test_case(3, 3; "three")]
#[test_case(8, 8; "eight")]
#[test_case(100, 14; "more than available")]
fn test_scan_limit(limit: usize, expect: usize) {
    let (_tmpdir, room) = room_three_days();
    let messages = scan(&room, anchor(2016, 12, 1, 0, 0, 0), Direction::Backward, limit, false, false);
    assert_eq!(messages.len(), expect);
}

#[test]
fn test_scan_stops_at_limit() {
    let (_tmpdir, room) = room_three_days();
    let formatter = EventFormatter::default();
    let mut scanner = WindowScanner::new(
        LogStore::new(room),
        LineClassifier::new(false),
        &formatter,
        anchor(2016, 12, 1, 0, 0, 0),
        Direction::Backward,
        2,
        false,
        String::from(ROOM),
    );
    let messages = scanner.scan();
    assert_eq!(texts(&messages), vec!["thirteen", "fourteen"]);
    let summary = scanner.summary();
    assert_eq!(summary.LogStore_days, 3);
    assert_eq!(summary.WindowScanner_days_read, 1);
    assert_eq!(summary.WindowScanner_lines, 2);
    assert_eq!(summary.WindowScanner_messages, 2);
}

#[test]
fn test_scan_strip() {
    let tmpdir = create_temp_dir();
    let room: FPath = create_room_in_tmpdir(
        &tmpdir,
        ROOM,
        &[("2016-11-12.log", "[13:10:01] <alice> \x02bold\x02 and \x0304red\x03\n")],
    );
    let at = anchor(2016, 11, 12, 14, 0, 0);
    let stripped = scan(&room, at, Direction::Backward, 1, false, true);
    assert_eq!(texts(&stripped), vec!["bold and red"]);
    let raw = scan(&room, at, Direction::Backward, 1, false, false);
    assert_eq!(texts(&raw), vec!["\x02bold\x02 and \x0304red\x03"]);
}

#[test]
fn test_scan_missing_room() {
    let tmpdir = create_temp_dir();
    let room: FPath = crate::readers::helpers::path_to_fpath(&tmpdir.path().join("#nope"));
    let formatter = EventFormatter::default();
    let mut scanner = WindowScanner::new(
        LogStore::new(room),
        LineClassifier::new(false),
        &formatter,
        anchor(2016, 11, 12, 0, 0, 0),
        Direction::Backward,
        5,
        false,
        String::from(ROOM),
    );
    assert!(scanner.scan().is_empty());
    assert!(scanner.summary().error.is_some());
}

#[test]
fn test_scan_skips_unreadable_day() {
    let tmpdir = create_temp_dir();
    let room: FPath = create_room_in_tmpdir(&tmpdir, ROOM, &[("2016-11-10.log", DAY_20161110)]);
    // a directory named like a day file cannot be read
    create_dir_in_tmpdir(&PathBuf::from(format!("{}/2016-11-11.log", ROOM)), &tmpdir);
    let formatter = EventFormatter::default();
    let mut scanner = WindowScanner::new(
        LogStore::new(room),
        LineClassifier::new(false),
        &formatter,
        anchor(2016, 11, 12, 0, 0, 0),
        Direction::Backward,
        2,
        false,
        String::from(ROOM),
    );
    let messages = scanner.scan();
    assert_eq!(texts(&messages), vec!["four", "five"]);
    assert_eq!(scanner.summary().LogStore_days, 2);
    assert_eq!(scanner.summary().WindowScanner_days_failed, 1);
    assert!(scanner.summary().error.is_some());
}

#[test]
fn test_scan_empty_day() {
    let tmpdir = create_temp_dir();
    let room: FPath = create_room_in_tmpdir(
        &tmpdir,
        ROOM,
        &[("2016-11-11.log", DAY_20161111), ("2016-11-12.log", "")],
    );
    let formatter = EventFormatter::default();
    let mut scanner = WindowScanner::new(
        LogStore::new(room),
        LineClassifier::new(false),
        &formatter,
        anchor(2016, 11, 12, 23, 0, 0),
        Direction::Backward,
        10,
        false,
        String::from(ROOM),
    );
    assert_eq!(texts(&scanner.scan()), vec!["six", "seven", "eight"]);
    assert_eq!(scanner.summary().WindowScanner_days_empty, 1);
    assert_eq!(scanner.summary().WindowScanner_days_read, 2);
}
