// src/tests/logstore_tests.rs

//! tests for `logstore.rs`

use crate::common::{FPath, ResultS3};
use crate::data::line::LogLine;
use crate::debug::helpers::{
    create_file_bytes_name_in_tmpdir,
    create_room_in_tmpdir,
    create_temp_dir,
};
use crate::readers::helpers::basename;
use crate::readers::logstore::{DayFile, DayFiles, LogStore};
use crate::tests::common::{ymd, DAY_20161110, DAY_20161111, ROOM};

use ::test_case::test_case;

#[test]
fn test_list_days_sorted_descending() {
    let tmpdir = create_temp_dir();
    let room: FPath = create_room_in_tmpdir(
        &tmpdir,
        ROOM,
        &[
            ("2016-11-11.log", DAY_20161111),
            ("2016-11-10.log", DAY_20161110),
            ("2016-11-12.log", ""),
        ],
    );
    let mut logstore = LogStore::new(room);
    let dayfiles: DayFiles = logstore.list_days(&ymd(2016, 11, 30)).unwrap();
    let dates: Vec<_> = dayfiles.iter().map(|df| df.date).collect();
    assert_eq!(dates, vec![ymd(2016, 11, 12), ymd(2016, 11, 11), ymd(2016, 11, 10)]);
    assert_eq!(basename(&dayfiles[0].path), "2016-11-12.log");
    assert_eq!(logstore.ignored(), 0);
}

#[test_case(2016, 11, 11, 2; "on a file date")]
#[test_case(2016, 11, 10, 1; "oldest file date")]
#[test_case(2016, 11, 9, 0; "before all")]
#[test_case(2020, 1, 1, 3; "after all")]
fn test_list_days_until(y: i32, m: u32, d: u32, expect: usize) {
    let tmpdir = create_temp_dir();
    let room: FPath = create_room_in_tmpdir(
        &tmpdir,
        ROOM,
        &[
            ("2016-11-10.log", DAY_20161110),
            ("2016-11-11.log", DAY_20161111),
            ("2016-11-12.log", DAY_20161111),
        ],
    );
    let mut logstore = LogStore::new(room);
    let dayfiles: DayFiles = logstore.list_days(&ymd(y, m, d)).unwrap();
    assert_eq!(dayfiles.len(), expect);
}

#[test]
fn test_list_days_ignores_other_names() {
    let tmpdir = create_temp_dir();
    let room: FPath = create_room_in_tmpdir(
        &tmpdir,
        ROOM,
        &[
            ("2016-11-10.log", DAY_20161110),
            ("2016-11-10.log.bak", DAY_20161110),
            ("2016-02-31.log", DAY_20161110),
            ("notes.txt", "x"),
        ],
    );
    let mut logstore = LogStore::new(room);
    let dayfiles: DayFiles = logstore.list_days(&ymd(2016, 12, 31)).unwrap();
    assert_eq!(dayfiles.len(), 1);
    assert_eq!(dayfiles[0].date, ymd(2016, 11, 10));
    assert_eq!(logstore.ignored(), 3);
}

#[test]
fn test_list_days_missing_dir() {
    let tmpdir = create_temp_dir();
    let missing: FPath = crate::readers::helpers::path_to_fpath(&tmpdir.path().join("#nope"));
    let mut logstore = LogStore::new(missing);
    assert!(logstore.list_days(&ymd(2016, 11, 12)).is_err());
}

#[test]
fn test_read_day() {
    let tmpdir = create_temp_dir();
    let room: FPath = create_room_in_tmpdir(&tmpdir, ROOM, &[("2016-11-11.log", DAY_20161111)]);
    let mut logstore = LogStore::new(room);
    let dayfiles: DayFiles = logstore.list_days(&ymd(2016, 11, 11)).unwrap();
    let lines: Vec<LogLine> = match logstore.read_day(&dayfiles[0]) {
        ResultS3::Found(val) => val,
        result => panic!("unexpected {}", result),
    };
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0].text, "[09:00:00] <carol> six");
    assert_eq!(lines[2].text, "[09:02:00] <carol> eight");
    assert_eq!(lines[2].index, 2);
    assert!(lines.iter().all(|line| line.date == ymd(2016, 11, 11)));
}

#[test]
fn test_read_day_crlf_and_invalid_utf8() {
    let tmpdir = create_temp_dir();
    let data: &[u8] = b"[09:00:00] <carol> crlf\r\n[09:01:00] <dave> bad \xFF byte\n";
    let path: FPath = create_file_bytes_name_in_tmpdir(data, "2016-11-11.log", &tmpdir);
    let logstore = LogStore::new(crate::readers::helpers::path_to_fpath(tmpdir.path()));
    let dayfile = DayFile {
        date: ymd(2016, 11, 11),
        path,
    };
    let lines: Vec<LogLine> = logstore.read_day(&dayfile).ok().unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].text, "[09:00:00] <carol> crlf");
    assert_eq!(lines[1].text, "[09:01:00] <dave> bad \u{FFFD} byte");
}

#[test]
fn test_read_day_empty() {
    let tmpdir = create_temp_dir();
    let path: FPath = create_file_bytes_name_in_tmpdir(b"", "2016-11-11.log", &tmpdir);
    let logstore = LogStore::new(crate::readers::helpers::path_to_fpath(tmpdir.path()));
    let dayfile = DayFile {
        date: ymd(2016, 11, 11),
        path,
    };
    assert!(logstore.read_day(&dayfile).is_done());
}

#[test]
fn test_read_day_missing_file() {
    let tmpdir = create_temp_dir();
    let logstore = LogStore::new(crate::readers::helpers::path_to_fpath(tmpdir.path()));
    let dayfile = DayFile {
        date: ymd(2016, 11, 11),
        path: crate::readers::helpers::path_to_fpath(&tmpdir.path().join("2016-11-11.log")),
    };
    assert!(logstore.read_day(&dayfile).is_err());
}
