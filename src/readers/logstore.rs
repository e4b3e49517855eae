// src/readers/logstore.rs

//! Implements a [`LogStore`], the directory of day files of one room.
//!
//! A room directory looks like
//!
//! ```text
//! users/alice/moddata/log/libera/#rust/
//!     2016-11-10.log
//!     2016-11-11.log
//!     2016-11-12.log
//! ```
//!
//! Entries not named exactly `YYYY-MM-DD.log` are ignored.

use crate::common::{
    Count,
    FPath,
    ResultS3,
};
use crate::data::datetime::{
    filename_to_date,
    LogDate,
};
use crate::data::line::LogLine;
#[allow(unused_imports)]
use crate::debug::printers::{de_err, de_wrn};
use crate::readers::helpers::{
    fpath_to_path,
    path_to_fpath,
};

use std::fmt;
use std::io::{Error, Result};
use std::path::Path;

use ::bstr::ByteSlice;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// DayFile
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One day file of a room.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct DayFile {
    /// date from the file name; first so the derived `Ord` is by date
    pub date: LogDate,
    pub path: FPath,
}

pub type DayFiles = Vec<DayFile>;

/// Result of reading all lines of a [`DayFile`].
pub type ResultS3ReadDay = ResultS3<Vec<LogLine>, Error>;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// LogStore
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The day files of one room, in directory `dir`.
pub struct LogStore {
    dir: FPath,
    /// count of directory entries ignored for their name
    ignored: Count,
}

impl fmt::Debug for LogStore {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        f.debug_struct("LogStore")
            .field("dir", &self.dir)
            .field("ignored", &self.ignored)
            .finish()
    }
}

impl LogStore {
    pub fn new(dir: FPath) -> LogStore {
        defñ!("({:?})", dir);
        LogStore { dir, ignored: 0 }
    }

    pub fn dir(&self) -> &FPath {
        &self.dir
    }

    /// Count of directory entries ignored by the last [`list_days`].
    ///
    /// [`list_days`]: LogStore::list_days
    pub fn ignored(&self) -> Count {
        self.ignored
    }

    /// Day files dated on or before `until`, most recent first.
    ///
    /// Returns `Err` if the room directory cannot be read.
    pub fn list_days(&mut self, until: &LogDate) -> Result<DayFiles> {
        defn!("({:?}) dir {:?}", until, self.dir);
        self.ignored = 0;
        let mut dayfiles = DayFiles::new();
        let readdir = match std::fs::read_dir(fpath_to_path(&self.dir)) {
            Ok(val) => val,
            Err(err) => {
                defx!("read_dir({:?}) error {}", self.dir, err);
                return Err(err);
            }
        };
        for entry in readdir {
            let entry = match entry {
                Ok(val) => val,
                Err(_err) => {
                    de_wrn!("read_dir({:?}) entry error {}", self.dir, _err);
                    self.ignored += 1;
                    continue;
                }
            };
            let name = entry.file_name();
            let date: LogDate = match name.to_str().and_then(filename_to_date) {
                Some(val) => val,
                None => {
                    defo!("ignore {:?}", name);
                    self.ignored += 1;
                    continue;
                }
            };
            if &date > until {
                defo!("skip {:?}, after {:?}", name, until);
                continue;
            }
            dayfiles.push(DayFile {
                date,
                path: path_to_fpath(&entry.path()),
            });
        }
        dayfiles.sort_unstable_by(|a, b| b.cmp(a));
        defx!("return {} day files", dayfiles.len());

        Ok(dayfiles)
    }

    /// Read all lines of `dayfile`.
    ///
    /// Line terminators are removed. Bytes that are not valid UTF-8 are
    /// replaced with U+FFFD. A file without any bytes is `Done`.
    pub fn read_day(&self, dayfile: &DayFile) -> ResultS3ReadDay {
        defn!("({:?})", dayfile.path);
        let path: &Path = fpath_to_path(&dayfile.path);
        let data: Vec<u8> = match std::fs::read(path) {
            Ok(val) => val,
            Err(err) => {
                defx!("read({:?}) error {}", path, err);
                return ResultS3::Err(err);
            }
        };
        if data.is_empty() {
            defx!("empty file; Done");
            return ResultS3::Done;
        }
        let lines: Vec<LogLine> = data
            .lines()
            .enumerate()
            .map(|(index, line)| LogLine::new(dayfile.date, index, line.to_str_lossy().into_owned()))
            .collect();
        defx!("return {} lines", lines.len());

        ResultS3::Found(lines)
    }
}
