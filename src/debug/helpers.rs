// src/debug/helpers.rs

//! Miscellaneous helper functions for testing; temporary settings files and
//! temporary room directories of day files.

use crate::common::FPath;
use crate::readers::helpers::path_to_fpath;

use std::fs::create_dir;
use std::fs::File;
use std::path::PathBuf;

use std::io::ErrorKind;
#[allow(unused_imports)] // XXX: clippy wrongly marks this as unused
use std::io::Write; // for `NamedTempFile.write_all`

use ::lazy_static::lazy_static;
use ::si_trace_print::{dpfo, dpfñ};

#[doc(hidden)]
pub use ::tempfile::NamedTempFile;
#[doc(hidden)]
pub use ::tempfile::TempDir;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// temporary file helper functions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// NamedTempFile instances default to this file name prefix.
///
/// See <https://github.com/Stebalien/tempfile/issues/183>.
pub const STR_TEMPFILE_PREFIX: &str = "tmp-chr-test-";

lazy_static! {
    pub static ref STRING_TEMPFILE_PREFIX: String = String::from(STR_TEMPFILE_PREFIX);
}

/// Small helper function for copying `NamedTempFile` path to a `FPath`.
pub fn ntf_fpath(ntf: &NamedTempFile) -> FPath {
    path_to_fpath(ntf.path())
}

/// Testing helper function to write a `str` to a temporary file.
///
/// BUG: `NamedTempFile` created within `lazy_static` will fail to remove itself
///      <https://github.com/Stebalien/tempfile/issues/183>.
pub fn create_temp_file(data: &str) -> NamedTempFile {
    let mut ntf = match ::tempfile::Builder::new()
        // use known prefix for easier cleanup
        .prefix::<str>(&STRING_TEMPFILE_PREFIX)
        .tempfile()
    {
        Ok(val) => val,
        Err(err) => {
            panic!("NamedTempFile::new() return Err {}", err);
        }
    };
    match ntf.write_all(data.as_bytes()) {
        Ok(_) => {}
        Err(err) => {
            panic!("NamedTempFile::write_all() return Err {}", err);
        }
    }

    ntf
}

/// Create a temporary directory
pub fn create_temp_dir() -> TempDir {
    dpfñ!();
    match ::tempfile::Builder::new()
        .prefix::<str>(&STRING_TEMPFILE_PREFIX)
        .tempdir()
    {
        Ok(val) => val,
        Err(err) => panic!("tempfile::Builder::tempdir() return Err {}", err),
    }
}

/// Create each directory component of relative `pathb` within `tempdir`.
pub fn create_dir_in_tmpdir(
    pathb: &PathBuf,
    tempdir: &TempDir,
) {
    let mut pathb_tmp: PathBuf = tempdir.path().to_path_buf();
    for c in pathb.components() {
        pathb_tmp = pathb_tmp.join(PathBuf::from(c.as_os_str()));
        dpfñ!("create_dir({:?})", pathb_tmp);
        match create_dir(&pathb_tmp) {
            Ok(_) => {}
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {}
            Err(err) => panic!("Error {:?}", err),
        }
    }
}

/// Testing helper function to write a `[u8]` to a file in a temporary directory.
/// Will create leading directories in paths, e.g. `name` value `foo/bar` creates
/// directory `foo` and file `bar`.
pub fn create_file_bytes_name_in_tmpdir(
    data: &[u8],
    name: &str,
    tempdir: &TempDir,
) -> FPath {
    let pathb_name: PathBuf = PathBuf::from(name);
    if let Some(parent) = pathb_name.parent() {
        create_dir_in_tmpdir(&parent.to_path_buf(), tempdir);
    }
    let path_file: PathBuf = tempdir.path().join(&pathb_name);
    dpfo!("File::create({:?})", path_file);
    let mut file_ = match File::create(&path_file) {
        Ok(f) => f,
        Err(err) => panic!("Error {:?}", err),
    };
    if let Err(err) = file_.write_all(data) {
        panic!("File::write_all({:?}) Error {:?}", path_file, err);
    }

    path_to_fpath(&path_file)
}

/// Testing helper to create a room directory `room` within `tempdir` holding
/// the day files `dayfiles`, each a pair of file name and file contents.
///
/// Returns the path of the room directory.
pub fn create_room_in_tmpdir(
    tempdir: &TempDir,
    room: &str,
    dayfiles: &[(&str, &str)],
) -> FPath {
    create_dir_in_tmpdir(&PathBuf::from(room), tempdir);
    for (name, data) in dayfiles.iter() {
        let name_: String = format!("{}/{}", room, name);
        create_file_bytes_name_in_tmpdir(data.as_bytes(), &name_, tempdir);
    }

    path_to_fpath(&tempdir.path().join(room))
}
