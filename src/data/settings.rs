// src/data/settings.rs

//! Per-user [`Settings`] and the [`SettingsStore`] that holds them.
//!
//! The query engine only ever reads settings, one [`SettingsStore::get`] per
//! query. Writes go through [`SettingsStore::set`], which applies a
//! read-modify-write as one unit so a concurrent reader sees either the old
//! or the new record, never a mix.
//!
//! [`SettingsMap`] may be backed by a JSON file of the form
//!
//! ```text
//! {
//!     "alice": {
//!         "extras": true,
//!         "size": 100
//!     }
//! }
//! ```
//!
//! Keys missing for a user fall back to the store defaults.

use crate::common::FPath;

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::RwLock;

use ::serde::{Deserialize, Serialize};
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};
use ::tempfile::NamedTempFile;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Settings
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Default result-size ceiling.
pub const SIZE_DEFAULT: u64 = 50;

/// Path template variable replaced with the user name.
pub const PATH_VAR_USER: &str = "$USER";
/// Path template variable replaced with the network name.
pub const PATH_VAR_NETWORK: &str = "$NETWORK";
/// Path template variable replaced with the room (window) name.
pub const PATH_VAR_WINDOW: &str = "$WINDOW";

/// Default log path template, relative to the data directory.
pub const PATH_TEMPLATE_DEFAULT: &str = "users/$USER/moddata/log/$NETWORK/$WINDOW/";

/// The effective settings of one user.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Settings {
    /// result-size ceiling, also the size used for a `*` count
    pub size: u64,
    /// replay joins, parts, quits, kicks, nick, topic, and mode changes
    pub extras: bool,
    /// strip text styling and color control codes
    pub strip: bool,
    /// log directory template, see [`Settings::resolve_path`]
    pub path: String,
    /// send all output to the debug channel instead of the client
    pub debug: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            size: SIZE_DEFAULT,
            extras: false,
            strip: false,
            path: String::from(PATH_TEMPLATE_DEFAULT),
            debug: false,
        }
    }
}

impl Settings {
    /// Default settings with the path template rooted at `data_dir`.
    pub fn with_data_dir(data_dir: &Path) -> Settings {
        let path = data_dir.join(PATH_TEMPLATE_DEFAULT);
        Settings {
            path: path.to_string_lossy().into_owned(),
            ..Default::default()
        }
    }

    /// Substitute `$USER`, `$NETWORK`, `$WINDOW` in the path template.
    pub fn resolve_path(&self, user: &str, network: &str, window: &str) -> FPath {
        self.path
            .replace(PATH_VAR_USER, user)
            .replace(PATH_VAR_NETWORK, network)
            .replace(PATH_VAR_WINDOW, window)
    }

    fn apply(&mut self, overrides: &UserSettings) {
        if let Some(size) = overrides.size {
            self.size = size;
        }
        if let Some(extras) = overrides.extras {
            self.extras = extras;
        }
        if let Some(strip) = overrides.strip {
            self.strip = strip;
        }
        if let Some(path) = &overrides.path {
            self.path = path.clone();
        }
        if let Some(debug) = overrides.debug {
            self.debug = debug;
        }
    }
}

/// The settings a user explicitly changed. Unset fields use the defaults.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct UserSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strip: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<bool>,
}

/// user name to the settings that user changed
pub type MapUserSettings = BTreeMap<String, UserSettings>;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SettingKey and errors
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Name of one setting.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SettingKey {
    Size,
    Extras,
    Strip,
    Path,
    Debug,
}

impl FromStr for SettingKey {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "size" => Ok(SettingKey::Size),
            "extras" => Ok(SettingKey::Extras),
            "strip" => Ok(SettingKey::Strip),
            "path" => Ok(SettingKey::Path),
            "debug" => Ok(SettingKey::Debug),
            _ => Err(SettingsError::InvalidSetting(s.to_string())),
        }
    }
}

/// Failure to change or persist settings.
#[derive(Debug)]
pub enum SettingsError {
    /// no such setting
    InvalidSetting(String),
    /// `size` must be a positive integer
    NotPositiveInteger(String),
    /// boolean settings must be `true` or `false`
    NotBoolean(String),
    /// `path` must not be empty
    EmptyPath,
    /// a user record of a settings file holds an invalid value
    InvalidUser(String, Box<SettingsError>),
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::InvalidSetting(name) => write!(f, "Invalid setting {:?}", name),
            SettingsError::NotPositiveInteger(value) => {
                write!(f, "You must enter a positive integer value, not {:?}", value)
            }
            SettingsError::NotBoolean(value) => write!(f, "You must enter True or False, not {:?}", value),
            SettingsError::EmptyPath => write!(f, "You must enter a path"),
            SettingsError::InvalidUser(user, err) => write!(f, "settings of user {:?}: {}", user, err),
            SettingsError::Io(err) => write!(f, "settings file error: {}", err),
            SettingsError::Json(err) => write!(f, "settings file JSON error: {}", err),
        }
    }
}

impl std::error::Error for SettingsError {}

impl From<std::io::Error> for SettingsError {
    fn from(err: std::io::Error) -> Self {
        SettingsError::Io(err)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(err: serde_json::Error) -> Self {
        SettingsError::Json(err)
    }
}

fn parse_bool(value: &str) -> Result<bool, SettingsError> {
    match value.to_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(SettingsError::NotBoolean(value.to_string())),
    }
}

/// Validate `value` for `key` and record it in `overrides`.
fn set_user_setting(
    overrides: &mut UserSettings,
    key: SettingKey,
    value: &str,
) -> Result<(), SettingsError> {
    match key {
        SettingKey::Size => match value.parse::<u64>() {
            Ok(size) if size > 0 => overrides.size = Some(size),
            _ => return Err(SettingsError::NotPositiveInteger(value.to_string())),
        },
        SettingKey::Extras => overrides.extras = Some(parse_bool(value)?),
        SettingKey::Strip => overrides.strip = Some(parse_bool(value)?),
        SettingKey::Debug => overrides.debug = Some(parse_bool(value)?),
        SettingKey::Path => {
            if value.is_empty() {
                return Err(SettingsError::EmptyPath);
            }
            overrides.path = Some(value.to_string());
        }
    }

    Ok(())
}

/// Check the values `set_user_setting` would refuse, for records read from a
/// settings file.
fn validate_user_settings(overrides: &UserSettings) -> Result<(), SettingsError> {
    if let Some(size) = overrides.size {
        if size == 0 {
            return Err(SettingsError::NotPositiveInteger(size.to_string()));
        }
    }
    if let Some(path) = &overrides.path {
        if path.is_empty() {
            return Err(SettingsError::EmptyPath);
        }
    }

    Ok(())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SettingsStore
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Per-user settings with an atomic get/set contract.
pub trait SettingsStore: Send + Sync {
    /// The effective settings of `user`.
    fn get(&self, user: &str) -> Settings;

    /// Validate and change one setting of `user`, returning the new
    /// effective settings.
    fn set(&self, user: &str, key: SettingKey, value: &str) -> Result<Settings, SettingsError>;
}

/// A [`SettingsStore`] kept in memory, optionally persisted to a JSON file.
pub struct SettingsMap {
    defaults: Settings,
    users: RwLock<MapUserSettings>,
    /// persist changes to this file
    path: Option<PathBuf>,
}

impl fmt::Debug for SettingsMap {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        f.debug_struct("SettingsMap")
            .field("defaults", &self.defaults)
            .field("path", &self.path)
            .finish()
    }
}

impl SettingsMap {
    /// A store that is never persisted.
    pub fn new(defaults: Settings) -> SettingsMap {
        SettingsMap {
            defaults,
            users: RwLock::new(MapUserSettings::new()),
            path: None,
        }
    }

    /// A store loaded from and persisted to the JSON file at `path`.
    ///
    /// A file that does not exist yet is an empty store.
    pub fn load(defaults: Settings, path: &Path) -> Result<SettingsMap, SettingsError> {
        defn!("({:?})", path);
        let users: MapUserSettings = match File::open(path) {
            Ok(file) => serde_json::from_reader(BufReader::new(file))?,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                defo!("file not found {:?}; empty store", path);
                MapUserSettings::new()
            }
            Err(err) => {
                defx!("File::open error {}", err);
                return Err(SettingsError::Io(err));
            }
        };
        for (user, overrides) in users.iter() {
            if let Err(err) = validate_user_settings(overrides) {
                defx!("user {:?} invalid; {}", user, err);
                return Err(SettingsError::InvalidUser(user.clone(), Box::new(err)));
            }
        }
        defx!("loaded {} users", users.len());

        Ok(SettingsMap {
            defaults,
            users: RwLock::new(users),
            path: Some(path.to_path_buf()),
        })
    }

    /// Write `users` to the store file, via a temporary file in the same
    /// directory renamed over the old file.
    fn persist(&self, users: &MapUserSettings) -> Result<(), SettingsError> {
        let path = match &self.path {
            Some(val) => val,
            None => return Ok(()),
        };
        defn!("({:?})", path);
        let dir: &Path = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;
        let mut ntf = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut ntf, users)?;
        ntf.write_all(b"\n")?;
        ntf.as_file().sync_all()?;
        if let Err(err) = ntf.persist(path) {
            defx!("persist failed {}", err);
            return Err(SettingsError::Io(err.error));
        }
        defx!();

        Ok(())
    }
}

impl SettingsStore for SettingsMap {
    fn get(&self, user: &str) -> Settings {
        let mut settings = self.defaults.clone();
        // a poisoned lock still holds a whole record
        let users = match self.users.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(overrides) = users.get(user) {
            settings.apply(overrides);
        }

        settings
    }

    fn set(&self, user: &str, key: SettingKey, value: &str) -> Result<Settings, SettingsError> {
        defn!("({:?}, {:?}, {:?})", user, key, value);
        let mut users = match self.users.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut overrides: UserSettings = users
            .get(user)
            .cloned()
            .unwrap_or_default();
        set_user_setting(&mut overrides, key, value)?;

        let mut updated: MapUserSettings = users.clone();
        updated.insert(user.to_string(), overrides);
        self.persist(&updated)?;
        *users = updated;

        let mut settings = self.defaults.clone();
        if let Some(overrides) = users.get(user) {
            settings.apply(overrides);
        }
        defx!("{:?}", settings);

        Ok(settings)
    }
}
