// src/tests/settings_tests.rs

//! tests for `settings.rs`

use crate::data::settings::{
    SettingKey,
    Settings,
    SettingsError,
    SettingsMap,
    SettingsStore,
    PATH_TEMPLATE_DEFAULT,
    SIZE_DEFAULT,
};
use crate::debug::helpers::{create_temp_dir, create_temp_file, ntf_fpath};

use std::path::{Path, PathBuf};
use std::str::FromStr;

use ::test_case::test_case;

#[test]
fn test_settings_default() {
    let settings = Settings::default();
    assert_eq!(settings.size, SIZE_DEFAULT);
    assert_eq!(settings.size, 50);
    assert!(!settings.extras);
    assert!(!settings.strip);
    assert!(!settings.debug);
    assert_eq!(settings.path, PATH_TEMPLATE_DEFAULT);
}

#[test]
fn test_settings_with_data_dir() {
    let settings = Settings::with_data_dir(Path::new("/var/lib/znc"));
    assert_eq!(settings.path, "/var/lib/znc/users/$USER/moddata/log/$NETWORK/$WINDOW/");
    assert_eq!(settings.size, SIZE_DEFAULT);
}

#[test_case("users/$USER/moddata/log/$NETWORK/$WINDOW/", "users/alice/moddata/log/libera/#rust/"; "default")]
#[test_case("/logs/$WINDOW", "/logs/#rust"; "window only")]
#[test_case("/logs/$USER-$USER", "/logs/alice-alice"; "repeated")]
#[test_case("/logs/fixed", "/logs/fixed"; "no variables")]
fn test_settings_resolve_path(template: &str, expect: &str) {
    let settings = Settings {
        path: String::from(template),
        ..Default::default()
    };
    assert_eq!(settings.resolve_path("alice", "libera", "#rust"), expect);
}

#[test_case("size", SettingKey::Size)]
#[test_case("EXTRAS", SettingKey::Extras)]
#[test_case("Strip", SettingKey::Strip)]
#[test_case("path", SettingKey::Path)]
#[test_case("debug", SettingKey::Debug)]
fn test_setting_key_from_str(name: &str, key: SettingKey) {
    assert_eq!(SettingKey::from_str(name).unwrap(), key);
}

#[test]
fn test_setting_key_from_str_invalid() {
    assert!(matches!(SettingKey::from_str("color"), Err(SettingsError::InvalidSetting(_))));
}

#[test]
fn test_settings_map_get_defaults() {
    let store = SettingsMap::new(Settings::default());
    assert_eq!(store.get("anyone"), Settings::default());
}

#[test]
fn test_settings_map_set() {
    let store = SettingsMap::new(Settings::default());
    let settings = store.set("alice", SettingKey::Size, "100").unwrap();
    assert_eq!(settings.size, 100);
    let settings = store.set("alice", SettingKey::Extras, "True").unwrap();
    assert!(settings.extras);
    assert_eq!(settings.size, 100);
    let settings = store.set("alice", SettingKey::Path, "/logs/$WINDOW").unwrap();
    assert_eq!(settings.path, "/logs/$WINDOW");

    let got = store.get("alice");
    assert_eq!(got, settings);
}

#[test]
fn test_settings_map_per_user() {
    let store = SettingsMap::new(Settings::default());
    store.set("alice", SettingKey::Strip, "true").unwrap();
    store.set("bob", SettingKey::Size, "5").unwrap();
    assert!(store.get("alice").strip);
    assert_eq!(store.get("alice").size, SIZE_DEFAULT);
    assert!(!store.get("bob").strip);
    assert_eq!(store.get("bob").size, 5);
    assert_eq!(store.get("carol"), Settings::default());
}

#[test_case(SettingKey::Size, "0"; "size zero")]
#[test_case(SettingKey::Size, "-3"; "size negative")]
#[test_case(SettingKey::Size, "ten"; "size word")]
#[test_case(SettingKey::Extras, "yes"; "extras yes")]
#[test_case(SettingKey::Strip, "1"; "strip one")]
#[test_case(SettingKey::Debug, ""; "debug empty")]
#[test_case(SettingKey::Path, ""; "path empty")]
fn test_settings_map_set_invalid(key: SettingKey, value: &str) {
    let store = SettingsMap::new(Settings::default());
    assert!(store.set("alice", key, value).is_err());
    // a rejected value changes nothing
    assert_eq!(store.get("alice"), Settings::default());
}

#[test]
fn test_settings_error_display() {
    let store = SettingsMap::new(Settings::default());
    let err = store.set("alice", SettingKey::Size, "0").unwrap_err();
    assert_eq!(err.to_string(), "You must enter a positive integer value, not \"0\"");
    let err = store.set("alice", SettingKey::Debug, "maybe").unwrap_err();
    assert_eq!(err.to_string(), "You must enter True or False, not \"maybe\"");
}

#[test]
fn test_settings_map_load_missing_file() {
    let tmpdir = create_temp_dir();
    let path: PathBuf = tmpdir.path().join("settings.json");
    let store = SettingsMap::load(Settings::default(), &path).unwrap();
    assert_eq!(store.get("alice"), Settings::default());
    assert!(!path.exists());
}

#[test]
fn test_settings_map_load() {
    let ntf = create_temp_file(r#"{"alice": {"size": 7, "debug": true}, "bob": {}}"#);
    let path = PathBuf::from(ntf_fpath(&ntf));
    let store = SettingsMap::load(Settings::default(), &path).unwrap();
    let alice = store.get("alice");
    assert_eq!(alice.size, 7);
    assert!(alice.debug);
    assert!(!alice.extras);
    assert_eq!(store.get("bob"), Settings::default());
}

#[test]
fn test_settings_map_load_bad_json() {
    let ntf = create_temp_file("{ not json");
    let path = PathBuf::from(ntf_fpath(&ntf));
    assert!(matches!(
        SettingsMap::load(Settings::default(), &path),
        Err(SettingsError::Json(_))
    ));
}

#[test]
fn test_settings_map_persist_and_reload() {
    let tmpdir = create_temp_dir();
    let path: PathBuf = tmpdir.path().join("conf").join("settings.json");
    {
        let store = SettingsMap::load(Settings::default(), &path).unwrap();
        store.set("alice", SettingKey::Size, "12").unwrap();
        store.set("alice", SettingKey::Strip, "true").unwrap();
        store.set("bob", SettingKey::Extras, "true").unwrap();
    }
    assert!(path.exists());
    let store = SettingsMap::load(Settings::default(), &path).unwrap();
    let alice = store.get("alice");
    assert_eq!(alice.size, 12);
    assert!(alice.strip);
    assert!(!alice.extras);
    assert!(store.get("bob").extras);

    // only changed settings are written
    let text: String = std::fs::read_to_string(&path).unwrap();
    assert!(!text.contains("debug"), "{}", text);
}

#[test_case(r#"{"alice": {"size": 0}}"#; "size zero")]
#[test_case(r#"{"bob": {}, "alice": {"size": 5, "path": ""}}"#; "path empty")]
fn test_settings_map_load_invalid_user(data: &str) {
    let ntf = create_temp_file(data);
    let path = PathBuf::from(ntf_fpath(&ntf));
    match SettingsMap::load(Settings::default(), &path) {
        Err(SettingsError::InvalidUser(user, _)) => assert_eq!(user, "alice"),
        Err(err) => panic!("unexpected error {}", err),
        Ok(_) => panic!("loaded an invalid settings file"),
    }
}

#[test]
fn test_settings_map_load_invalid_user_display() {
    let ntf = create_temp_file(r#"{"alice": {"size": 0}}"#);
    let path = PathBuf::from(ntf_fpath(&ntf));
    let err = match SettingsMap::load(Settings::default(), &path) {
        Err(err) => err,
        Ok(_) => panic!("loaded an invalid settings file"),
    };
    assert_eq!(
        err.to_string(),
        "settings of user \"alice\": You must enter a positive integer value, not \"0\""
    );
}
