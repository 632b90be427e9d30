//! Settings loaded from the environment

use serial_test::serial;
use walkthrough_bot::config::{Settings, StorageBackend};

#[test]
#[serial]
fn test_settings_from_environment() {
    std::env::set_var("WALKTHROUGH__BOT__TOKEN", "42:env-token");
    std::env::set_var("WALKTHROUGH__WALKTHROUGH__SCRIPT", "todo_list");
    std::env::set_var("WALKTHROUGH__STORAGE__BACKEND", "redis");

    let result = Settings::from_file("does-not-exist");

    std::env::remove_var("WALKTHROUGH__BOT__TOKEN");
    std::env::remove_var("WALKTHROUGH__WALKTHROUGH__SCRIPT");
    std::env::remove_var("WALKTHROUGH__STORAGE__BACKEND");

    let settings = result.expect("settings should load from the environment");
    assert_eq!(settings.bot.token, "42:env-token");
    assert_eq!(settings.walkthrough.script, "todo_list");
    assert_eq!(settings.storage.backend, StorageBackend::Redis);
    assert!(settings.validate().is_ok());
}

#[test]
#[serial]
fn test_missing_token_fails_to_load() {
    std::env::remove_var("WALKTHROUGH__BOT__TOKEN");
    assert!(Settings::from_file("does-not-exist").is_err());
}
