use crate::tests::{EnvGuard, setup_config_dir, write_config};
use crate::{Config, LogLevel};

use googletest::assert_that;
use googletest::prelude::{anything, contains_substring, eq, err, ok, some};
use log::LevelFilter;
use serial_test::serial;

// =========================================================================
// Edge Cases
// =========================================================================

#[test]
#[serial]
fn given_malformed_toml_when_load_then_error_mentions_file() {
    // Given
    let (temp, _guard) = setup_config_dir();
    write_config(&temp, "this is not valid toml {{{{");

    // When
    let result = Config::load();

    // Then
    assert_that!(result, err(anything()));
    let err_msg = format!("{}", result.unwrap_err());
    assert_that!(err_msg, contains_substring("config.toml"));
}

#[test]
#[serial]
fn given_log_file_with_traversal_when_validate_then_error() {
    // Given
    let _temp = setup_config_dir();
    let _file = EnvGuard::set("BX_LOG_FILE", "../../../etc/passwd");

    // When
    let result = Config::load().unwrap().validate();

    // Then
    assert_that!(result, err(anything()));
    let err_msg = format!("{}", result.unwrap_err());
    assert_that!(err_msg, contains_substring(".."));
}

#[test]
#[serial]
fn given_unparseable_env_number_when_load_then_keeps_default() {
    // Given
    let _temp = setup_config_dir();
    let _port = EnvGuard::set("BX_SERVER_PORT", "not-a-port");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.server.port, eq(crate::DEFAULT_PORT));
}

#[test]
#[serial]
fn given_unknown_overflow_env_when_load_then_keeps_default() {
    // Given
    let _temp = setup_config_dir();
    let _overflow = EnvGuard::set("BX_STREAM_OVERFLOW", "explode");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.streams.overflow, eq(crate::OverflowMode::DropNewest));
}

#[test]
#[serial]
fn given_unknown_log_level_in_toml_when_load_then_falls_back_to_info() {
    // Given
    let (temp, _guard) = setup_config_dir();
    write_config(&temp, "[logging]\nlevel = \"chatty\"\n");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(*config.logging.level, eq(LevelFilter::Info));
}

#[test]
#[serial]
fn given_uppercase_log_level_env_when_load_then_parsed() {
    // Given
    let _temp = setup_config_dir();
    let _level = EnvGuard::set("BX_LOG_LEVEL", "DEBUG");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(LevelFilter::from(config.logging.level), eq(LevelFilter::Debug));
}

#[test]
fn given_level_names_when_parse_lenient_then_maps_each() {
    assert_that!(*LogLevel::parse_lenient("off"), eq(LevelFilter::Off));
    assert_that!(*LogLevel::parse_lenient("warn"), eq(LevelFilter::Warn));
    assert_that!(*LogLevel::parse_lenient("trace"), eq(LevelFilter::Trace));
    assert_that!(*LogLevel::parse_lenient(""), eq(LevelFilter::Info));
}

#[test]
#[serial]
fn given_port_zero_when_validate_then_ok() {
    // Given
    let _temp = setup_config_dir();
    let _port = EnvGuard::set("BX_SERVER_PORT", "0");

    // When
    let result = Config::load().unwrap().validate();

    // Then
    assert_that!(result, ok(anything()));
}

#[test]
#[serial]
fn given_privileged_port_when_validate_then_error() {
    // Given
    let _temp = setup_config_dir();
    let _port = EnvGuard::set("BX_SERVER_PORT", "80");

    // When
    let result = Config::load().unwrap().validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_connection_log_level_env_when_load_then_set_apart_from_main_level() {
    // Given
    let _temp = setup_config_dir();
    let _level = EnvGuard::set("BX_LOG_CONNECTIONS", "warn");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(*config.logging.level, eq(LevelFilter::Info));
    assert_that!(config.logging.connections.map(|l| *l), some(eq(LevelFilter::Warn)));
}
