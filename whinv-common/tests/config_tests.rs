//! Unit tests for configuration loading and override priority
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate WHINV_* variables are marked with #[serial].

use serial_test::serial;
use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use whinv_common::config::{
    config_file_path, default_database_path, TomlConfig, CONFIG_ENV_VAR, DATABASE_ENV_VAR,
    DEFAULT_PORT, DEFAULT_SHEET, IMPORT_SOURCE_ENV_VAR, PORT_ENV_VAR, URL_ENV_VAR,
};
use whinv_common::Error;

fn clear_env() {
    for var in [
        CONFIG_ENV_VAR,
        DATABASE_ENV_VAR,
        PORT_ENV_VAR,
        IMPORT_SOURCE_ENV_VAR,
        URL_ENV_VAR,
    ] {
        env::remove_var(var);
    }
}

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_defaults() {
    let config = TomlConfig::default();

    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.logging.level, "info");
    assert!(config.logging.file.is_none());
    assert_eq!(config.import.sheet, DEFAULT_SHEET);
    assert_eq!(config.import.header_rows, 2);
    assert_eq!(config.client.base_url, format!("http://127.0.0.1:{}", DEFAULT_PORT));
}

#[test]
fn test_default_database_path_is_named_whinv_db() {
    let path = default_database_path();
    assert_eq!(path.file_name().unwrap(), "whinv.db");
}

#[test]
fn test_parse_full_file() {
    let file = write_config(
        r#"
        database_path = "/srv/whinv/inventory.db"
        port = 6000

        [logging]
        level = "debug"
        file = "/tmp/whinv.log"

        [import]
        source_path = "/data/AISLEMAPPING.xlsx"
        sheet = "AISLE F"
        header_rows = 3

        [client]
        base_url = "http://warehouse:6000"
        "#,
    );

    let config = TomlConfig::from_file(file.path()).unwrap();

    assert_eq!(config.database_path, Some(PathBuf::from("/srv/whinv/inventory.db")));
    assert_eq!(config.port, 6000);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.file, Some(PathBuf::from("/tmp/whinv.log")));
    assert_eq!(config.import.sheet, "AISLE F");
    assert_eq!(config.import.header_rows, 3);
    assert_eq!(config.client.base_url, "http://warehouse:6000");
}

#[test]
fn test_parse_partial_file_fills_defaults() {
    let file = write_config("port = 7001\n");

    let config = TomlConfig::from_file(file.path()).unwrap();

    assert_eq!(config.port, 7001);
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.import.sheet, DEFAULT_SHEET);
    assert!(config.database_path.is_none());
}

#[test]
fn test_invalid_file_is_config_error() {
    let file = write_config("port = \"not a number\"\n");

    let err = TomlConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
#[serial]
fn test_config_env_var_selects_file() {
    clear_env();
    let file = write_config("port = 6123\n");
    env::set_var(CONFIG_ENV_VAR, file.path());

    assert_eq!(config_file_path(), Some(file.path().to_path_buf()));

    let (config, loaded_from) = TomlConfig::load().unwrap();
    assert_eq!(config.port, 6123);
    assert_eq!(loaded_from, Some(file.path().to_path_buf()));

    clear_env();
}

#[test]
#[serial]
fn test_database_path_priority() {
    clear_env();
    let config = TomlConfig {
        database_path: Some(PathBuf::from("/from/toml.db")),
        ..TomlConfig::default()
    };

    assert_eq!(config.resolve_database_path(None), PathBuf::from("/from/toml.db"));

    env::set_var(DATABASE_ENV_VAR, "/from/env.db");
    assert_eq!(config.resolve_database_path(None), PathBuf::from("/from/env.db"));

    let cli = Path::new("/from/cli.db");
    assert_eq!(config.resolve_database_path(Some(cli)), PathBuf::from("/from/cli.db"));

    clear_env();
    assert_eq!(
        TomlConfig::default().resolve_database_path(None),
        default_database_path()
    );
}

#[test]
#[serial]
fn test_port_priority() {
    clear_env();
    let config = TomlConfig {
        port: 6001,
        ..TomlConfig::default()
    };

    assert_eq!(config.resolve_port(None).unwrap(), 6001);

    env::set_var(PORT_ENV_VAR, "6002");
    assert_eq!(config.resolve_port(None).unwrap(), 6002);
    assert_eq!(config.resolve_port(Some(6003)).unwrap(), 6003);

    env::set_var(PORT_ENV_VAR, "not-a-port");
    assert!(matches!(config.resolve_port(None), Err(Error::Config(_))));

    clear_env();
}

#[test]
#[serial]
fn test_import_source_priority() {
    clear_env();
    assert_eq!(
        TomlConfig::default().resolve_import_source(),
        PathBuf::from("AISLEMAPPING.xlsx")
    );

    let mut config = TomlConfig::default();
    config.import.source_path = Some(PathBuf::from("/data/aisle.csv"));
    assert_eq!(config.resolve_import_source(), PathBuf::from("/data/aisle.csv"));

    env::set_var(IMPORT_SOURCE_ENV_VAR, "/env/aisle.xlsx");
    assert_eq!(config.resolve_import_source(), PathBuf::from("/env/aisle.xlsx"));

    clear_env();
}

#[test]
#[serial]
fn test_base_url_priority() {
    clear_env();
    let config = TomlConfig::default();
    assert_eq!(config.resolve_base_url(None), "http://127.0.0.1:5780");

    env::set_var(URL_ENV_VAR, "http://env:1");
    assert_eq!(config.resolve_base_url(None), "http://env:1");
    assert_eq!(config.resolve_base_url(Some("http://cli:2")), "http://cli:2");

    clear_env();
}
