//! Configuration read from the process environment.

use std::ffi::OsString;

use crate::test_helpers::EnvVarGuard;
use rstest::rstest;
use workboard::config::{
    ConfigError, DATABASE_MAX_CONNECTIONS_VAR, DATABASE_URL_VAR, UPLOAD_DIR_VAR,
    UPLOAD_MAX_BYTES_VAR, WorkboardConfig,
};

fn set(key: &str, value: Option<&str>) -> (OsString, Option<OsString>) {
    (OsString::from(key), value.map(OsString::from))
}

#[rstest]
fn environment_overrides_defaults() -> eyre::Result<()> {
    let _guard = EnvVarGuard::set_many(&[
        set(DATABASE_URL_VAR, Some("postgres://localhost/workboard")),
        set(DATABASE_MAX_CONNECTIONS_VAR, Some("3")),
        set(UPLOAD_DIR_VAR, Some("/srv/uploads")),
        set(UPLOAD_MAX_BYTES_VAR, Some("1024")),
    ]);

    let config = WorkboardConfig::from_env()?;

    let database = config
        .database
        .ok_or_else(|| eyre::eyre!("database settings expected"))?;
    eyre::ensure!(database.max_connections == 3);
    eyre::ensure!(config.uploads.directory == "/srv/uploads");
    eyre::ensure!(config.uploads.max_file_size_bytes == 1024);
    Ok(())
}

#[rstest]
fn zero_upload_limit_is_rejected() {
    let _guard = EnvVarGuard::set_many(&[
        set(DATABASE_URL_VAR, None),
        set(UPLOAD_MAX_BYTES_VAR, Some("0")),
    ]);

    assert_eq!(
        WorkboardConfig::from_env(),
        Err(ConfigError::Zero {
            variable: UPLOAD_MAX_BYTES_VAR
        })
    );
}
