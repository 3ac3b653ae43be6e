use rusqlite::Connection;
use toyshop_core::db::migrations::latest_version;
use toyshop_core::db::open_db_in_memory;
use toyshop_core::{
    ConfigurationError, ConnectionProvider, RepoError, SqliteEventRepository,
    SqliteToyRepository,
};

#[test]
fn repositories_fail_with_configuration_error_before_set() {
    let provider = ConnectionProvider::new();

    assert!(matches!(
        SqliteToyRepository::from_provider(&provider),
        Err(RepoError::Configuration(ConfigurationError::MissingConnection))
    ));
    assert!(matches!(
        SqliteEventRepository::from_provider(&provider),
        Err(RepoError::Configuration(ConfigurationError::MissingConnection))
    ));
}

#[test]
fn repositories_share_the_provider_connection() {
    let mut provider = ConnectionProvider::new();
    provider.set(open_db_in_memory().unwrap());

    assert!(SqliteToyRepository::from_provider(&provider).is_ok());
    assert!(SqliteEventRepository::from_provider(&provider).is_ok());
}

#[test]
fn repository_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteToyRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_its_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteEventRepository::try_new(&conn),
        Err(RepoError::MissingRequiredTable("events"))
    ));
}
