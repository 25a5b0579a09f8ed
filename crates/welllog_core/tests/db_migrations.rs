use rusqlite::Connection;
use welllog_core::db::migrations::latest_version;
use welllog_core::db::{open_db, open_db_in_memory, DbError};
use welllog_core::{RepoError, SqliteLayerRepository, SqliteWellRepository};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "wells");
    assert_table_exists(&conn, "layers");
}

#[test]
fn opened_connections_enforce_foreign_keys() {
    let conn = open_db_in_memory().unwrap();

    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);

    let orphan = conn.execute(
        "INSERT INTO layers (uuid, well_uuid, start_depth_cm, end_depth_cm, lithology)
         VALUES ('layer-1', 'missing-well', 0, 100, 'SAND');",
        [],
    );
    assert!(orphan.is_err());
}

#[test]
fn schema_checks_reject_reversed_interval_rows() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO wells (uuid, name, area, structure, design_depth_cm)
         VALUES ('well-1', 'W-1', 'North', 'Dam', 1000);",
        [],
    )
    .unwrap();

    let reversed = conn.execute(
        "INSERT INTO layers (uuid, well_uuid, start_depth_cm, end_depth_cm, lithology)
         VALUES ('layer-1', 'well-1', 300, 100, 'SAND');",
        [],
    );
    assert!(reversed.is_err());
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("welllog.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "layers");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn repositories_reject_unmigrated_connections() {
    let conn = Connection::open_in_memory().unwrap();

    let well_err = SqliteWellRepository::try_new(&conn).err().unwrap();
    assert!(matches!(
        well_err,
        RepoError::UninitializedConnection {
            actual_version: 0,
            ..
        }
    ));

    let layer_err = SqliteLayerRepository::try_new(&conn).err().unwrap();
    assert!(matches!(layer_err, RepoError::UninitializedConnection { .. }));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
