//! Schema readiness checks run when a repository is constructed.

use crate::db::migrations::{current_user_version, latest_version};
use crate::model::depth::Depth;
use crate::repo::error::{RepoError, RepoResult};
use rusqlite::Connection;
use uuid::Uuid;

/// Verifies the connection is migrated and `table` carries every column in
/// `columns`.
pub(crate) fn ensure_table_ready(
    conn: &Connection,
    table: &'static str,
    columns: &[&'static str],
) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, table)? {
        return Err(RepoError::MissingRequiredTable(table));
    }

    for &column in columns {
        if !table_has_column(conn, table, column)? {
            return Err(RepoError::MissingRequiredColumn { table, column });
        }
    }

    Ok(())
}

pub(crate) fn parse_uuid(value: &str, column: &'static str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

pub(crate) fn parse_depth(value: i64, column: &'static str) -> RepoResult<Depth> {
    Depth::try_from_centimeters(value)
        .ok_or_else(|| RepoError::InvalidData(format!("depth `{value}` out of range in {column}")))
}

/// SQL expression for the current time in epoch milliseconds.
pub(crate) const NOW_EPOCH_MS_SQL: &str =
    "CAST((julianday('now') - 2440587.5) * 86400000 AS INTEGER)";
