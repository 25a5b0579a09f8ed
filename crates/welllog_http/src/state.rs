//! Shared handler state and the blocking bridge into the core store.

use crate::error::ApiResult;
use actix_web::web;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use welllog_core::db::open_db;
use welllog_core::{LayerService, SqliteLayerRepository, SqliteWellRepository, WellService};

/// Application state registered as `web::Data<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    db_path: PathBuf,
}

impl AppState {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Runs `operation` on the blocking pool with a freshly opened, migrated
    /// connection.
    ///
    /// Each call owns its connection, so concurrent requests serialize only
    /// on SQLite's write lock.
    pub async fn run<T, F>(&self, operation: F) -> ApiResult<T>
    where
        F: FnOnce(&Connection) -> ApiResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let db_path = self.db_path.clone();
        web::block(move || {
            let conn = open_db(&db_path)?;
            operation(&conn)
        })
        .await?
    }
}

pub(crate) fn well_service(conn: &Connection) -> ApiResult<WellService<SqliteWellRepository<'_>>> {
    Ok(WellService::new(SqliteWellRepository::try_new(conn)?))
}

pub(crate) fn layer_service(
    conn: &Connection,
) -> ApiResult<LayerService<SqliteLayerRepository<'_>>> {
    Ok(LayerService::new(SqliteLayerRepository::try_new(conn)?))
}
