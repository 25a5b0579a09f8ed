//! REST adapter over `welllog_core`.
//!
//! # Responsibility
//! - Expose well and layer CRUD as JSON endpoints under `/api`.
//! - Translate core errors into the [`ApiError`] envelope.
//!
//! # Invariants
//! - Handlers never touch SQLite on the async executor; all storage work
//!   runs through [`AppState::run`].
//! - Trailing slashes are trimmed before routing.

pub mod config;
pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use config::{ServerConfig, DEFAULT_BIND_ADDR};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use routes::configure;
pub use state::AppState;

use actix_web::middleware::{Logger, NormalizePath, TrailingSlash};
use actix_web::{web, App, HttpServer};
use log::info;
use std::io;
use welllog_core::db::open_db;

/// Opens (and migrates) the database once, then serves until shutdown.
///
/// # Errors
/// - Returns an error when the database cannot be opened or migrated.
/// - Returns an error when the bind address is unavailable.
pub async fn run(config: ServerConfig) -> io::Result<()> {
    open_db(&config.db_path).map_err(io::Error::other)?;

    let state = web::Data::new(AppState::new(config.db_path.clone()));
    info!(
        "event=server_start module=http status=ok bind={} db={}",
        config.bind_addr,
        config.db_path.display()
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(NormalizePath::new(TrailingSlash::Trim))
            .wrap(Logger::default())
            .configure(configure)
    })
    .bind(config.bind_addr)?
    .run()
    .await
}
