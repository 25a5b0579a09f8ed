//! Error type shared by the well and layer repositories.

use crate::db::DbError;
use crate::model::layer::LayerId;
use crate::model::validation::ValidationError;
use crate::model::well::WellId;
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for well/layer persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Write rejected before any SQL mutation.
    Validation(ValidationError),
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Referenced well does not exist.
    WellNotFound(WellId),
    /// Referenced layer does not exist.
    LayerNotFound(LayerId),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted row cannot be converted to a valid record.
    InvalidData(String),
}

impl RepoError {
    /// Returns whether this error means a referenced record is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::WellNotFound(_) | Self::LayerNotFound(_))
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::WellNotFound(id) => write!(f, "well not found: {id}"),
            Self::LayerNotFound(id) => write!(f, "layer not found: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Logs a rejected write and wraps the validation failure.
pub(crate) fn reject(event: &'static str, err: ValidationError) -> RepoError {
    warn!(
        "event={event} module=repo status=rejected field={} reason={err}",
        err.field().unwrap_or("non_field")
    );
    RepoError::Validation(err)
}
