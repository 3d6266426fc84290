//! Error type for `cardex-store-sqlite`.

use rusqlite::ffi::{
  SQLITE_CONSTRAINT_CHECK, SQLITE_CONSTRAINT_PRIMARYKEY,
  SQLITE_CONSTRAINT_UNIQUE,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Translate storage failures into the core taxonomy so raw SQLite error
/// codes never cross the crate boundary: uniqueness violations become
/// [`Conflict`](cardex_core::Error::Conflict), CHECK violations become
/// [`InvalidField`](cardex_core::Error::InvalidField), and everything else
/// is flattened into [`Storage`](cardex_core::Error::Storage).
impl From<Error> for cardex_core::Error {
  fn from(err: Error) -> Self {
    if let Error::Database(tokio_rusqlite::Error::Rusqlite(
      rusqlite::Error::SqliteFailure(code, ref message),
    )) = err
    {
      let detail = message
        .clone()
        .unwrap_or_else(|| "constraint violation".to_string());
      match code.extended_code {
        SQLITE_CONSTRAINT_UNIQUE | SQLITE_CONSTRAINT_PRIMARYKEY => {
          return cardex_core::Error::Conflict(detail);
        }
        SQLITE_CONSTRAINT_CHECK => {
          return cardex_core::Error::InvalidField(detail);
        }
        _ => {}
      }
    }
    cardex_core::Error::Storage(err.to_string())
  }
}
