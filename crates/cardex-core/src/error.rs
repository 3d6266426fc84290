//! Error types for `cardex-core`.

use thiserror::Error;
use uuid::Uuid;

/// The coarse classification of an [`Error`], used by the request/response
/// boundary to pick a status code without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  NotFound,
  InvalidArgument,
  Conflict,
  Internal,
}

impl ErrorKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::NotFound => "not_found",
      Self::InvalidArgument => "invalid_argument",
      Self::Conflict => "conflict",
      Self::Internal => "internal",
    }
  }
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("card type not found: {0}")]
  TypeNotFound(Uuid),

  #[error("card sub-type not found: {0}")]
  SubTypeNotFound(Uuid),

  #[error("card not found: {0}")]
  CardNotFound(Uuid),

  #[error("no card matches the provided filters")]
  NoCardMatch,

  #[error("at least one of id, name, or stars must be provided")]
  EmptyFilter,

  #[error("card {0} has no statistics record")]
  MissingStatistics(Uuid),

  #[error("sub-type {sub_type_id} does not belong to type {type_id}")]
  SubTypeMismatch { sub_type_id: Uuid, type_id: Uuid },

  /// A uniqueness constraint was violated at the storage layer.
  #[error("duplicate value: {0}")]
  Conflict(String),

  /// A field failed a range or length constraint.
  #[error("invalid field: {0}")]
  InvalidField(String),

  /// Any other storage failure, with the raw cause flattened to text so the
  /// backing engine's error codes never leak past this crate.
  #[error("storage error: {0}")]
  Storage(String),
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::TypeNotFound(_)
      | Self::SubTypeNotFound(_)
      | Self::CardNotFound(_)
      | Self::NoCardMatch => ErrorKind::NotFound,
      Self::EmptyFilter
      | Self::MissingStatistics(_)
      | Self::SubTypeMismatch { .. }
      | Self::InvalidField(_) => ErrorKind::InvalidArgument,
      Self::Conflict(_) => ErrorKind::Conflict,
      Self::Storage(_) => ErrorKind::Internal,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
