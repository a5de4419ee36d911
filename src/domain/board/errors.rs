use thiserror::Error;

use crate::domain::shared::RepositoryError;

#[derive(Debug, Error)]
pub enum BoardError {
  #[error("{0} not found")]
  NotFound(String),

  #[error("{0}")]
  Conflict(String),

  #[error("Validation error: {0}")]
  Validation(String),

  #[error("Repository error: {0}")]
  Repository(RepositoryError),

  #[error("Storage error: {0}")]
  Storage(#[from] StorageError),
}

impl From<RepositoryError> for BoardError {
  fn from(error: RepositoryError) -> Self {
    match error {
      RepositoryError::NotFound { entity, .. } => BoardError::NotFound(entity.to_string()),
      RepositoryError::DuplicateKey(_) => {
        BoardError::Conflict("Record already exists".to_string())
      }
      RepositoryError::ForeignKeyViolation(_) => {
        BoardError::Conflict("Referenced user or job does not exist".to_string())
      }
      other => BoardError::Repository(other),
    }
  }
}

/// Errors raised by file storage backends
#[derive(Debug, Error)]
pub enum StorageError {
  #[error("File not found")]
  NotFound,

  #[error("Invalid file name: {0}")]
  InvalidName(String),

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_repository_errors_map_to_board_kinds() {
    assert!(matches!(
      BoardError::from(RepositoryError::not_found("Job", 3)),
      BoardError::NotFound(entity) if entity == "Job"
    ));
    assert!(matches!(
      BoardError::from(RepositoryError::DuplicateKey("x".into())),
      BoardError::Conflict(_)
    ));
    assert!(matches!(
      BoardError::from(RepositoryError::ForeignKeyViolation("x".into())),
      BoardError::Conflict(_)
    ));
    assert!(matches!(
      BoardError::from(RepositoryError::QueryFailed("x".into())),
      BoardError::Repository(_)
    ));
  }
}
