use async_trait::async_trait;
use thiserror::Error;

/// Primary key type shared by every table
pub type EntityId = i64;

/// A persisted record that can be managed through a [`Repository`]
///
/// `Draft` carries the fields needed to insert a new record and `Changes`
/// carries a partial update where every `Some` field overwrites the stored
/// value.
pub trait Entity: Clone + Send + Sync + 'static {
  type Draft: Send + Sync;
  type Changes: Send + Sync;

  /// Human readable entity name used in error messages
  const NAME: &'static str;

  fn id(&self) -> EntityId;
}

/// Generic data access over a single entity type
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
  /// Fetches a record by id, failing with `NotFound` if it does not exist
  async fn get(&self, id: EntityId) -> Result<E, RepositoryError>;

  /// Returns every record ordered by id
  async fn list_all(&self) -> Result<Vec<E>, RepositoryError>;

  /// Inserts a new record
  ///
  /// Unique and foreign key violations surface as `DuplicateKey` and
  /// `ForeignKeyViolation` respectively.
  async fn create(&self, draft: E::Draft) -> Result<E, RepositoryError>;

  /// Merges `changes` into the stored record and refreshes `updated_at`
  async fn update(&self, id: EntityId, changes: E::Changes) -> Result<E, RepositoryError>;

  /// Removes a record together with its dependents and returns it
  async fn delete(&self, id: EntityId) -> Result<E, RepositoryError>;
}

/// Repository-related errors
#[derive(Debug, Error)]
pub enum RepositoryError {
  #[error("{entity} not found: {key}")]
  NotFound { entity: &'static str, key: String },

  #[error("Duplicate key violation: {0}")]
  DuplicateKey(String),

  #[error("Foreign key violation: {0}")]
  ForeignKeyViolation(String),

  #[error("Database connection failed: {0}")]
  ConnectionFailed(String),

  #[error("Query execution failed: {0}")]
  QueryFailed(String),

  #[error("Database error: {0}")]
  DatabaseError(String),
}

impl RepositoryError {
  pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
    RepositoryError::NotFound {
      entity,
      key: key.to_string(),
    }
  }

  pub fn is_not_found(&self) -> bool {
    matches!(self, RepositoryError::NotFound { .. })
  }
}

impl From<sqlx::Error> for RepositoryError {
  fn from(error: sqlx::Error) -> Self {
    match error {
      sqlx::Error::RowNotFound => RepositoryError::NotFound {
        entity: "Record",
        key: "unknown".to_string(),
      },
      sqlx::Error::Database(db_err) => {
        if db_err.is_unique_violation() {
          RepositoryError::DuplicateKey(db_err.message().to_string())
        } else if db_err.is_foreign_key_violation() {
          RepositoryError::ForeignKeyViolation(db_err.message().to_string())
        } else {
          RepositoryError::DatabaseError(db_err.message().to_string())
        }
      }
      sqlx::Error::PoolTimedOut => RepositoryError::ConnectionFailed("Pool timed out".to_string()),
      sqlx::Error::PoolClosed => RepositoryError::ConnectionFailed("Pool closed".to_string()),
      _ => RepositoryError::QueryFailed(error.to_string()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_not_found_message() {
    let err = RepositoryError::not_found("Job", 42);
    assert_eq!(err.to_string(), "Job not found: 42");
    assert!(err.is_not_found());
  }

  #[test]
  fn test_row_not_found_conversion() {
    let err: RepositoryError = sqlx::Error::RowNotFound.into();
    assert!(err.is_not_found());
  }

  #[test]
  fn test_pool_errors_are_connection_failures() {
    let err: RepositoryError = sqlx::Error::PoolTimedOut.into();
    assert!(matches!(err, RepositoryError::ConnectionFailed(_)));
  }
}
