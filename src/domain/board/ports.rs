use std::path::PathBuf;

use async_trait::async_trait;

use super::entities::{Application, Job, SavedJob};
use super::errors::StorageError;
use crate::domain::shared::{EntityId, Repository, RepositoryError};

#[async_trait]
pub trait JobRepository: Repository<Job> {
  /// Jobs posted by `user_id`, most recently updated first
  async fn find_by_user_id(&self, user_id: EntityId) -> Result<Vec<Job>, RepositoryError>;
}

#[async_trait]
pub trait ApplicationRepository: Repository<Application> {
  /// Applications to `job_id`, most recently updated first
  async fn find_by_job_id(&self, job_id: EntityId) -> Result<Vec<Application>, RepositoryError>;

  /// Applications made by `user_id`, most recently updated first
  async fn find_by_user_id(&self, user_id: EntityId)
  -> Result<Vec<Application>, RepositoryError>;

  /// Fails with `NotFound` when the user has not applied to the job
  async fn find_by_user_and_job(
    &self,
    user_id: EntityId,
    job_id: EntityId,
  ) -> Result<Application, RepositoryError>;
}

#[async_trait]
pub trait SavedJobRepository: Repository<SavedJob> {
  /// Saved jobs of `user_id`, most recently updated first
  async fn find_by_user_id(&self, user_id: EntityId) -> Result<Vec<SavedJob>, RepositoryError>;

  /// Fails with `NotFound` when the user has not saved the job
  async fn find_by_user_and_job(
    &self,
    user_id: EntityId,
    job_id: EntityId,
  ) -> Result<SavedJob, RepositoryError>;
}

/// Location of a stored file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
  /// Bare file name inside the storage directory
  pub name: String,
  /// Full path on disk
  pub path: PathBuf,
}

/// Persists uploaded resumes and logos
#[async_trait]
pub trait FileStorage: Send + Sync {
  /// Stores a resume for `user_id`; the returned name is unique per upload
  async fn save_resume(
    &self,
    user_id: EntityId,
    original_name: &str,
    bytes: &[u8],
  ) -> Result<StoredFile, StorageError>;

  /// Stores a logo under a random name keeping the original extension
  async fn save_logo(&self, original_name: &str, bytes: &[u8]) -> Result<StoredFile, StorageError>;

  /// Resolves a resume by bare file name
  ///
  /// Names containing path separators or `..` are rejected.
  async fn resume_path(&self, name: &str) -> Result<PathBuf, StorageError>;
}
