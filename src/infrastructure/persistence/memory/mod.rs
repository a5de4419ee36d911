//! In-process store implementing the same repository contracts as Postgres
//!
//! Every table lives behind a single lock, so foreign key checks and
//! cascading deletes are atomic with respect to each other.

pub mod application_repository;
pub mod job_repository;
pub mod saved_job_repository;
pub mod user_repository;

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::auth::User;
use crate::domain::board::{Application, Job, SavedJob};
use crate::domain::shared::{EntityId, RepositoryError};

pub use application_repository::MemoryApplicationRepository;
pub use job_repository::MemoryJobRepository;
pub use saved_job_repository::MemorySavedJobRepository;
pub use user_repository::MemoryUserRepository;

/// Monotonic id source for one table, like a `BIGSERIAL` column
#[derive(Debug, Default)]
pub(crate) struct Sequence(EntityId);

impl Sequence {
  pub fn next_value(&mut self) -> EntityId {
    self.0 += 1;
    self.0
  }
}

#[derive(Debug, Default)]
pub(crate) struct Tables {
  pub users: BTreeMap<EntityId, User>,
  pub jobs: BTreeMap<EntityId, Job>,
  pub applications: BTreeMap<EntityId, Application>,
  pub saved_jobs: BTreeMap<EntityId, SavedJob>,
  pub user_ids: Sequence,
  pub job_ids: Sequence,
  pub application_ids: Sequence,
  pub saved_job_ids: Sequence,
}

impl Tables {

  pub fn require_user(&self, user_id: EntityId) -> Result<(), RepositoryError> {
    if self.users.contains_key(&user_id) {
      Ok(())
    } else {
      Err(RepositoryError::ForeignKeyViolation(format!(
        "user {user_id} does not exist"
      )))
    }
  }

  pub fn require_job(&self, job_id: EntityId) -> Result<(), RepositoryError> {
    if self.jobs.contains_key(&job_id) {
      Ok(())
    } else {
      Err(RepositoryError::ForeignKeyViolation(format!(
        "job {job_id} does not exist"
      )))
    }
  }

  /// Removes a job along with its applications and saved entries
  pub fn cascade_job(&mut self, job_id: EntityId) -> Option<Job> {
    let job = self.jobs.remove(&job_id)?;
    self.applications.retain(|_, a| a.job_id != job_id);
    self.saved_jobs.retain(|_, s| s.job_id != job_id);
    Some(job)
  }

  /// Removes a user along with everything that references them
  pub fn cascade_user(&mut self, user_id: EntityId) -> Option<User> {
    let user = self.users.remove(&user_id)?;

    let owned_jobs: Vec<EntityId> = self
      .jobs
      .values()
      .filter(|job| job.user_id == user_id)
      .map(|job| job.id)
      .collect();
    for job_id in owned_jobs {
      self.cascade_job(job_id);
    }

    self.applications.retain(|_, a| a.user_id != user_id);
    self.saved_jobs.retain(|_, s| s.user_id != user_id);
    Some(user)
  }
}

/// Shared handle to the in-memory tables
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub(crate) fn tables(&self) -> &RwLock<Tables> {
    &self.tables
  }
}

/// Newest `updated_at` first, ties broken by the higher id
pub(crate) fn newest_first<T>(items: &mut [T], key: impl Fn(&T) -> (DateTime<Utc>, EntityId)) {
  items.sort_by_key(|item| std::cmp::Reverse(key(item)));
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::auth::NewUser;
  use crate::domain::board::{NewApplication, NewJob, NewSavedJob};
  use crate::domain::shared::Repository;

  fn user(username: &str) -> NewUser {
    NewUser {
      username: username.to_string(),
      email: None,
      first_name: None,
      middle_name: None,
      last_name: None,
      password_hash: "hash".to_string(),
    }
  }

  fn job(user_id: EntityId) -> NewJob {
    NewJob {
      user_id,
      title: "Engineer".to_string(),
      company: None,
      description: "Build".to_string(),
      salary: None,
      location: "Remote".to_string(),
      tags: None,
      is_remote: true,
      logo: None,
    }
  }

  fn application(user_id: EntityId, job_id: EntityId) -> NewApplication {
    NewApplication {
      user_id,
      job_id,
      email: None,
      mobile_number: None,
      expected_salary: None,
      resume: None,
    }
  }

  #[tokio::test]
  async fn test_deleting_user_cascades_everywhere() {
    let store = MemoryStore::new();
    let users = MemoryUserRepository::new(store.clone());
    let jobs = MemoryJobRepository::new(store.clone());
    let applications = MemoryApplicationRepository::new(store.clone());
    let saved = MemorySavedJobRepository::new(store.clone());

    let owner = users.create(user("owner")).await.unwrap();
    let applicant = users.create(user("applicant")).await.unwrap();
    let owned_job = jobs.create(job(owner.id)).await.unwrap();
    let other_job = jobs.create(job(applicant.id)).await.unwrap();

    // The applicant applies to the owner's job; the owner applies to the applicant's
    let incoming = applications
      .create(application(applicant.id, owned_job.id))
      .await
      .unwrap();
    let outgoing = applications
      .create(application(owner.id, other_job.id))
      .await
      .unwrap();
    let bookmark = saved
      .create(NewSavedJob {
        user_id: owner.id,
        job_id: other_job.id,
      })
      .await
      .unwrap();

    users.delete(owner.id).await.unwrap();

    assert!(jobs.get(owned_job.id).await.unwrap_err().is_not_found());
    assert!(applications.get(incoming.id).await.unwrap_err().is_not_found());
    assert!(applications.get(outgoing.id).await.unwrap_err().is_not_found());
    assert!(saved.get(bookmark.id).await.unwrap_err().is_not_found());

    // Unrelated rows survive
    assert!(jobs.get(other_job.id).await.is_ok());
    assert!(users.get(applicant.id).await.is_ok());
  }

  #[tokio::test]
  async fn test_deleting_job_cascades() {
    let store = MemoryStore::new();
    let users = MemoryUserRepository::new(store.clone());
    let jobs = MemoryJobRepository::new(store.clone());
    let applications = MemoryApplicationRepository::new(store.clone());
    let saved = MemorySavedJobRepository::new(store.clone());

    let owner = users.create(user("owner")).await.unwrap();
    let target = jobs.create(job(owner.id)).await.unwrap();
    let app = applications
      .create(application(owner.id, target.id))
      .await
      .unwrap();
    let bookmark = saved
      .create(NewSavedJob {
        user_id: owner.id,
        job_id: target.id,
      })
      .await
      .unwrap();

    let deleted = jobs.delete(target.id).await.unwrap();
    assert_eq!(deleted.id, target.id);

    assert!(applications.get(app.id).await.unwrap_err().is_not_found());
    assert!(saved.get(bookmark.id).await.unwrap_err().is_not_found());
    assert!(users.get(owner.id).await.is_ok());
  }

  #[tokio::test]
  async fn test_each_table_numbers_its_own_rows() {
    let store = MemoryStore::new();
    let users = MemoryUserRepository::new(store.clone());
    let jobs = MemoryJobRepository::new(store.clone());
    let applications = MemoryApplicationRepository::new(store.clone());
    let saved = MemorySavedJobRepository::new(store.clone());

    let first = users.create(user("first")).await.unwrap();
    let second = users.create(user("second")).await.unwrap();
    assert_eq!((first.id, second.id), (1, 2));

    let posted = jobs.create(job(second.id)).await.unwrap();
    assert_eq!(posted.id, 1);

    let applied = applications
      .create(application(first.id, posted.id))
      .await
      .unwrap();
    assert_eq!(applied.id, 1);

    let bookmark = saved
      .create(NewSavedJob {
        user_id: first.id,
        job_id: posted.id,
      })
      .await
      .unwrap();
    assert_eq!(bookmark.id, 1);

    // Deleted ids are not handed out again
    users.delete(first.id).await.unwrap();
    let third = users.create(user("third")).await.unwrap();
    assert_eq!(third.id, 3);
  }

  #[tokio::test]
  async fn test_foreign_keys_are_enforced() {
    let store = MemoryStore::new();
    let jobs = MemoryJobRepository::new(store.clone());
    let applications = MemoryApplicationRepository::new(store.clone());

    assert!(matches!(
      jobs.create(job(77)).await,
      Err(RepositoryError::ForeignKeyViolation(_))
    ));
    assert!(matches!(
      applications.create(application(1, 2)).await,
      Err(RepositoryError::ForeignKeyViolation(_))
    ));
  }
}
