use async_trait::async_trait;
use chrono::Utc;

use super::{MemoryStore, newest_first};
use crate::domain::board::{Job, JobChanges, JobRepository, NewJob};
use crate::domain::shared::{Entity, EntityId, Repository, RepositoryError};

pub struct MemoryJobRepository {
  store: MemoryStore,
}

impl MemoryJobRepository {
  pub fn new(store: MemoryStore) -> Self {
    Self { store }
  }
}

#[async_trait]
impl Repository<Job> for MemoryJobRepository {
  async fn get(&self, id: EntityId) -> Result<Job, RepositoryError> {
    let tables = self.store.tables().read().await;
    tables
      .jobs
      .get(&id)
      .cloned()
      .ok_or_else(|| RepositoryError::not_found(Job::NAME, id))
  }

  async fn list_all(&self) -> Result<Vec<Job>, RepositoryError> {
    let tables = self.store.tables().read().await;
    Ok(tables.jobs.values().cloned().collect())
  }

  async fn create(&self, draft: NewJob) -> Result<Job, RepositoryError> {
    let mut tables = self.store.tables().write().await;
    tables.require_user(draft.user_id)?;

    let now = Utc::now();
    let job = Job {
      id: tables.job_ids.next_value(),
      user_id: draft.user_id,
      title: draft.title,
      company: draft.company,
      description: draft.description,
      salary: draft.salary,
      location: draft.location,
      tags: draft.tags,
      is_remote: draft.is_remote,
      logo: draft.logo,
      created_at: now,
      updated_at: now,
    };
    tables.jobs.insert(job.id, job.clone());

    Ok(job)
  }

  async fn update(&self, id: EntityId, changes: JobChanges) -> Result<Job, RepositoryError> {
    let mut tables = self.store.tables().write().await;

    if !tables.jobs.contains_key(&id) {
      return Err(RepositoryError::not_found(Job::NAME, id));
    }
    if let Some(user_id) = changes.user_id {
      tables.require_user(user_id)?;
    }

    let job = tables
      .jobs
      .get_mut(&id)
      .ok_or_else(|| RepositoryError::not_found(Job::NAME, id))?;
    changes.apply_to(job, Utc::now());

    Ok(job.clone())
  }

  async fn delete(&self, id: EntityId) -> Result<Job, RepositoryError> {
    let mut tables = self.store.tables().write().await;
    tables
      .cascade_job(id)
      .ok_or_else(|| RepositoryError::not_found(Job::NAME, id))
  }
}

#[async_trait]
impl JobRepository for MemoryJobRepository {
  async fn find_by_user_id(&self, user_id: EntityId) -> Result<Vec<Job>, RepositoryError> {
    let tables = self.store.tables().read().await;
    let mut jobs: Vec<Job> = tables
      .jobs
      .values()
      .filter(|job| job.user_id == user_id)
      .cloned()
      .collect();
    newest_first(&mut jobs, |job| (job.updated_at, job.id));

    Ok(jobs)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::auth::NewUser;
  use crate::infrastructure::persistence::memory::MemoryUserRepository;

  async fn owner(store: &MemoryStore) -> EntityId {
    MemoryUserRepository::new(store.clone())
      .create(NewUser {
        username: "owner".to_string(),
        email: None,
        first_name: None,
        middle_name: None,
        last_name: None,
        password_hash: "hash".to_string(),
      })
      .await
      .unwrap()
      .id
  }

  fn new_job(user_id: EntityId, title: &str) -> NewJob {
    NewJob {
      user_id,
      title: title.to_string(),
      company: None,
      description: "Build".to_string(),
      salary: None,
      location: "Remote".to_string(),
      tags: None,
      is_remote: true,
      logo: None,
    }
  }

  #[tokio::test]
  async fn test_find_by_user_newest_first() {
    let store = MemoryStore::new();
    let owner = owner(&store).await;
    let repo = MemoryJobRepository::new(store);

    let first = repo.create(new_job(owner, "First")).await.unwrap();
    let second = repo.create(new_job(owner, "Second")).await.unwrap();

    let ids: Vec<_> = repo
      .find_by_user_id(owner)
      .await
      .unwrap()
      .iter()
      .map(|job| job.id)
      .collect();
    assert_eq!(ids, vec![second.id, first.id]);

    repo
      .update(
        first.id,
        JobChanges {
          title: Some("First, revised".to_string()),
          ..Default::default()
        },
      )
      .await
      .unwrap();

    let ids: Vec<_> = repo
      .find_by_user_id(owner)
      .await
      .unwrap()
      .iter()
      .map(|job| job.id)
      .collect();
    assert_eq!(ids, vec![first.id, second.id]);
  }

  #[tokio::test]
  async fn test_user_without_jobs() {
    let store = MemoryStore::new();
    let owner = owner(&store).await;
    let repo = MemoryJobRepository::new(store);

    assert!(repo.find_by_user_id(owner).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_update_rejects_unknown_owner() {
    let store = MemoryStore::new();
    let owner = owner(&store).await;
    let repo = MemoryJobRepository::new(store);
    let job = repo.create(new_job(owner, "Job")).await.unwrap();

    let result = repo
      .update(
        job.id,
        JobChanges {
          user_id: Some(owner + 100),
          ..Default::default()
        },
      )
      .await;
    assert!(matches!(result, Err(RepositoryError::ForeignKeyViolation(_))));
  }
}
