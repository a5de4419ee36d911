use async_trait::async_trait;
use chrono::Utc;

use super::{MemoryStore, Tables, newest_first};
use crate::domain::board::{NewSavedJob, SavedJob, SavedJobChanges, SavedJobRepository};
use crate::domain::shared::{Entity, EntityId, Repository, RepositoryError};

pub struct MemorySavedJobRepository {
  store: MemoryStore,
}

impl MemorySavedJobRepository {
  pub fn new(store: MemoryStore) -> Self {
    Self { store }
  }
}

fn ensure_not_saved(
  tables: &Tables,
  except: Option<EntityId>,
  user_id: EntityId,
  job_id: EntityId,
) -> Result<(), RepositoryError> {
  let taken = tables
    .saved_jobs
    .values()
    .any(|s| Some(s.id) != except && s.user_id == user_id && s.job_id == job_id);

  if taken {
    Err(RepositoryError::DuplicateKey(format!(
      "user {user_id} already saved job {job_id}"
    )))
  } else {
    Ok(())
  }
}

#[async_trait]
impl Repository<SavedJob> for MemorySavedJobRepository {
  async fn get(&self, id: EntityId) -> Result<SavedJob, RepositoryError> {
    let tables = self.store.tables().read().await;
    tables
      .saved_jobs
      .get(&id)
      .cloned()
      .ok_or_else(|| RepositoryError::not_found(SavedJob::NAME, id))
  }

  async fn list_all(&self) -> Result<Vec<SavedJob>, RepositoryError> {
    let tables = self.store.tables().read().await;
    Ok(tables.saved_jobs.values().cloned().collect())
  }

  async fn create(&self, draft: NewSavedJob) -> Result<SavedJob, RepositoryError> {
    let mut tables = self.store.tables().write().await;
    tables.require_user(draft.user_id)?;
    tables.require_job(draft.job_id)?;
    ensure_not_saved(&tables, None, draft.user_id, draft.job_id)?;

    let now = Utc::now();
    let saved = SavedJob {
      id: tables.saved_job_ids.next_value(),
      user_id: draft.user_id,
      job_id: draft.job_id,
      created_at: now,
      updated_at: now,
    };
    tables.saved_jobs.insert(saved.id, saved.clone());

    Ok(saved)
  }

  async fn update(
    &self,
    id: EntityId,
    changes: SavedJobChanges,
  ) -> Result<SavedJob, RepositoryError> {
    let mut tables = self.store.tables().write().await;
    let current = tables
      .saved_jobs
      .get(&id)
      .cloned()
      .ok_or_else(|| RepositoryError::not_found(SavedJob::NAME, id))?;

    let user_id = changes.user_id.unwrap_or(current.user_id);
    let job_id = changes.job_id.unwrap_or(current.job_id);
    tables.require_user(user_id)?;
    tables.require_job(job_id)?;
    ensure_not_saved(&tables, Some(id), user_id, job_id)?;

    let saved = tables
      .saved_jobs
      .get_mut(&id)
      .ok_or_else(|| RepositoryError::not_found(SavedJob::NAME, id))?;
    changes.apply_to(saved, Utc::now());

    Ok(saved.clone())
  }

  async fn delete(&self, id: EntityId) -> Result<SavedJob, RepositoryError> {
    let mut tables = self.store.tables().write().await;
    tables
      .saved_jobs
      .remove(&id)
      .ok_or_else(|| RepositoryError::not_found(SavedJob::NAME, id))
  }
}

#[async_trait]
impl SavedJobRepository for MemorySavedJobRepository {
  async fn find_by_user_id(&self, user_id: EntityId) -> Result<Vec<SavedJob>, RepositoryError> {
    let tables = self.store.tables().read().await;
    let mut saved: Vec<SavedJob> = tables
      .saved_jobs
      .values()
      .filter(|s| s.user_id == user_id)
      .cloned()
      .collect();
    newest_first(&mut saved, |s| (s.updated_at, s.id));

    Ok(saved)
  }

  async fn find_by_user_and_job(
    &self,
    user_id: EntityId,
    job_id: EntityId,
  ) -> Result<SavedJob, RepositoryError> {
    let tables = self.store.tables().read().await;
    tables
      .saved_jobs
      .values()
      .find(|s| s.user_id == user_id && s.job_id == job_id)
      .cloned()
      .ok_or_else(|| {
        RepositoryError::not_found(SavedJob::NAME, format!("user {user_id}, job {job_id}"))
      })
  }
}
