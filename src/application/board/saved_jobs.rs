use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::domain::board::{
  BoardError, JobRepository, NewSavedJob, SavedJob, SavedJobChanges, SavedJobRepository,
};
use crate::domain::shared::{EntityId, Page, Pagination};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SavedJobOut {
  pub id: EntityId,
  pub user_id: EntityId,
  pub job_id: EntityId,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl From<SavedJob> for SavedJobOut {
  fn from(saved: SavedJob) -> Self {
    Self {
      id: saved.id,
      user_id: saved.user_id,
      job_id: saved.job_id,
      created_at: saved.created_at,
      updated_at: saved.updated_at,
    }
  }
}

/// Saved job with the fields of its job inlined
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SavedJobDetailsOut {
  pub id: EntityId,
  pub user_id: EntityId,
  pub job_id: EntityId,
  pub job_title: String,
  pub job_location: String,
  pub job_description: String,
  pub job_salary: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

pub struct SavedJobUseCase {
  saved_jobs: Arc<dyn SavedJobRepository>,
  jobs: Arc<dyn JobRepository>,
}

impl SavedJobUseCase {
  pub fn new(saved_jobs: Arc<dyn SavedJobRepository>, jobs: Arc<dyn JobRepository>) -> Self {
    Self { saved_jobs, jobs }
  }

  pub async fn get(&self, id: EntityId) -> Result<SavedJobOut, BoardError> {
    Ok(self.saved_jobs.get(id).await?.into())
  }

  pub async fn list(&self, pagination: Pagination) -> Result<Page<SavedJobOut>, BoardError> {
    let saved = self.saved_jobs.list_all().await?;
    Ok(Page::paginate(saved, pagination).map(SavedJobOut::from))
  }

  /// # Errors
  /// `Conflict` when the job is already saved or the user or job is missing
  pub async fn create(&self, draft: NewSavedJob) -> Result<SavedJobOut, BoardError> {
    let saved = self.saved_jobs.create(draft).await?;
    tracing::info!(
      saved_job_id = saved.id,
      job_id = saved.job_id,
      user_id = saved.user_id,
      "Job saved"
    );

    Ok(saved.into())
  }

  pub async fn update(
    &self,
    id: EntityId,
    changes: SavedJobChanges,
  ) -> Result<SavedJobOut, BoardError> {
    let saved = self.saved_jobs.update(id, changes).await?;
    tracing::info!(saved_job_id = saved.id, "Saved job updated");

    Ok(saved.into())
  }

  pub async fn delete(&self, id: EntityId) -> Result<SavedJobOut, BoardError> {
    let saved = self.saved_jobs.delete(id).await?;
    tracing::info!(saved_job_id = saved.id, "Saved job removed");

    Ok(saved.into())
  }

  pub async fn find_by_user_and_job(
    &self,
    user_id: EntityId,
    job_id: EntityId,
  ) -> Result<SavedJobOut, BoardError> {
    Ok(
      self
        .saved_jobs
        .find_by_user_and_job(user_id, job_id)
        .await?
        .into(),
    )
  }

  /// Saved jobs of `user_id`, newest first, each joined with its job
  pub async fn list_by_user(
    &self,
    user_id: EntityId,
    pagination: Pagination,
  ) -> Result<Page<SavedJobDetailsOut>, BoardError> {
    let saved = self.saved_jobs.find_by_user_id(user_id).await?;
    let page = Page::paginate(saved, pagination);

    let mut items = Vec::with_capacity(page.items.len());
    for saved in &page.items {
      let job = self.jobs.get(saved.job_id).await?;
      items.push(SavedJobDetailsOut {
        id: saved.id,
        user_id: saved.user_id,
        job_id: saved.job_id,
        job_title: job.title,
        job_location: job.location,
        job_description: job.description,
        job_salary: job.salary,
        created_at: saved.created_at,
        updated_at: saved.updated_at,
      });
    }

    Ok(Page {
      items,
      total: page.total,
      page: page.page,
      size: page.size,
      pages: page.pages,
    })
  }
}
