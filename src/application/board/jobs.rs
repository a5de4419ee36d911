use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::domain::board::{
  ApplicationRepository, BoardError, FileStorage, Job, JobChanges, JobRepository, NewJob,
};
use crate::domain::shared::{EntityId, Page, Pagination};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct JobOut {
  pub id: EntityId,
  pub user_id: EntityId,
  pub title: String,
  pub company: Option<String>,
  pub description: String,
  pub salary: Option<String>,
  pub location: String,
  pub tags: Option<String>,
  pub is_remote: bool,
  pub logo: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl From<Job> for JobOut {
  fn from(job: Job) -> Self {
    Self {
      id: job.id,
      user_id: job.user_id,
      title: job.title,
      company: job.company,
      description: job.description,
      salary: job.salary,
      location: job.location,
      tags: job.tags,
      is_remote: job.is_remote,
      logo: job.logo,
      created_at: job.created_at,
      updated_at: job.updated_at,
    }
  }
}

/// Name under which an uploaded logo was stored
#[derive(Debug, Clone, Serialize)]
pub struct LogoOut {
  pub filename: String,
}

/// Job postings and the views built around them
pub struct JobUseCase {
  jobs: Arc<dyn JobRepository>,
  applications: Arc<dyn ApplicationRepository>,
  storage: Arc<dyn FileStorage>,
}

impl JobUseCase {
  pub fn new(
    jobs: Arc<dyn JobRepository>,
    applications: Arc<dyn ApplicationRepository>,
    storage: Arc<dyn FileStorage>,
  ) -> Self {
    Self {
      jobs,
      applications,
      storage,
    }
  }

  pub async fn get(&self, id: EntityId) -> Result<JobOut, BoardError> {
    Ok(self.jobs.get(id).await?.into())
  }

  pub async fn list(&self, pagination: Pagination) -> Result<Page<JobOut>, BoardError> {
    let jobs = self.jobs.list_all().await?;
    Ok(Page::paginate(jobs, pagination).map(JobOut::from))
  }

  /// # Errors
  /// `Conflict` when the owner does not exist
  pub async fn create(&self, draft: NewJob) -> Result<JobOut, BoardError> {
    let job = self.jobs.create(draft).await?;
    tracing::info!(job_id = job.id, user_id = job.user_id, "Job created");

    Ok(job.into())
  }

  pub async fn update(&self, id: EntityId, changes: JobChanges) -> Result<JobOut, BoardError> {
    let job = self.jobs.update(id, changes).await?;
    tracing::info!(job_id = job.id, "Job updated");

    Ok(job.into())
  }

  /// Removes the job together with its applications and saved entries
  pub async fn delete(&self, id: EntityId) -> Result<JobOut, BoardError> {
    let job = self.jobs.delete(id).await?;
    tracing::info!(job_id = job.id, "Job deleted");

    Ok(job.into())
  }

  /// Jobs posted by `user_id`, newest first; empty for an unknown user
  pub async fn list_by_user(
    &self,
    user_id: EntityId,
    pagination: Pagination,
  ) -> Result<Page<JobOut>, BoardError> {
    let jobs = self.jobs.find_by_user_id(user_id).await?;
    Ok(Page::paginate(jobs, pagination).map(JobOut::from))
  }

  /// Jobs `user_id` applied to, in the order of their applications
  ///
  /// Each job on the requested page is fetched on its own.
  pub async fn list_applied(
    &self,
    user_id: EntityId,
    pagination: Pagination,
  ) -> Result<Page<JobOut>, BoardError> {
    let applications = self.applications.find_by_user_id(user_id).await?;
    let page = Page::paginate(applications, pagination);

    let mut jobs = Vec::with_capacity(page.items.len());
    for application in &page.items {
      jobs.push(JobOut::from(self.jobs.get(application.job_id).await?));
    }

    Ok(Page {
      items: jobs,
      total: page.total,
      page: page.page,
      size: page.size,
      pages: page.pages,
    })
  }

  pub async fn upload_logo(&self, original_name: &str, bytes: &[u8]) -> Result<LogoOut, BoardError> {
    let stored = self.storage.save_logo(original_name, bytes).await?;
    tracing::info!(filename = %stored.name, "Logo uploaded");

    Ok(LogoOut {
      filename: stored.name,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::application::board::test_support::{Fixture, new_job};
  use crate::domain::board::NewApplication;
  use crate::domain::shared::Repository;

  #[tokio::test]
  async fn test_user_without_jobs_gets_empty_page() {
    let fixture = Fixture::new().await;

    let page = fixture
      .jobs
      .list_by_user(fixture.bob, Pagination::default())
      .await
      .unwrap();

    assert!(page.items.is_empty());
    assert_eq!(page.total, 0);
    assert_eq!(page.pages, 0);
  }

  #[tokio::test]
  async fn test_list_by_user_newest_first() {
    let fixture = Fixture::new().await;
    let first = fixture.jobs.create(new_job(fixture.alice, "First")).await.unwrap();
    let second = fixture.jobs.create(new_job(fixture.alice, "Second")).await.unwrap();
    fixture.jobs.create(new_job(fixture.bob, "Other")).await.unwrap();

    let page = fixture
      .jobs
      .list_by_user(fixture.alice, Pagination::default())
      .await
      .unwrap();
    let ids: Vec<EntityId> = page.items.iter().map(|j| j.id).collect();

    assert_eq!(ids, vec![second.id, first.id]);
  }

  #[tokio::test]
  async fn test_list_applied_follows_applications() {
    let fixture = Fixture::new().await;
    let job_a = fixture.jobs.create(new_job(fixture.alice, "A")).await.unwrap();
    let job_b = fixture.jobs.create(new_job(fixture.alice, "B")).await.unwrap();

    for job_id in [job_a.id, job_b.id] {
      fixture
        .application_repo
        .create(NewApplication {
          user_id: fixture.bob,
          job_id,
          email: None,
          mobile_number: None,
          expected_salary: None,
          resume: None,
        })
        .await
        .unwrap();
    }

    let page = fixture
      .jobs
      .list_applied(fixture.bob, Pagination::default())
      .await
      .unwrap();
    let titles: Vec<&str> = page.items.iter().map(|j| j.title.as_str()).collect();

    assert_eq!(titles, vec!["B", "A"]);
    assert_eq!(page.total, 2);
  }

  #[tokio::test]
  async fn test_create_for_missing_owner_conflicts() {
    let fixture = Fixture::new().await;

    assert!(matches!(
      fixture.jobs.create(new_job(404, "Ghost")).await,
      Err(BoardError::Conflict(_))
    ));
  }

  #[tokio::test]
  async fn test_upload_logo_returns_stored_name() {
    let fixture = Fixture::new().await;

    let logo = fixture.jobs.upload_logo("acme.svg", b"<svg/>").await.unwrap();

    assert!(logo.filename.ends_with(".svg"));
    let stored = fixture.dir.path().join("logos").join(&logo.filename);
    assert_eq!(tokio::fs::read(stored).await.unwrap(), b"<svg/>");
  }
}
