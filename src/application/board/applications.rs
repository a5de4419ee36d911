use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::board::{
  Application, ApplicationChanges, ApplicationRepository, BoardError, FileStorage, JobRepository,
  NewApplication,
};
use crate::domain::shared::{EntityId, Page, Pagination};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ApplicationOut {
  pub id: EntityId,
  pub user_id: EntityId,
  pub job_id: EntityId,
  pub email: Option<String>,
  pub mobile_number: Option<String>,
  pub expected_salary: Option<i64>,
  pub resume: Option<String>,
  pub applied_at: DateTime<Utc>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl From<Application> for ApplicationOut {
  fn from(application: Application) -> Self {
    Self {
      id: application.id,
      user_id: application.user_id,
      job_id: application.job_id,
      email: application.email,
      mobile_number: application.mobile_number,
      expected_salary: application.expected_salary,
      resume: application.resume,
      applied_at: application.applied_at,
      created_at: application.created_at,
      updated_at: application.updated_at,
    }
  }
}

/// Contact details sent along with a resume upload
#[derive(Debug, Clone, Default)]
pub struct ApplicantDetails {
  pub email: Option<String>,
  pub mobile_number: Option<String>,
  pub expected_salary: Option<i64>,
}

/// Uploaded resume as received from the client
#[derive(Debug, Clone)]
pub struct ResumeUpload {
  pub file_name: String,
  pub bytes: Vec<u8>,
}

pub struct ApplicationUseCase {
  applications: Arc<dyn ApplicationRepository>,
  jobs: Arc<dyn JobRepository>,
  storage: Arc<dyn FileStorage>,
}

impl ApplicationUseCase {
  pub fn new(
    applications: Arc<dyn ApplicationRepository>,
    jobs: Arc<dyn JobRepository>,
    storage: Arc<dyn FileStorage>,
  ) -> Self {
    Self {
      applications,
      jobs,
      storage,
    }
  }

  pub async fn get(&self, id: EntityId) -> Result<ApplicationOut, BoardError> {
    Ok(self.applications.get(id).await?.into())
  }

  pub async fn list(&self, pagination: Pagination) -> Result<Page<ApplicationOut>, BoardError> {
    let applications = self.applications.list_all().await?;
    Ok(Page::paginate(applications, pagination).map(ApplicationOut::from))
  }

  /// # Errors
  /// `Conflict` when the user already applied or the user or job is missing
  pub async fn create(&self, draft: NewApplication) -> Result<ApplicationOut, BoardError> {
    let application = self.applications.create(draft).await?;
    tracing::info!(
      application_id = application.id,
      job_id = application.job_id,
      user_id = application.user_id,
      "Application created"
    );

    Ok(application.into())
  }

  pub async fn update(
    &self,
    id: EntityId,
    changes: ApplicationChanges,
  ) -> Result<ApplicationOut, BoardError> {
    let application = self.applications.update(id, changes).await?;
    tracing::info!(application_id = application.id, "Application updated");

    Ok(application.into())
  }

  pub async fn delete(&self, id: EntityId) -> Result<ApplicationOut, BoardError> {
    let application = self.applications.delete(id).await?;
    tracing::info!(application_id = application.id, "Application deleted");

    Ok(application.into())
  }

  pub async fn list_by_job(
    &self,
    job_id: EntityId,
    pagination: Pagination,
  ) -> Result<Page<ApplicationOut>, BoardError> {
    let applications = self.applications.find_by_job_id(job_id).await?;
    Ok(Page::paginate(applications, pagination).map(ApplicationOut::from))
  }

  pub async fn find_by_user_and_job(
    &self,
    user_id: EntityId,
    job_id: EntityId,
  ) -> Result<ApplicationOut, BoardError> {
    Ok(
      self
        .applications
        .find_by_user_and_job(user_id, job_id)
        .await?
        .into(),
    )
  }

  /// Stores the resume, then records the application pointing at it
  ///
  /// The stored file is removed again if the application cannot be created.
  ///
  /// # Errors
  /// `NotFound` when the job does not exist, `Conflict` when the user
  /// already applied to it
  pub async fn apply_with_resume(
    &self,
    user_id: EntityId,
    job_id: EntityId,
    details: ApplicantDetails,
    resume: ResumeUpload,
  ) -> Result<ApplicationOut, BoardError> {
    self.jobs.get(job_id).await?;

    let stored = self
      .storage
      .save_resume(user_id, &resume.file_name, &resume.bytes)
      .await?;

    let draft = NewApplication {
      user_id,
      job_id,
      email: details.email,
      mobile_number: details.mobile_number,
      expected_salary: details.expected_salary,
      resume: Some(stored.path.to_string_lossy().into_owned()),
    };

    match self.applications.create(draft).await {
      Ok(application) => {
        tracing::info!(
          application_id = application.id,
          job_id,
          user_id,
          resume = %stored.name,
          "Application created with resume"
        );
        Ok(application.into())
      }
      Err(e) => {
        if let Err(cleanup) = tokio::fs::remove_file(&stored.path).await {
          tracing::warn!(path = %stored.path.display(), error = %cleanup, "Failed to remove orphaned resume");
        }
        Err(e.into())
      }
    }
  }

  /// Resolves a stored resume for download
  ///
  /// # Errors
  /// `Storage(InvalidName)` for names that could escape the resume
  /// directory, `Storage(NotFound)` when no such file exists
  pub async fn open_resume(&self, name: &str) -> Result<PathBuf, BoardError> {
    Ok(self.storage.resume_path(name).await?)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::application::board::test_support::{Fixture, new_job};
  use crate::domain::board::StorageError;

  fn resume(name: &str, bytes: &[u8]) -> ResumeUpload {
    ResumeUpload {
      file_name: name.to_string(),
      bytes: bytes.to_vec(),
    }
  }

  #[tokio::test]
  async fn test_apply_with_resume_stores_file_and_path() {
    let fixture = Fixture::new().await;
    let job = fixture.jobs.create(new_job(fixture.alice, "Dev")).await.unwrap();

    let application = fixture
      .applications
      .apply_with_resume(
        fixture.bob,
        job.id,
        ApplicantDetails {
          expected_salary: Some(90_000),
          ..Default::default()
        },
        resume("cv.pdf", b"resume-bytes"),
      )
      .await
      .unwrap();

    let stored = PathBuf::from(application.resume.unwrap());
    assert_eq!(tokio::fs::read(&stored).await.unwrap(), b"resume-bytes");

    let name = stored.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with(&format!("user_{}_", fixture.bob)));
    assert_eq!(fixture.applications.open_resume(name).await.unwrap(), stored);
  }

  #[tokio::test]
  async fn test_apply_to_missing_job_is_not_found() {
    let fixture = Fixture::new().await;

    let result = fixture
      .applications
      .apply_with_resume(fixture.bob, 404, ApplicantDetails::default(), resume("cv.pdf", b"x"))
      .await;

    assert!(matches!(result, Err(BoardError::NotFound(_))));
  }

  #[tokio::test]
  async fn test_duplicate_application_conflicts_and_cleans_up() {
    let fixture = Fixture::new().await;
    let job = fixture.jobs.create(new_job(fixture.alice, "Dev")).await.unwrap();

    fixture
      .applications
      .apply_with_resume(fixture.bob, job.id, ApplicantDetails::default(), resume("a.pdf", b"1"))
      .await
      .unwrap();
    let second = fixture
      .applications
      .apply_with_resume(fixture.bob, job.id, ApplicantDetails::default(), resume("b.pdf", b"2"))
      .await;
    assert!(matches!(second, Err(BoardError::Conflict(_))));

    let mut entries = tokio::fs::read_dir(fixture.dir.path().join("resumes")).await.unwrap();
    let mut count = 0;
    while entries.next_entry().await.unwrap().is_some() {
      count += 1;
    }
    assert_eq!(count, 1);
  }

  #[tokio::test]
  async fn test_find_by_user_and_job() {
    let fixture = Fixture::new().await;
    let job = fixture.jobs.create(new_job(fixture.alice, "Dev")).await.unwrap();

    assert!(matches!(
      fixture.applications.find_by_user_and_job(fixture.bob, job.id).await,
      Err(BoardError::NotFound(_))
    ));

    let created = fixture
      .applications
      .create(NewApplication {
        user_id: fixture.bob,
        job_id: job.id,
        email: Some("bob@example.com".to_string()),
        mobile_number: None,
        expected_salary: None,
        resume: None,
      })
      .await
      .unwrap();

    let found = fixture
      .applications
      .find_by_user_and_job(fixture.bob, job.id)
      .await
      .unwrap();
    assert_eq!(found.id, created.id);
  }

  #[tokio::test]
  async fn test_open_resume_rejects_traversal() {
    let fixture = Fixture::new().await;

    assert!(matches!(
      fixture.applications.open_resume("../Cargo.toml").await,
      Err(BoardError::Storage(StorageError::InvalidName(_)))
    ));
  }
}
