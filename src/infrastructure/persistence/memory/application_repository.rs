use async_trait::async_trait;
use chrono::Utc;

use super::{MemoryStore, newest_first};
use crate::domain::board::{Application, ApplicationChanges, ApplicationRepository, NewApplication};
use crate::domain::shared::{Entity, EntityId, Repository, RepositoryError};

pub struct MemoryApplicationRepository {
  store: MemoryStore,
}

impl MemoryApplicationRepository {
  pub fn new(store: MemoryStore) -> Self {
    Self { store }
  }
}

#[async_trait]
impl Repository<Application> for MemoryApplicationRepository {
  async fn get(&self, id: EntityId) -> Result<Application, RepositoryError> {
    let tables = self.store.tables().read().await;
    tables
      .applications
      .get(&id)
      .cloned()
      .ok_or_else(|| RepositoryError::not_found(Application::NAME, id))
  }

  async fn list_all(&self) -> Result<Vec<Application>, RepositoryError> {
    let tables = self.store.tables().read().await;
    Ok(tables.applications.values().cloned().collect())
  }

  async fn create(&self, draft: NewApplication) -> Result<Application, RepositoryError> {
    let mut tables = self.store.tables().write().await;
    tables.require_user(draft.user_id)?;
    tables.require_job(draft.job_id)?;

    if tables
      .applications
      .values()
      .any(|a| a.user_id == draft.user_id && a.job_id == draft.job_id)
    {
      return Err(RepositoryError::DuplicateKey(format!(
        "user {} already applied to job {}",
        draft.user_id, draft.job_id
      )));
    }

    let now = Utc::now();
    let application = Application {
      id: tables.application_ids.next_value(),
      user_id: draft.user_id,
      job_id: draft.job_id,
      email: draft.email,
      mobile_number: draft.mobile_number,
      expected_salary: draft.expected_salary,
      resume: draft.resume,
      applied_at: now,
      created_at: now,
      updated_at: now,
    };
    tables.applications.insert(application.id, application.clone());

    Ok(application)
  }

  async fn update(
    &self,
    id: EntityId,
    changes: ApplicationChanges,
  ) -> Result<Application, RepositoryError> {
    let mut tables = self.store.tables().write().await;
    let application = tables
      .applications
      .get_mut(&id)
      .ok_or_else(|| RepositoryError::not_found(Application::NAME, id))?;
    changes.apply_to(application, Utc::now());

    Ok(application.clone())
  }

  async fn delete(&self, id: EntityId) -> Result<Application, RepositoryError> {
    let mut tables = self.store.tables().write().await;
    tables
      .applications
      .remove(&id)
      .ok_or_else(|| RepositoryError::not_found(Application::NAME, id))
  }
}

#[async_trait]
impl ApplicationRepository for MemoryApplicationRepository {
  async fn find_by_job_id(&self, job_id: EntityId) -> Result<Vec<Application>, RepositoryError> {
    let tables = self.store.tables().read().await;
    let mut applications: Vec<Application> = tables
      .applications
      .values()
      .filter(|a| a.job_id == job_id)
      .cloned()
      .collect();
    newest_first(&mut applications, |a| (a.updated_at, a.id));

    Ok(applications)
  }

  async fn find_by_user_id(
    &self,
    user_id: EntityId,
  ) -> Result<Vec<Application>, RepositoryError> {
    let tables = self.store.tables().read().await;
    let mut applications: Vec<Application> = tables
      .applications
      .values()
      .filter(|a| a.user_id == user_id)
      .cloned()
      .collect();
    newest_first(&mut applications, |a| (a.updated_at, a.id));

    Ok(applications)
  }

  async fn find_by_user_and_job(
    &self,
    user_id: EntityId,
    job_id: EntityId,
  ) -> Result<Application, RepositoryError> {
    let tables = self.store.tables().read().await;
    tables
      .applications
      .values()
      .find(|a| a.user_id == user_id && a.job_id == job_id)
      .cloned()
      .ok_or_else(|| {
        RepositoryError::not_found(
          Application::NAME,
          format!("user {user_id}, job {job_id}"),
        )
      })
  }
}
