use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::board::{Application, ApplicationChanges, ApplicationRepository, NewApplication};
use crate::domain::shared::{Entity, EntityId, Repository, RepositoryError};

pub struct PostgresApplicationRepository {
  pool: PgPool,
}

impl PostgresApplicationRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[derive(Debug, sqlx::FromRow)]
struct ApplicationRow {
  id: i64,
  user_id: i64,
  job_id: i64,
  email: Option<String>,
  mobile_number: Option<String>,
  expected_salary: Option<i64>,
  resume: Option<String>,
  applied_at: DateTime<Utc>,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl From<ApplicationRow> for Application {
  fn from(row: ApplicationRow) -> Self {
    Application {
      id: row.id,
      user_id: row.user_id,
      job_id: row.job_id,
      email: row.email,
      mobile_number: row.mobile_number,
      expected_salary: row.expected_salary,
      resume: row.resume,
      applied_at: row.applied_at,
      created_at: row.created_at,
      updated_at: row.updated_at,
    }
  }
}

#[async_trait]
impl Repository<Application> for PostgresApplicationRepository {
  async fn get(&self, id: EntityId) -> Result<Application, RepositoryError> {
    let row = sqlx::query_as::<_, ApplicationRow>(
      r#"
            SELECT
                id, user_id, job_id, email, mobile_number, expected_salary,
                resume, applied_at, created_at, updated_at
            FROM applications
            WHERE id = $1
            "#,
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;

    row
      .map(Into::into)
      .ok_or_else(|| RepositoryError::not_found(Application::NAME, id))
  }

  async fn list_all(&self) -> Result<Vec<Application>, RepositoryError> {
    let rows = sqlx::query_as::<_, ApplicationRow>(
      r#"
            SELECT
                id, user_id, job_id, email, mobile_number, expected_salary,
                resume, applied_at, created_at, updated_at
            FROM applications
            ORDER BY id
            "#,
    )
    .fetch_all(&self.pool)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
  }

  async fn create(&self, draft: NewApplication) -> Result<Application, RepositoryError> {
    let row = sqlx::query_as::<_, ApplicationRow>(
      r#"
            INSERT INTO applications (
                user_id, job_id, email, mobile_number, expected_salary, resume
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING
                id, user_id, job_id, email, mobile_number, expected_salary,
                resume, applied_at, created_at, updated_at
            "#,
    )
    .bind(draft.user_id)
    .bind(draft.job_id)
    .bind(&draft.email)
    .bind(&draft.mobile_number)
    .bind(draft.expected_salary)
    .bind(&draft.resume)
    .fetch_one(&self.pool)
    .await?;

    Ok(row.into())
  }

  async fn update(
    &self,
    id: EntityId,
    changes: ApplicationChanges,
  ) -> Result<Application, RepositoryError> {
    let row = sqlx::query_as::<_, ApplicationRow>(
      r#"
            UPDATE applications
            SET
                email = COALESCE($2, email),
                mobile_number = COALESCE($3, mobile_number),
                expected_salary = COALESCE($4, expected_salary),
                resume = COALESCE($5, resume),
                updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, user_id, job_id, email, mobile_number, expected_salary,
                resume, applied_at, created_at, updated_at
            "#,
    )
    .bind(id)
    .bind(&changes.email)
    .bind(&changes.mobile_number)
    .bind(changes.expected_salary)
    .bind(&changes.resume)
    .fetch_optional(&self.pool)
    .await?;

    row
      .map(Into::into)
      .ok_or_else(|| RepositoryError::not_found(Application::NAME, id))
  }

  async fn delete(&self, id: EntityId) -> Result<Application, RepositoryError> {
    let row = sqlx::query_as::<_, ApplicationRow>(
      r#"
            DELETE FROM applications
            WHERE id = $1
            RETURNING
                id, user_id, job_id, email, mobile_number, expected_salary,
                resume, applied_at, created_at, updated_at
            "#,
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;

    row
      .map(Into::into)
      .ok_or_else(|| RepositoryError::not_found(Application::NAME, id))
  }
}

#[async_trait]
impl ApplicationRepository for PostgresApplicationRepository {
  async fn find_by_job_id(&self, job_id: EntityId) -> Result<Vec<Application>, RepositoryError> {
    let rows = sqlx::query_as::<_, ApplicationRow>(
      r#"
            SELECT
                id, user_id, job_id, email, mobile_number, expected_salary,
                resume, applied_at, created_at, updated_at
            FROM applications
            WHERE job_id = $1
            ORDER BY updated_at DESC, id DESC
            "#,
    )
    .bind(job_id)
    .fetch_all(&self.pool)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
  }

  async fn find_by_user_id(
    &self,
    user_id: EntityId,
  ) -> Result<Vec<Application>, RepositoryError> {
    let rows = sqlx::query_as::<_, ApplicationRow>(
      r#"
            SELECT
                id, user_id, job_id, email, mobile_number, expected_salary,
                resume, applied_at, created_at, updated_at
            FROM applications
            WHERE user_id = $1
            ORDER BY updated_at DESC, id DESC
            "#,
    )
    .bind(user_id)
    .fetch_all(&self.pool)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
  }

  async fn find_by_user_and_job(
    &self,
    user_id: EntityId,
    job_id: EntityId,
  ) -> Result<Application, RepositoryError> {
    let row = sqlx::query_as::<_, ApplicationRow>(
      r#"
            SELECT
                id, user_id, job_id, email, mobile_number, expected_salary,
                resume, applied_at, created_at, updated_at
            FROM applications
            WHERE user_id = $1 AND job_id = $2
            "#,
    )
    .bind(user_id)
    .bind(job_id)
    .fetch_optional(&self.pool)
    .await?;

    row.map(Into::into).ok_or_else(|| {
      RepositoryError::not_found(
        Application::NAME,
        format!("user {user_id}, job {job_id}"),
      )
    })
  }
}
