use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::board::{NewSavedJob, SavedJob, SavedJobChanges, SavedJobRepository};
use crate::domain::shared::{Entity, EntityId, Repository, RepositoryError};

pub struct PostgresSavedJobRepository {
  pool: PgPool,
}

impl PostgresSavedJobRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[derive(Debug, sqlx::FromRow)]
struct SavedJobRow {
  id: i64,
  user_id: i64,
  job_id: i64,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl From<SavedJobRow> for SavedJob {
  fn from(row: SavedJobRow) -> Self {
    SavedJob {
      id: row.id,
      user_id: row.user_id,
      job_id: row.job_id,
      created_at: row.created_at,
      updated_at: row.updated_at,
    }
  }
}

#[async_trait]
impl Repository<SavedJob> for PostgresSavedJobRepository {
  async fn get(&self, id: EntityId) -> Result<SavedJob, RepositoryError> {
    let row = sqlx::query_as::<_, SavedJobRow>(
      "SELECT id, user_id, job_id, created_at, updated_at FROM saved_jobs WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;

    row
      .map(Into::into)
      .ok_or_else(|| RepositoryError::not_found(SavedJob::NAME, id))
  }

  async fn list_all(&self) -> Result<Vec<SavedJob>, RepositoryError> {
    let rows = sqlx::query_as::<_, SavedJobRow>(
      "SELECT id, user_id, job_id, created_at, updated_at FROM saved_jobs ORDER BY id",
    )
    .fetch_all(&self.pool)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
  }

  async fn create(&self, draft: NewSavedJob) -> Result<SavedJob, RepositoryError> {
    let row = sqlx::query_as::<_, SavedJobRow>(
      r#"
            INSERT INTO saved_jobs (user_id, job_id)
            VALUES ($1, $2)
            RETURNING id, user_id, job_id, created_at, updated_at
            "#,
    )
    .bind(draft.user_id)
    .bind(draft.job_id)
    .fetch_one(&self.pool)
    .await?;

    Ok(row.into())
  }

  async fn update(
    &self,
    id: EntityId,
    changes: SavedJobChanges,
  ) -> Result<SavedJob, RepositoryError> {
    let row = sqlx::query_as::<_, SavedJobRow>(
      r#"
            UPDATE saved_jobs
            SET
                user_id = COALESCE($2, user_id),
                job_id = COALESCE($3, job_id),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, job_id, created_at, updated_at
            "#,
    )
    .bind(id)
    .bind(changes.user_id)
    .bind(changes.job_id)
    .fetch_optional(&self.pool)
    .await?;

    row
      .map(Into::into)
      .ok_or_else(|| RepositoryError::not_found(SavedJob::NAME, id))
  }

  async fn delete(&self, id: EntityId) -> Result<SavedJob, RepositoryError> {
    let row = sqlx::query_as::<_, SavedJobRow>(
      r#"
            DELETE FROM saved_jobs
            WHERE id = $1
            RETURNING id, user_id, job_id, created_at, updated_at
            "#,
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;

    row
      .map(Into::into)
      .ok_or_else(|| RepositoryError::not_found(SavedJob::NAME, id))
  }
}

#[async_trait]
impl SavedJobRepository for PostgresSavedJobRepository {
  async fn find_by_user_id(&self, user_id: EntityId) -> Result<Vec<SavedJob>, RepositoryError> {
    let rows = sqlx::query_as::<_, SavedJobRow>(
      r#"
            SELECT id, user_id, job_id, created_at, updated_at
            FROM saved_jobs
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
  ) -> Result<SavedJob, RepositoryError> {
    let row = sqlx::query_as::<_, SavedJobRow>(
      r#"
            SELECT id, user_id, job_id, created_at, updated_at
            FROM saved_jobs
            WHERE user_id = $1 AND job_id = $2
            "#,
    )
    .bind(user_id)
    .bind(job_id)
    .fetch_optional(&self.pool)
    .await?;

    row.map(Into::into).ok_or_else(|| {
      RepositoryError::not_found(SavedJob::NAME, format!("user {user_id}, job {job_id}"))
    })
  }
}
