use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::board::{Job, JobChanges, JobRepository, NewJob};
use crate::domain::shared::{Entity, EntityId, Repository, RepositoryError};

pub struct PostgresJobRepository {
  pool: PgPool,
}

impl PostgresJobRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[derive(Debug, sqlx::FromRow)]
struct JobRow {
  id: i64,
  user_id: i64,
  title: String,
  company: Option<String>,
  description: String,
  salary: Option<String>,
  location: String,
  tags: Option<String>,
  is_remote: bool,
  logo: Option<String>,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl From<JobRow> for Job {
  fn from(row: JobRow) -> Self {
    Job {
      id: row.id,
      user_id: row.user_id,
      title: row.title,
      company: row.company,
      description: row.description,
      salary: row.salary,
      location: row.location,
      tags: row.tags,
      is_remote: row.is_remote,
      logo: row.logo,
      created_at: row.created_at,
      updated_at: row.updated_at,
    }
  }
}

#[async_trait]
impl Repository<Job> for PostgresJobRepository {
  async fn get(&self, id: EntityId) -> Result<Job, RepositoryError> {
    let row = sqlx::query_as::<_, JobRow>(
      r#"
            SELECT
                id, user_id, title, company, description, salary, location,
                tags, is_remote, logo, created_at, updated_at
            FROM jobs
            WHERE id = $1
            "#,
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;

    row
      .map(Into::into)
      .ok_or_else(|| RepositoryError::not_found(Job::NAME, id))
  }

  async fn list_all(&self) -> Result<Vec<Job>, RepositoryError> {
    let rows = sqlx::query_as::<_, JobRow>(
      r#"
            SELECT
                id, user_id, title, company, description, salary, location,
                tags, is_remote, logo, created_at, updated_at
            FROM jobs
            ORDER BY id
            "#,
    )
    .fetch_all(&self.pool)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
  }

  async fn create(&self, draft: NewJob) -> Result<Job, RepositoryError> {
    let row = sqlx::query_as::<_, JobRow>(
      r#"
            INSERT INTO jobs (
                user_id, title, company, description, salary, location,
                tags, is_remote, logo
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING
                id, user_id, title, company, description, salary, location,
                tags, is_remote, logo, created_at, updated_at
            "#,
    )
    .bind(draft.user_id)
    .bind(&draft.title)
    .bind(&draft.company)
    .bind(&draft.description)
    .bind(&draft.salary)
    .bind(&draft.location)
    .bind(&draft.tags)
    .bind(draft.is_remote)
    .bind(&draft.logo)
    .fetch_one(&self.pool)
    .await?;

    Ok(row.into())
  }

  async fn update(&self, id: EntityId, changes: JobChanges) -> Result<Job, RepositoryError> {
    let row = sqlx::query_as::<_, JobRow>(
      r#"
            UPDATE jobs
            SET
                user_id = COALESCE($2, user_id),
                title = COALESCE($3, title),
                company = COALESCE($4, company),
                description = COALESCE($5, description),
                salary = COALESCE($6, salary),
                location = COALESCE($7, location),
                tags = COALESCE($8, tags),
                is_remote = COALESCE($9, is_remote),
                logo = COALESCE($10, logo),
                updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, user_id, title, company, description, salary, location,
                tags, is_remote, logo, created_at, updated_at
            "#,
    )
    .bind(id)
    .bind(changes.user_id)
    .bind(&changes.title)
    .bind(&changes.company)
    .bind(&changes.description)
    .bind(&changes.salary)
    .bind(&changes.location)
    .bind(&changes.tags)
    .bind(changes.is_remote)
    .bind(&changes.logo)
    .fetch_optional(&self.pool)
    .await?;

    row
      .map(Into::into)
      .ok_or_else(|| RepositoryError::not_found(Job::NAME, id))
  }

  async fn delete(&self, id: EntityId) -> Result<Job, RepositoryError> {
    let row = sqlx::query_as::<_, JobRow>(
      r#"
            DELETE FROM jobs
            WHERE id = $1
            RETURNING
                id, user_id, title, company, description, salary, location,
                tags, is_remote, logo, created_at, updated_at
            "#,
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;

    row
      .map(Into::into)
      .ok_or_else(|| RepositoryError::not_found(Job::NAME, id))
  }
}

#[async_trait]
impl JobRepository for PostgresJobRepository {
  async fn find_by_user_id(&self, user_id: EntityId) -> Result<Vec<Job>, RepositoryError> {
    let rows = sqlx::query_as::<_, JobRow>(
      r#"
            SELECT
                id, user_id, title, company, description, salary, location,
                tags, is_remote, logo, created_at, updated_at
            FROM jobs
            WHERE user_id = $1
            ORDER BY updated_at DESC, id DESC
            "#,
    )
    .bind(user_id)
    .fetch_all(&self.pool)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::infrastructure::persistence::postgres::test_support::{insert_user, setup_test_db};

  fn new_job(user_id: EntityId, title: &str) -> NewJob {
    NewJob {
      user_id,
      title: title.to_string(),
      company: Some("Acme".to_string()),
      description: "Write Rust".to_string(),
      salary: Some("100k".to_string()),
      location: "Remote".to_string(),
      tags: Some("rust,backend".to_string()),
      is_remote: true,
      logo: None,
    }
  }

  #[tokio::test]
  #[ignore = "requires Docker"]
  async fn test_create_and_list_by_user() {
    let (pool, _container) = setup_test_db().await;
    let owner = insert_user(&pool, "owner").await;
    let repo = PostgresJobRepository::new(pool);

    let first = repo.create(new_job(owner, "First")).await.unwrap();
    let second = repo.create(new_job(owner, "Second")).await.unwrap();

    // Touch the first job so it becomes the most recently updated
    repo
      .update(
        first.id,
        JobChanges {
          salary: Some("120k".to_string()),
          ..Default::default()
        },
      )
      .await
      .unwrap();

    let jobs = repo.find_by_user_id(owner).await.unwrap();
    let ids: Vec<_> = jobs.iter().map(|job| job.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);
  }

  #[tokio::test]
  #[ignore = "requires Docker"]
  async fn test_missing_owner_is_foreign_key_violation() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresJobRepository::new(pool);

    match repo.create(new_job(424242, "Orphan")).await.unwrap_err() {
      RepositoryError::ForeignKeyViolation(_) => {}
      other => panic!("Expected ForeignKeyViolation, got {other:?}"),
    }
  }

  #[tokio::test]
  #[ignore = "requires Docker"]
  async fn test_deleting_owner_cascades() {
    let (pool, _container) = setup_test_db().await;
    let owner = insert_user(&pool, "cascade").await;
    let repo = PostgresJobRepository::new(pool.clone());
    let job = repo.create(new_job(owner, "Doomed")).await.unwrap();

    sqlx::query("DELETE FROM users WHERE id = $1")
      .bind(owner)
      .execute(&pool)
      .await
      .unwrap();

    assert!(repo.get(job.id).await.unwrap_err().is_not_found());
  }
}
