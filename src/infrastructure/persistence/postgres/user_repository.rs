use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::auth::{NewUser, User, UserChanges, UserRepository};
use crate::domain::shared::{Entity, EntityId, Repository, RepositoryError};

/// PostgreSQL implementation of the UserRepository trait
pub struct PostgresUserRepository {
  pool: PgPool,
}

impl PostgresUserRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

/// Database row structure for users table
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
  id: i64,
  username: String,
  email: Option<String>,
  first_name: Option<String>,
  middle_name: Option<String>,
  last_name: Option<String>,
  password_hash: String,
  password_reset_code_hash: Option<String>,
  password_reset_expires_at: Option<DateTime<Utc>>,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
  fn from(row: UserRow) -> Self {
    User {
      id: row.id,
      username: row.username,
      email: row.email,
      first_name: row.first_name,
      middle_name: row.middle_name,
      last_name: row.last_name,
      password_hash: row.password_hash,
      password_reset_code_hash: row.password_reset_code_hash,
      password_reset_expires_at: row.password_reset_expires_at,
      created_at: row.created_at,
      updated_at: row.updated_at,
    }
  }
}

fn not_found(id: EntityId) -> RepositoryError {
  RepositoryError::not_found(User::NAME, id)
}

#[async_trait]
impl Repository<User> for PostgresUserRepository {
  async fn get(&self, id: EntityId) -> Result<User, RepositoryError> {
    let row = sqlx::query_as::<_, UserRow>(
      r#"
            SELECT
                id, username, email, first_name, middle_name, last_name,
                password_hash, password_reset_code_hash, password_reset_expires_at,
                created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;

    row.map(Into::into).ok_or_else(|| not_found(id))
  }

  async fn list_all(&self) -> Result<Vec<User>, RepositoryError> {
    let rows = sqlx::query_as::<_, UserRow>(
      r#"
            SELECT
                id, username, email, first_name, middle_name, last_name,
                password_hash, password_reset_code_hash, password_reset_expires_at,
                created_at, updated_at
            FROM users
            ORDER BY id
            "#,
    )
    .fetch_all(&self.pool)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
  }

  async fn create(&self, draft: NewUser) -> Result<User, RepositoryError> {
    let row = sqlx::query_as::<_, UserRow>(
      r#"
            INSERT INTO users (
                username, email, first_name, middle_name, last_name, password_hash
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING
                id, username, email, first_name, middle_name, last_name,
                password_hash, password_reset_code_hash, password_reset_expires_at,
                created_at, updated_at
            "#,
    )
    .bind(&draft.username)
    .bind(&draft.email)
    .bind(&draft.first_name)
    .bind(&draft.middle_name)
    .bind(&draft.last_name)
    .bind(&draft.password_hash)
    .fetch_one(&self.pool)
    .await?;

    Ok(row.into())
  }

  async fn update(&self, id: EntityId, changes: UserChanges) -> Result<User, RepositoryError> {
    let row = sqlx::query_as::<_, UserRow>(
      r#"
            UPDATE users
            SET
                username = COALESCE($2, username),
                email = COALESCE($3, email),
                first_name = COALESCE($4, first_name),
                middle_name = COALESCE($5, middle_name),
                last_name = COALESCE($6, last_name),
                updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, username, email, first_name, middle_name, last_name,
                password_hash, password_reset_code_hash, password_reset_expires_at,
                created_at, updated_at
            "#,
    )
    .bind(id)
    .bind(&changes.username)
    .bind(&changes.email)
    .bind(&changes.first_name)
    .bind(&changes.middle_name)
    .bind(&changes.last_name)
    .fetch_optional(&self.pool)
    .await?;

    row.map(Into::into).ok_or_else(|| not_found(id))
  }

  async fn delete(&self, id: EntityId) -> Result<User, RepositoryError> {
    // Jobs, applications and saved jobs go with it through ON DELETE CASCADE
    let row = sqlx::query_as::<_, UserRow>(
      r#"
            DELETE FROM users
            WHERE id = $1
            RETURNING
                id, username, email, first_name, middle_name, last_name,
                password_hash, password_reset_code_hash, password_reset_expires_at,
                created_at, updated_at
            "#,
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;

    row.map(Into::into).ok_or_else(|| not_found(id))
  }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
  async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
    let row = sqlx::query_as::<_, UserRow>(
      r#"
            SELECT
                id, username, email, first_name, middle_name, last_name,
                password_hash, password_reset_code_hash, password_reset_expires_at,
                created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
    )
    .bind(username)
    .fetch_optional(&self.pool)
    .await?;

    Ok(row.map(Into::into))
  }

  async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
    let row = sqlx::query_as::<_, UserRow>(
      r#"
            SELECT
                id, username, email, first_name, middle_name, last_name,
                password_hash, password_reset_code_hash, password_reset_expires_at,
                created_at, updated_at
            FROM users
            WHERE email = $1
            ORDER BY id
            LIMIT 1
            "#,
    )
    .bind(email)
    .fetch_optional(&self.pool)
    .await?;

    Ok(row.map(Into::into))
  }

  async fn update_password(
    &self,
    id: EntityId,
    password_hash: &str,
  ) -> Result<User, RepositoryError> {
    let row = sqlx::query_as::<_, UserRow>(
      r#"
            UPDATE users
            SET
                password_hash = $2,
                password_reset_code_hash = NULL,
                password_reset_expires_at = NULL,
                updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, username, email, first_name, middle_name, last_name,
                password_hash, password_reset_code_hash, password_reset_expires_at,
                created_at, updated_at
            "#,
    )
    .bind(id)
    .bind(password_hash)
    .fetch_optional(&self.pool)
    .await?;

    row.map(Into::into).ok_or_else(|| not_found(id))
  }

  async fn set_password_reset(
    &self,
    id: EntityId,
    code: Option<(String, DateTime<Utc>)>,
  ) -> Result<User, RepositoryError> {
    let (code_hash, expires_at) = code.unzip();

    let row = sqlx::query_as::<_, UserRow>(
      r#"
            UPDATE users
            SET
                password_reset_code_hash = $2,
                password_reset_expires_at = $3,
                updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, username, email, first_name, middle_name, last_name,
                password_hash, password_reset_code_hash, password_reset_expires_at,
                created_at, updated_at
            "#,
    )
    .bind(id)
    .bind(code_hash)
    .bind(expires_at)
    .fetch_optional(&self.pool)
    .await?;

    row.map(Into::into).ok_or_else(|| not_found(id))
  }
}
