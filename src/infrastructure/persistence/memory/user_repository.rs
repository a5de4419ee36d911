use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::MemoryStore;
use crate::domain::auth::{NewUser, User, UserChanges, UserRepository};
use crate::domain::shared::{Entity, EntityId, Repository, RepositoryError};

pub struct MemoryUserRepository {
  store: MemoryStore,
}

impl MemoryUserRepository {
  pub fn new(store: MemoryStore) -> Self {
    Self { store }
  }
}

fn duplicate_username(username: &str) -> RepositoryError {
  RepositoryError::DuplicateKey(format!("username '{username}' already exists"))
}

#[async_trait]
impl Repository<User> for MemoryUserRepository {
  async fn get(&self, id: EntityId) -> Result<User, RepositoryError> {
    let tables = self.store.tables().read().await;
    tables
      .users
      .get(&id)
      .cloned()
      .ok_or_else(|| RepositoryError::not_found(User::NAME, id))
  }

  async fn list_all(&self) -> Result<Vec<User>, RepositoryError> {
    let tables = self.store.tables().read().await;
    Ok(tables.users.values().cloned().collect())
  }

  async fn create(&self, draft: NewUser) -> Result<User, RepositoryError> {
    let mut tables = self.store.tables().write().await;

    if tables.users.values().any(|u| u.username == draft.username) {
      return Err(duplicate_username(&draft.username));
    }

    let now = Utc::now();
    let user = User {
      id: tables.user_ids.next_value(),
      username: draft.username,
      email: draft.email,
      first_name: draft.first_name,
      middle_name: draft.middle_name,
      last_name: draft.last_name,
      password_hash: draft.password_hash,
      password_reset_code_hash: None,
      password_reset_expires_at: None,
      created_at: now,
      updated_at: now,
    };
    tables.users.insert(user.id, user.clone());

    Ok(user)
  }

  async fn update(&self, id: EntityId, changes: UserChanges) -> Result<User, RepositoryError> {
    let mut tables = self.store.tables().write().await;

    if let Some(username) = &changes.username {
      if tables
        .users
        .values()
        .any(|u| u.id != id && &u.username == username)
      {
        return Err(duplicate_username(username));
      }
    }

    let user = tables
      .users
      .get_mut(&id)
      .ok_or_else(|| RepositoryError::not_found(User::NAME, id))?;
    changes.apply_to(user, Utc::now());

    Ok(user.clone())
  }

  async fn delete(&self, id: EntityId) -> Result<User, RepositoryError> {
    let mut tables = self.store.tables().write().await;
    tables
      .cascade_user(id)
      .ok_or_else(|| RepositoryError::not_found(User::NAME, id))
  }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
  async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
    let tables = self.store.tables().read().await;
    Ok(tables.users.values().find(|u| u.username == username).cloned())
  }

  async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
    let tables = self.store.tables().read().await;
    Ok(
      tables
        .users
        .values()
        .find(|u| u.email.as_deref() == Some(email))
        .cloned(),
    )
  }

  async fn update_password(
    &self,
    id: EntityId,
    password_hash: &str,
  ) -> Result<User, RepositoryError> {
    let mut tables = self.store.tables().write().await;
    let user = tables
      .users
      .get_mut(&id)
      .ok_or_else(|| RepositoryError::not_found(User::NAME, id))?;

    user.password_hash = password_hash.to_string();
    user.password_reset_code_hash = None;
    user.password_reset_expires_at = None;
    user.updated_at = Utc::now();

    Ok(user.clone())
  }

  async fn set_password_reset(
    &self,
    id: EntityId,
    code: Option<(String, DateTime<Utc>)>,
  ) -> Result<User, RepositoryError> {
    let mut tables = self.store.tables().write().await;
    let user = tables
      .users
      .get_mut(&id)
      .ok_or_else(|| RepositoryError::not_found(User::NAME, id))?;

    let (code_hash, expires_at) = code.unzip();
    user.password_reset_code_hash = code_hash;
    user.password_reset_expires_at = expires_at;
    user.updated_at = Utc::now();

    Ok(user.clone())
  }
}
