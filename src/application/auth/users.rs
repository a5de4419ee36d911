use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::domain::auth::{Email, User, UserChanges, UserRepository, Username};
use crate::domain::board::BoardError;
use crate::domain::shared::{EntityId, Page, Pagination};

/// Public view of a user; never carries the password hash
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserOut {
  pub id: EntityId,
  pub username: String,
  pub email: Option<String>,
  pub first_name: Option<String>,
  pub middle_name: Option<String>,
  pub last_name: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl From<User> for UserOut {
  fn from(user: User) -> Self {
    Self {
      id: user.id,
      username: user.username,
      email: user.email,
      first_name: user.first_name,
      middle_name: user.middle_name,
      last_name: user.last_name,
      created_at: user.created_at,
      updated_at: user.updated_at,
    }
  }
}

/// Profile update; absent fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct UpdateUserCommand {
  pub username: Option<String>,
  pub email: Option<String>,
  pub first_name: Option<String>,
  pub middle_name: Option<String>,
  pub last_name: Option<String>,
}

/// Reads and maintains user accounts
pub struct UserUseCase {
  users: Arc<dyn UserRepository>,
}

impl UserUseCase {
  pub fn new(users: Arc<dyn UserRepository>) -> Self {
    Self { users }
  }

  pub async fn get(&self, id: EntityId) -> Result<UserOut, BoardError> {
    Ok(self.users.get(id).await?.into())
  }

  pub async fn list(&self, pagination: Pagination) -> Result<Page<UserOut>, BoardError> {
    let users = self.users.list_all().await?;
    Ok(Page::paginate(users, pagination).map(UserOut::from))
  }

  /// # Errors
  /// `Validation` for a malformed username or email, `Conflict` when the
  /// new username is taken, `NotFound` for an unknown id
  pub async fn update(
    &self,
    id: EntityId,
    command: UpdateUserCommand,
  ) -> Result<UserOut, BoardError> {
    let username = command
      .username
      .map(Username::new)
      .transpose()
      .map_err(|e| BoardError::Validation(e.to_string()))?;
    let email = command
      .email
      .map(Email::new)
      .transpose()
      .map_err(|e| BoardError::Validation(e.to_string()))?;

    let changes = UserChanges {
      username: username.map(Username::into_inner),
      email: email.map(Email::into_inner),
      first_name: command.first_name,
      middle_name: command.middle_name,
      last_name: command.last_name,
    };

    let user = self.users.update(id, changes).await?;
    tracing::info!(user_id = user.id, "User updated");

    Ok(user.into())
  }

  /// Removes the user together with their jobs, applications and saved jobs
  pub async fn delete(&self, id: EntityId) -> Result<UserOut, BoardError> {
    let user = self.users.delete(id).await?;
    tracing::info!(user_id = user.id, "User deleted");

    Ok(user.into())
  }
}
