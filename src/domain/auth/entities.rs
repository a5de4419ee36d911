use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::shared::{Entity, EntityId};

/// User entity representing an account on the board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  /// Unique identifier for the user
  pub id: EntityId,
  /// Login name (unique)
  pub username: String,
  /// Contact email, not required to be unique
  pub email: Option<String>,
  pub first_name: Option<String>,
  pub middle_name: Option<String>,
  pub last_name: Option<String>,
  /// Hashed password using Argon2
  pub password_hash: String,
  /// SHA-256 of the outstanding password reset code
  pub password_reset_code_hash: Option<String>,
  /// Expiration time for the password reset code
  pub password_reset_expires_at: Option<DateTime<Utc>>,
  /// Timestamp when the user was created
  pub created_at: DateTime<Utc>,
  /// Timestamp when the user was last updated
  pub updated_at: DateTime<Utc>,
}

impl User {
  /// Checks if the stored reset code matches and has not expired
  pub fn is_password_reset_code_valid(&self, code_hash: &str, now: DateTime<Utc>) -> bool {
    match (
      &self.password_reset_code_hash,
      &self.password_reset_expires_at,
    ) {
      (Some(stored), Some(expires_at)) => stored == code_hash && *expires_at > now,
      _ => false,
    }
  }

  /// Builds a full name from whichever name parts are present
  pub fn display_name(&self) -> String {
    let parts: Vec<&str> = [&self.first_name, &self.middle_name, &self.last_name]
      .into_iter()
      .filter_map(|part| part.as_deref())
      .filter(|part| !part.is_empty())
      .collect();

    if parts.is_empty() {
      self.username.clone()
    } else {
      parts.join(" ")
    }
  }
}

impl Entity for User {
  type Draft = NewUser;
  type Changes = UserChanges;

  const NAME: &'static str = "User";

  fn id(&self) -> EntityId {
    self.id
  }
}

/// Data required to insert a user; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
  pub username: String,
  pub email: Option<String>,
  pub first_name: Option<String>,
  pub middle_name: Option<String>,
  pub last_name: Option<String>,
  pub password_hash: String,
}

/// Partial update of a user profile
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
  pub username: Option<String>,
  pub email: Option<String>,
  pub first_name: Option<String>,
  pub middle_name: Option<String>,
  pub last_name: Option<String>,
}

impl UserChanges {
  /// Overwrites the fields of `user` that are set in this change set
  pub fn apply_to(self, user: &mut User, now: DateTime<Utc>) {
    if let Some(username) = self.username {
      user.username = username;
    }
    if let Some(email) = self.email {
      user.email = Some(email);
    }
    if let Some(first_name) = self.first_name {
      user.first_name = Some(first_name);
    }
    if let Some(middle_name) = self.middle_name {
      user.middle_name = Some(middle_name);
    }
    if let Some(last_name) = self.last_name {
      user.last_name = Some(last_name);
    }
    user.updated_at = now;
  }
}
