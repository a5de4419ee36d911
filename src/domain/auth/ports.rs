use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::entities::User;
use super::errors::AuthError;
use super::value_objects::{OtpCode, Password, PasswordHash};
use crate::domain::shared::{EntityId, Repository, RepositoryError};

/// Repository trait for user persistence operations
#[async_trait]
pub trait UserRepository: Repository<User> {
  /// Finds a user by their unique username
  async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;

  /// Finds the first user (lowest id) with the given email address
  async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;

  /// Replaces the password hash and clears any outstanding reset code
  async fn update_password(
    &self,
    id: EntityId,
    password_hash: &str,
  ) -> Result<User, RepositoryError>;

  /// Stores (or clears, with `None`) the hashed reset code and its expiry
  async fn set_password_reset(
    &self,
    id: EntityId,
    code: Option<(String, DateTime<Utc>)>,
  ) -> Result<User, RepositoryError>;
}

/// Service trait for password hashing operations
#[async_trait]
pub trait PasswordHasher: Send + Sync {
  /// Hashes a plain text password
  async fn hash(&self, password: &Password) -> Result<PasswordHash, AuthError>;

  /// Verifies a plain text password against a hashed password
  async fn verify(
    &self,
    password: &Password,
    hashed_password: &PasswordHash,
  ) -> Result<bool, AuthError>;
}

/// Signed bearer token with its expiry
#[derive(Debug, Clone)]
pub struct IssuedToken {
  pub token: String,
  pub expires_at: DateTime<Utc>,
}

/// Identity recovered from a valid bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubject {
  pub user_id: EntityId,
  pub username: String,
}

/// Issues and validates bearer tokens
pub trait TokenIssuer: Send + Sync {
  fn issue(&self, user: &User) -> Result<IssuedToken, AuthError>;

  /// Fails with `InvalidToken` or `TokenExpired`
  fn validate(&self, token: &str) -> Result<TokenSubject, AuthError>;
}

/// Strategy for producing and checking password reset codes
#[async_trait]
pub trait OtpPolicy: Send + Sync {
  /// Produces a code for `user`, persisting whatever is needed to verify it
  async fn issue(&self, user: &User) -> Result<OtpCode, AuthError>;

  /// Checks `code` for `user`; returns false for a wrong or expired code
  async fn verify(&self, user: &User, code: &OtpCode) -> Result<bool, AuthError>;
}
