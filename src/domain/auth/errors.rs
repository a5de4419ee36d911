use thiserror::Error;

use super::value_objects::ValueObjectError;
use crate::domain::shared::RepositoryError;

/// Main authentication error type
#[derive(Debug, Error)]
pub enum AuthError {
  #[error("Invalid credentials provided")]
  InvalidCredentials,

  #[error("Username already exists")]
  UsernameTaken,

  #[error("User not found")]
  UserNotFound,

  #[error("Missing bearer token")]
  MissingToken,

  #[error("Invalid token")]
  InvalidToken,

  #[error("Token has expired")]
  TokenExpired,

  #[error("Invalid OTP")]
  InvalidOtp,

  #[error("Token error: {0}")]
  Token(String),

  #[error("Repository error: {0}")]
  Repository(#[from] RepositoryError),

  #[error("Hash error: {0}")]
  Hash(#[from] HashError),

  #[error("Value object error: {0}")]
  ValueObject(#[from] ValueObjectError),
}

impl AuthError {
  /// True for failures that should be reported as 401
  pub fn is_unauthorized(&self) -> bool {
    matches!(
      self,
      AuthError::InvalidCredentials
        | AuthError::MissingToken
        | AuthError::InvalidToken
        | AuthError::TokenExpired
    )
  }
}

/// Password hashing and verification errors
#[derive(Debug, Error)]
pub enum HashError {
  #[error("Failed to hash password: {0}")]
  HashingFailed(String),

  #[error("Failed to verify password: {0}")]
  VerificationFailed(String),

  #[error("Invalid hash format")]
  InvalidFormat,
}

impl From<sqlx::Error> for AuthError {
  fn from(error: sqlx::Error) -> Self {
    AuthError::Repository(RepositoryError::from(error))
  }
}
