use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::domain::auth::{AuthError, AuthService, Password};
use crate::domain::shared::EntityId;

/// Command for logging in a user
#[derive(Debug, Clone)]
pub struct LoginUserCommand {
  pub username: String,
  /// User's password (plain text)
  pub password: String,
}

/// Bearer token handed back after a successful login
#[derive(Debug, Clone, Serialize)]
pub struct LoginUserResponse {
  pub access_token: String,
  /// Always `"bearer"`
  pub token_type: String,
  pub user_id: EntityId,
  pub username: String,
  pub expires_at: DateTime<Utc>,
}

/// Use case for logging in a user
pub struct LoginUserUseCase {
  auth_service: Arc<AuthService>,
}

impl LoginUserUseCase {
  /// Creates a new instance of LoginUserUseCase
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Executes the user login use case
  ///
  /// # Errors
  /// Returns `AuthError::InvalidCredentials` for an unknown username or a
  /// wrong password
  pub async fn execute(&self, command: LoginUserCommand) -> Result<LoginUserResponse, AuthError> {
    // An empty password can never match, so report it like any other mismatch
    let password = Password::new(command.password).map_err(|_| AuthError::InvalidCredentials)?;

    let (user, token) = match self.auth_service.login(&command.username, password).await {
      Ok(result) => result,
      Err(e) => {
        if matches!(e, AuthError::InvalidCredentials) {
          tracing::warn!(username = %command.username, "Failed login attempt");
        }
        return Err(e);
      }
    };

    tracing::info!(user_id = user.id, "User logged in");

    Ok(LoginUserResponse {
      access_token: token.token,
      token_type: "bearer".to_string(),
      user_id: user.id,
      username: user.username,
      expires_at: token.expires_at,
    })
  }
}
