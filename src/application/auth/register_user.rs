use std::sync::Arc;

use super::users::UserOut;
use crate::domain::auth::{AuthError, AuthService, Email, Password, Profile, Username};

/// Command for registering a new user
#[derive(Debug, Clone)]
pub struct RegisterUserCommand {
  /// Login name, unique across the board
  pub username: String,
  /// Plain text password, hashed before it is stored
  pub password: String,
  pub email: Option<String>,
  pub first_name: Option<String>,
  pub middle_name: Option<String>,
  pub last_name: Option<String>,
}

/// Use case for registering a new user
pub struct RegisterUserUseCase {
  auth_service: Arc<AuthService>,
}

impl RegisterUserUseCase {
  /// Creates a new instance of RegisterUserUseCase
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Executes the user registration use case
  ///
  /// # Errors
  /// Returns `AuthError::UsernameTaken` when the username exists and
  /// `AuthError::ValueObject` for a malformed username, password or email
  pub async fn execute(&self, command: RegisterUserCommand) -> Result<UserOut, AuthError> {
    let username = Username::new(command.username)?;
    let password = Password::new(command.password)?;
    let email = command.email.map(Email::new).transpose()?;

    let profile = Profile {
      email: email.map(Email::into_inner),
      first_name: command.first_name,
      middle_name: command.middle_name,
      last_name: command.last_name,
    };

    let user = self
      .auth_service
      .register(username, password, profile)
      .await?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    Ok(user.into())
  }
}
