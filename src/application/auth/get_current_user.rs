use std::sync::Arc;

use crate::domain::auth::{AuthError, AuthService, User};

/// Use case for resolving the user behind a bearer token
pub struct GetCurrentUserUseCase {
  auth_service: Arc<AuthService>,
}

impl GetCurrentUserUseCase {
  /// Creates a new instance of GetCurrentUserUseCase
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Executes the get current user use case
  ///
  /// # Errors
  /// Returns `AuthError::InvalidToken` or `AuthError::TokenExpired` when the
  /// token is rejected or its user no longer exists
  pub async fn execute(&self, token: &str) -> Result<User, AuthError> {
    self.auth_service.authenticate(token).await
  }
}
