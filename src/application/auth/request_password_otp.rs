use std::sync::Arc;

use crate::domain::auth::{AuthError, AuthService, Email};

/// Sends a password reset code to the owner of an email address
pub struct RequestPasswordOtpUseCase {
  auth_service: Arc<AuthService>,
}

impl RequestPasswordOtpUseCase {
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// # Errors
  /// `AuthError::UserNotFound` when no user has the address
  pub async fn execute(&self, email: String) -> Result<(), AuthError> {
    let email = Email::new(email)?;
    self.auth_service.request_password_otp(&email).await?;
    Ok(())
  }
}
