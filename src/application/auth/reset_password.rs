use std::sync::Arc;

use crate::domain::auth::{AuthError, AuthService, Email, OtpCode, Password};

#[derive(Debug, Clone)]
pub struct ResetPasswordCommand {
  pub email: String,
  pub otp: String,
  pub new_password: String,
}

/// Replaces a password after checking the reset code
pub struct ResetPasswordUseCase {
  auth_service: Arc<AuthService>,
}

impl ResetPasswordUseCase {
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// # Errors
  /// `ValueObject(MalformedOtp)` when the code is not six digits,
  /// `UserNotFound` for an unknown email, `InvalidOtp` for a wrong code
  pub async fn execute(&self, command: ResetPasswordCommand) -> Result<(), AuthError> {
    let code = OtpCode::new(command.otp)?;
    let email = Email::new(command.email)?;
    let password = Password::new(command.new_password)?;

    self
      .auth_service
      .reset_password_with_otp(&email, &code, password)
      .await?;

    Ok(())
  }
}
