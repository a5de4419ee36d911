//! Authentication and account use cases
//!
//! Registration, login, token resolution and the OTP password reset flow
//! go through `AuthService`; profile maintenance talks to the user
//! repository directly.

mod get_current_user;
mod login_user;
mod register_user;
mod request_password_otp;
mod reset_password;
mod users;

pub use get_current_user::GetCurrentUserUseCase;
pub use login_user::{LoginUserCommand, LoginUserResponse, LoginUserUseCase};
pub use register_user::{RegisterUserCommand, RegisterUserUseCase};
pub use request_password_otp::RequestPasswordOtpUseCase;
pub use reset_password::{ResetPasswordCommand, ResetPasswordUseCase};
pub use users::{UpdateUserCommand, UserOut, UserUseCase};

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Duration;
  use std::sync::Arc;

  use crate::domain::auth::{AuthError, AuthService, ValueObjectError};
  use crate::infrastructure::persistence::memory::{MemoryStore, MemoryUserRepository};
  use crate::infrastructure::security::{Argon2PasswordHasher, FixedOtpPolicy, JwtTokenIssuer};

  fn auth_service() -> Arc<AuthService> {
    Arc::new(AuthService::new(
      Arc::new(MemoryUserRepository::new(MemoryStore::new())),
      Arc::new(Argon2PasswordHasher::new().unwrap()),
      Arc::new(JwtTokenIssuer::new("secret", Duration::hours(1))),
      Arc::new(FixedOtpPolicy::new("111111")),
    ))
  }

  fn register_command(username: &str) -> RegisterUserCommand {
    RegisterUserCommand {
      username: username.to_string(),
      password: "pw1".to_string(),
      email: Some("alice@example.com".to_string()),
      first_name: Some("Alice".to_string()),
      middle_name: None,
      last_name: None,
    }
  }

  #[tokio::test]
  async fn test_register_login_and_resolve() {
    let service = auth_service();
    let register = RegisterUserUseCase::new(service.clone());
    let login = LoginUserUseCase::new(service.clone());
    let current = GetCurrentUserUseCase::new(service);

    let user = register.execute(register_command("alice")).await.unwrap();
    assert_eq!(user.username, "alice");
    assert_eq!(user.first_name.as_deref(), Some("Alice"));

    let token = login
      .execute(LoginUserCommand {
        username: "alice".to_string(),
        password: "pw1".to_string(),
      })
      .await
      .unwrap();
    assert_eq!(token.token_type, "bearer");
    assert_eq!(token.user_id, user.id);

    let resolved = current.execute(&token.access_token).await.unwrap();
    assert_eq!(resolved.id, user.id);
  }

  #[tokio::test]
  async fn test_register_rejects_bad_input() {
    let register = RegisterUserUseCase::new(auth_service());

    let mut command = register_command("alice");
    command.email = Some("nope".to_string());
    assert!(matches!(
      register.execute(command).await,
      Err(AuthError::ValueObject(ValueObjectError::InvalidEmail(_)))
    ));

    let mut command = register_command("alice");
    command.password = String::new();
    assert!(matches!(
      register.execute(command).await,
      Err(AuthError::ValueObject(ValueObjectError::PasswordEmpty))
    ));
  }

  #[tokio::test]
  async fn test_empty_password_login_is_invalid_credentials() {
    let service = auth_service();
    RegisterUserUseCase::new(service.clone())
      .execute(register_command("alice"))
      .await
      .unwrap();

    let result = LoginUserUseCase::new(service)
      .execute(LoginUserCommand {
        username: "alice".to_string(),
        password: String::new(),
      })
      .await;
    assert!(matches!(result, Err(AuthError::InvalidCredentials)));
  }

  #[tokio::test]
  async fn test_reset_password_flow() {
    let service = auth_service();
    RegisterUserUseCase::new(service.clone())
      .execute(register_command("alice"))
      .await
      .unwrap();

    RequestPasswordOtpUseCase::new(service.clone())
      .execute("alice@example.com".to_string())
      .await
      .unwrap();

    let reset = ResetPasswordUseCase::new(service.clone());
    let malformed = reset
      .execute(ResetPasswordCommand {
        email: "alice@example.com".to_string(),
        otp: "12".to_string(),
        new_password: "newpw".to_string(),
      })
      .await;
    assert!(matches!(
      malformed,
      Err(AuthError::ValueObject(ValueObjectError::MalformedOtp))
    ));

    reset
      .execute(ResetPasswordCommand {
        email: "alice@example.com".to_string(),
        otp: "111111".to_string(),
        new_password: "newpw".to_string(),
      })
      .await
      .unwrap();

    let login = LoginUserUseCase::new(service);
    assert!(
      login
        .execute(LoginUserCommand {
          username: "alice".to_string(),
          password: "newpw".to_string(),
        })
        .await
        .is_ok()
    );
  }
}
