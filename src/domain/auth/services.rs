use std::sync::Arc;

use super::entities::{NewUser, User};
use super::errors::AuthError;
use super::ports::{IssuedToken, OtpPolicy, PasswordHasher, TokenIssuer, UserRepository};
use super::value_objects::{Email, OtpCode, Password, PasswordHash, Username};
use crate::domain::shared::RepositoryError;

/// Profile fields accepted at registration
#[derive(Debug, Clone, Default)]
pub struct Profile {
  pub email: Option<String>,
  pub first_name: Option<String>,
  pub middle_name: Option<String>,
  pub last_name: Option<String>,
}

/// Authentication service implementing core business logic
pub struct AuthService {
  user_repo: Arc<dyn UserRepository>,
  password_hasher: Arc<dyn PasswordHasher>,
  token_issuer: Arc<dyn TokenIssuer>,
  otp_policy: Arc<dyn OtpPolicy>,
}

impl AuthService {
  pub fn new(
    user_repo: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    token_issuer: Arc<dyn TokenIssuer>,
    otp_policy: Arc<dyn OtpPolicy>,
  ) -> Self {
    Self {
      user_repo,
      password_hasher,
      token_issuer,
      otp_policy,
    }
  }

  /// Registers a new user
  ///
  /// # Errors
  /// Returns `AuthError::UsernameTaken` if the username is already registered
  pub async fn register(
    &self,
    username: Username,
    password: Password,
    profile: Profile,
  ) -> Result<User, AuthError> {
    if self
      .user_repo
      .find_by_username(username.as_str())
      .await?
      .is_some()
    {
      return Err(AuthError::UsernameTaken);
    }

    let password_hash = self.password_hasher.hash(&password).await?;

    let draft = NewUser {
      username: username.into_inner(),
      email: profile.email,
      first_name: profile.first_name,
      middle_name: profile.middle_name,
      last_name: profile.last_name,
      password_hash: password_hash.into_inner(),
    };

    // A concurrent registration can still win the race on the unique index
    match self.user_repo.create(draft).await {
      Ok(user) => Ok(user),
      Err(RepositoryError::DuplicateKey(_)) => Err(AuthError::UsernameTaken),
      Err(e) => Err(e.into()),
    }
  }

  /// Verifies credentials and issues a bearer token
  ///
  /// Unknown usernames and wrong passwords both yield `InvalidCredentials`.
  pub async fn login(
    &self,
    username: &str,
    password: Password,
  ) -> Result<(User, IssuedToken), AuthError> {
    let user = self
      .user_repo
      .find_by_username(username.trim())
      .await?
      .ok_or(AuthError::InvalidCredentials)?;

    let password_hash = PasswordHash::from_hash(&user.password_hash)?;

    if !self.password_hasher.verify(&password, &password_hash).await? {
      return Err(AuthError::InvalidCredentials);
    }

    let token = self.token_issuer.issue(&user)?;

    Ok((user, token))
  }

  /// Validates a bearer token and returns the user it belongs to
  ///
  /// A token whose user has since been deleted is rejected as invalid.
  pub async fn authenticate(&self, token: &str) -> Result<User, AuthError> {
    let subject = self.token_issuer.validate(token)?;

    match self.user_repo.get(subject.user_id).await {
      Ok(user) => Ok(user),
      Err(RepositoryError::NotFound { .. }) => Err(AuthError::InvalidToken),
      Err(e) => Err(e.into()),
    }
  }

  /// Issues a password reset code for the user owning `email` and delivers it
  ///
  /// Delivery is a log line; no mail transport is wired in.
  pub async fn request_password_otp(&self, email: &Email) -> Result<User, AuthError> {
    let user = self
      .user_repo
      .find_by_email(email.as_str())
      .await?
      .ok_or(AuthError::UserNotFound)?;

    let code = self.otp_policy.issue(&user).await?;

    tracing::info!(
      user_id = user.id,
      name = %user.display_name(),
      email = %email,
      otp = code.as_str(),
      "Password reset code issued"
    );

    Ok(user)
  }

  /// Replaces the password of the user owning `email` if `code` checks out
  pub async fn reset_password_with_otp(
    &self,
    email: &Email,
    code: &OtpCode,
    new_password: Password,
  ) -> Result<User, AuthError> {
    let user = self
      .user_repo
      .find_by_email(email.as_str())
      .await?
      .ok_or(AuthError::UserNotFound)?;

    if !self.otp_policy.verify(&user, code).await? {
      tracing::warn!(user_id = user.id, "Rejected password reset with invalid code");
      return Err(AuthError::InvalidOtp);
    }

    let password_hash = self.password_hasher.hash(&new_password).await?;
    let user = self
      .user_repo
      .update_password(user.id, password_hash.as_str())
      .await?;

    tracing::info!(user_id = user.id, "Password reset");

    Ok(user)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::shared::Repository;
  use chrono::Duration;
  use crate::infrastructure::persistence::memory::{MemoryStore, MemoryUserRepository};
  use crate::infrastructure::security::{
    Argon2PasswordHasher, FixedOtpPolicy, JwtTokenIssuer, StoredOtpPolicy,
  };

  fn service_with(otp_policy: Arc<dyn OtpPolicy>, users: Arc<MemoryUserRepository>) -> AuthService {
    AuthService::new(
      users,
      Arc::new(Argon2PasswordHasher::new().unwrap()),
      Arc::new(JwtTokenIssuer::new("test-secret", Duration::hours(1))),
      otp_policy,
    )
  }

  fn service() -> AuthService {
    service_with(
      Arc::new(FixedOtpPolicy::new("111111")),
      Arc::new(MemoryUserRepository::new(MemoryStore::new())),
    )
  }

  async fn register_alice(service: &AuthService) -> User {
    service
      .register(
        Username::new("alice").unwrap(),
        Password::new("pw1").unwrap(),
        Profile {
          email: Some("alice@example.com".to_string()),
          ..Default::default()
        },
      )
      .await
      .unwrap()
  }

  #[tokio::test]
  async fn test_register_hashes_password() {
    let service = service();
    let user = register_alice(&service).await;

    assert_eq!(user.username, "alice");
    assert_ne!(user.password_hash, "pw1");
    assert!(user.password_hash.starts_with("$argon2id$"));
  }

  #[tokio::test]
  async fn test_duplicate_username_rejected() {
    let service = service();
    register_alice(&service).await;

    let result = service
      .register(
        Username::new("alice").unwrap(),
        Password::new("other").unwrap(),
        Profile::default(),
      )
      .await;

    assert!(matches!(result, Err(AuthError::UsernameTaken)));
  }

  #[tokio::test]
  async fn test_login_and_authenticate() {
    let service = service();
    let user = register_alice(&service).await;

    let (logged_in, token) = service
      .login("alice", Password::new("pw1").unwrap())
      .await
      .unwrap();
    assert_eq!(logged_in.id, user.id);

    let resolved = service.authenticate(&token.token).await.unwrap();
    assert_eq!(resolved.id, user.id);
  }

  #[tokio::test]
  async fn test_login_failures_are_invalid_credentials() {
    let service = service();
    register_alice(&service).await;

    let wrong = service.login("alice", Password::new("nope").unwrap()).await;
    assert!(matches!(wrong, Err(AuthError::InvalidCredentials)));

    let unknown = service.login("bob", Password::new("pw1").unwrap()).await;
    assert!(matches!(unknown, Err(AuthError::InvalidCredentials)));
  }

  #[tokio::test]
  async fn test_authenticate_rejects_garbage() {
    let service = service();
    assert!(matches!(
      service.authenticate("not.a.token").await,
      Err(AuthError::InvalidToken)
    ));
  }

  #[tokio::test]
  async fn test_fixed_otp_reset() {
    let service = service();
    register_alice(&service).await;
    let email = Email::new("alice@example.com").unwrap();

    let wrong = service
      .reset_password_with_otp(
        &email,
        &OtpCode::new("222222").unwrap(),
        Password::new("newpw").unwrap(),
      )
      .await;
    assert!(matches!(wrong, Err(AuthError::InvalidOtp)));

    service
      .reset_password_with_otp(
        &email,
        &OtpCode::new("111111").unwrap(),
        Password::new("newpw").unwrap(),
      )
      .await
      .unwrap();

    assert!(matches!(
      service.login("alice", Password::new("pw1").unwrap()).await,
      Err(AuthError::InvalidCredentials)
    ));
    assert!(
      service
        .login("alice", Password::new("newpw").unwrap())
        .await
        .is_ok()
    );
  }

  #[tokio::test]
  async fn test_otp_for_unknown_email() {
    let service = service();
    let email = Email::new("ghost@example.com").unwrap();

    assert!(matches!(
      service.request_password_otp(&email).await,
      Err(AuthError::UserNotFound)
    ));
    assert!(matches!(
      service
        .reset_password_with_otp(
          &email,
          &OtpCode::new("111111").unwrap(),
          Password::new("x").unwrap()
        )
        .await,
      Err(AuthError::UserNotFound)
    ));
  }

  #[tokio::test]
  async fn test_stored_otp_requires_issued_code() {
    let users = Arc::new(MemoryUserRepository::new(MemoryStore::new()));
    let policy = StoredOtpPolicy::new(users.clone(), Duration::minutes(10));
    let service = service_with(Arc::new(policy), users.clone());
    let alice = register_alice(&service).await;
    let email = Email::new("alice@example.com").unwrap();

    // Nothing issued yet
    let early = service
      .reset_password_with_otp(
        &email,
        &OtpCode::new("111111").unwrap(),
        Password::new("newpw").unwrap(),
      )
      .await;
    assert!(matches!(early, Err(AuthError::InvalidOtp)));

    service.request_password_otp(&email).await.unwrap();
    let stored = users.get(alice.id).await.unwrap();
    assert!(stored.password_reset_code_hash.is_some());
    assert!(stored.password_reset_expires_at.is_some());
  }

  /// Stored policy that remembers the last code it handed out
  struct RecordingOtpPolicy {
    inner: StoredOtpPolicy,
    last_issued: std::sync::Mutex<Option<OtpCode>>,
  }

  impl RecordingOtpPolicy {
    fn last_issued(&self) -> OtpCode {
      self.last_issued.lock().unwrap().clone().unwrap()
    }
  }

  #[async_trait::async_trait]
  impl OtpPolicy for RecordingOtpPolicy {
    async fn issue(&self, user: &User) -> Result<OtpCode, AuthError> {
      let code = self.inner.issue(user).await?;
      *self.last_issued.lock().unwrap() = Some(code.clone());
      Ok(code)
    }

    async fn verify(&self, user: &User, code: &OtpCode) -> Result<bool, AuthError> {
      self.inner.verify(user, code).await
    }
  }

  #[tokio::test]
  async fn test_stored_otp_resets_once_then_rejects_replay() {
    let users = Arc::new(MemoryUserRepository::new(MemoryStore::new()));
    let policy = Arc::new(RecordingOtpPolicy {
      inner: StoredOtpPolicy::new(users.clone(), Duration::minutes(10)),
      last_issued: std::sync::Mutex::new(None),
    });
    let service = service_with(policy.clone(), users.clone());
    let alice = register_alice(&service).await;
    let email = Email::new("alice@example.com").unwrap();

    service.request_password_otp(&email).await.unwrap();
    let code = policy.last_issued();

    let reset = service
      .reset_password_with_otp(&email, &code, Password::new("newpw").unwrap())
      .await
      .unwrap();
    assert_eq!(reset.id, alice.id);
    assert!(reset.password_reset_code_hash.is_none());

    let (user, _) = service
      .login("alice", Password::new("newpw").unwrap())
      .await
      .unwrap();
    assert_eq!(user.id, alice.id);

    let replay = service
      .reset_password_with_otp(&email, &code, Password::new("stolen").unwrap())
      .await;
    assert!(matches!(replay, Err(AuthError::InvalidOtp)));

    let old = service
      .login("alice", Password::new("stolen").unwrap())
      .await;
    assert!(matches!(old, Err(AuthError::InvalidCredentials)));
  }
}
