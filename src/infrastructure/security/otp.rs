use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};

use crate::domain::auth::{AuthError, OtpCode, OtpPolicy, User, UserRepository};

/// Stub policy: every reset uses the same configured code
///
/// The code is accepted whether or not one was requested first.
pub struct FixedOtpPolicy {
  code: String,
}

impl FixedOtpPolicy {
  pub fn new(code: impl Into<String>) -> Self {
    Self { code: code.into() }
  }
}

#[async_trait]
impl OtpPolicy for FixedOtpPolicy {
  async fn issue(&self, _user: &User) -> Result<OtpCode, AuthError> {
    Ok(OtpCode::new(self.code.as_str())?)
  }

  async fn verify(&self, _user: &User, code: &OtpCode) -> Result<bool, AuthError> {
    Ok(code.as_str() == self.code)
  }
}

/// Random single-use codes persisted on the user as a SHA-256 digest
pub struct StoredOtpPolicy {
  users: Arc<dyn UserRepository>,
  ttl: Duration,
}

impl StoredOtpPolicy {
  pub fn new(users: Arc<dyn UserRepository>, ttl: Duration) -> Self {
    Self { users, ttl }
  }
}

#[async_trait]
impl OtpPolicy for StoredOtpPolicy {
  async fn issue(&self, user: &User) -> Result<OtpCode, AuthError> {
    let code = OtpCode::generate();
    let expires_at = Utc::now() + self.ttl;

    self
      .users
      .set_password_reset(user.id, Some((code.hash(), expires_at)))
      .await?;

    Ok(code)
  }

  /// The code is consumed when the password is updated
  async fn verify(&self, user: &User, code: &OtpCode) -> Result<bool, AuthError> {
    Ok(user.is_password_reset_code_valid(&code.hash(), Utc::now()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::auth::NewUser;
  use crate::domain::shared::Repository;
  use crate::infrastructure::persistence::memory::{MemoryStore, MemoryUserRepository};

  async fn setup() -> (Arc<MemoryUserRepository>, User) {
    let users = Arc::new(MemoryUserRepository::new(MemoryStore::new()));
    let user = users
      .create(NewUser {
        username: "otp".to_string(),
        email: Some("otp@example.com".to_string()),
        first_name: None,
        middle_name: None,
        last_name: None,
        password_hash: "hash".to_string(),
      })
      .await
      .unwrap();
    (users, user)
  }

  #[tokio::test]
  async fn test_fixed_policy() {
    let (_, user) = setup().await;
    let policy = FixedOtpPolicy::new("111111");

    assert_eq!(policy.issue(&user).await.unwrap().as_str(), "111111");
    assert!(policy.verify(&user, &OtpCode::new("111111").unwrap()).await.unwrap());
    assert!(!policy.verify(&user, &OtpCode::new("123456").unwrap()).await.unwrap());
  }

  #[tokio::test]
  async fn test_stored_policy_accepts_only_issued_code() {
    let (users, user) = setup().await;
    let policy = StoredOtpPolicy::new(users.clone(), Duration::minutes(10));

    let code = policy.issue(&user).await.unwrap();
    let user = users.get(user.id).await.unwrap();

    assert!(policy.verify(&user, &code).await.unwrap());

    let other = if code.as_str() == "000000" { "000001" } else { "000000" };
    assert!(!policy.verify(&user, &OtpCode::new(other).unwrap()).await.unwrap());
  }

  #[tokio::test]
  async fn test_stored_policy_rejects_expired_code() {
    let (users, user) = setup().await;
    let policy = StoredOtpPolicy::new(users.clone(), Duration::seconds(-1));

    let code = policy.issue(&user).await.unwrap();
    let user = users.get(user.id).await.unwrap();

    assert!(!policy.verify(&user, &code).await.unwrap());
  }

  #[tokio::test]
  async fn test_stored_code_is_single_use() {
    let (users, user) = setup().await;
    let policy = StoredOtpPolicy::new(users.clone(), Duration::minutes(10));

    let code = policy.issue(&user).await.unwrap();
    let user = users.update_password(user.id, "new-hash").await.unwrap();

    assert!(!policy.verify(&user, &code).await.unwrap());
  }
}
