use argon2::password_hash::SaltString;
use argon2::{
  Algorithm, Argon2, Params, Version,
  password_hash::{
    PasswordHash as Argon2PasswordHash, PasswordHasher as Argon2PasswordHasherTrait,
    PasswordVerifier,
  },
};
use async_trait::async_trait;

use crate::domain::auth::errors::{AuthError, HashError};
use crate::domain::auth::ports::PasswordHasher;
use crate::domain::auth::value_objects::{Password, PasswordHash};

/// Argon2id password hasher implementation
///
/// Parameters:
/// - Memory cost: 19 MiB (19456 KiB)
/// - Time cost: 2 iterations
/// - Parallelism: 1 thread
///
/// Hashing runs on the blocking thread pool so a slow hash does not stall
/// the actix worker serving other requests.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
  argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
  pub fn new() -> Result<Self, AuthError> {
    let params = Params::new(19456, 2, 1, Some(32)).map_err(|e| {
      AuthError::Hash(HashError::HashingFailed(format!(
        "Failed to create Argon2 params: {}",
        e
      )))
    })?;

    Ok(Self {
      argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
    })
  }

  async fn run_blocking<T, F>(&self, f: F) -> Result<T, AuthError>
  where
    T: Send + 'static,
    F: FnOnce(Argon2<'static>) -> Result<T, AuthError> + Send + 'static,
  {
    let argon2 = self.argon2.clone();
    tokio::task::spawn_blocking(move || f(argon2))
      .await
      .map_err(|e| AuthError::Hash(HashError::HashingFailed(format!("Hash task failed: {}", e))))?
  }
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
  async fn hash(&self, password: &Password) -> Result<PasswordHash, AuthError> {
    let plain = password.as_str().to_owned();

    let hash = self
      .run_blocking(move |argon2| {
        let salt = SaltString::generate(&mut rand::rngs::OsRng);
        argon2
          .hash_password(plain.as_bytes(), &salt)
          .map(|hash| hash.to_string())
          .map_err(|e| AuthError::Hash(HashError::HashingFailed(e.to_string())))
      })
      .await?;

    PasswordHash::from_hash(hash).map_err(|_| AuthError::Hash(HashError::InvalidFormat))
  }

  /// Returns `Ok(false)` on mismatch and an error only for a malformed hash
  async fn verify(
    &self,
    password: &Password,
    hashed_password: &PasswordHash,
  ) -> Result<bool, AuthError> {
    let plain = password.as_str().to_owned();
    let stored = hashed_password.as_str().to_owned();

    self
      .run_blocking(move |argon2| {
        let parsed_hash =
          Argon2PasswordHash::new(&stored).map_err(|_| AuthError::Hash(HashError::InvalidFormat))?;

        match argon2.verify_password(plain.as_bytes(), &parsed_hash) {
          Ok(_) => Ok(true),
          Err(argon2::password_hash::Error::Password) => Ok(false),
          Err(e) => Err(AuthError::Hash(HashError::VerificationFailed(e.to_string()))),
        }
      })
      .await
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_hash_password() {
    let hasher = Argon2PasswordHasher::new().unwrap();
    let password = Password::new("pw1").unwrap();

    let hash = hasher.hash(&password).await.unwrap();
    assert!(hash.as_str().starts_with("$argon2id$"));
    assert!(!hash.as_str().contains("pw1"));
  }

  #[tokio::test]
  async fn test_verify_correct_and_incorrect_password() {
    let hasher = Argon2PasswordHasher::new().unwrap();
    let password = Password::new("test_password_123").unwrap();
    let wrong_password = Password::new("wrong_password").unwrap();

    let hash = hasher.hash(&password).await.unwrap();

    assert!(hasher.verify(&password, &hash).await.unwrap());
    assert!(!hasher.verify(&wrong_password, &hash).await.unwrap());
  }

  #[tokio::test]
  async fn test_hash_produces_different_salts() {
    let hasher = Argon2PasswordHasher::new().unwrap();
    let password = Password::new("test_password_123").unwrap();

    let hash1 = hasher.hash(&password).await.unwrap();
    let hash2 = hasher.hash(&password).await.unwrap();

    assert_ne!(hash1.as_str(), hash2.as_str());
    assert!(hasher.verify(&password, &hash1).await.unwrap());
    assert!(hasher.verify(&password, &hash2).await.unwrap());
  }

  #[tokio::test]
  async fn test_argon2_parameters() {
    let hasher = Argon2PasswordHasher::new().unwrap();
    let hash = hasher.hash(&Password::new("params").unwrap()).await.unwrap();

    let parsed = Argon2PasswordHash::new(hash.as_str()).unwrap();
    assert_eq!(parsed.version, Some(Version::V0x13 as u32));
    assert_eq!(parsed.params.get_decimal("m"), Some(19456));
    assert_eq!(parsed.params.get_decimal("t"), Some(2));
  }
}
