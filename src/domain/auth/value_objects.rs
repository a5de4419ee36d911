use argon2::PasswordHash as Argon2PasswordHash;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use validator::ValidateEmail;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ValueObjectError {
  #[error("Invalid email format: {0}")]
  InvalidEmail(String),

  #[error("Username must be between 1 and 150 characters without whitespace")]
  InvalidUsername,

  #[error("Password must not be empty")]
  PasswordEmpty,

  #[error("Password is too long (maximum 128 characters)")]
  PasswordTooLong,

  #[error("Invalid password hash format")]
  InvalidPasswordHash,

  #[error("OTP must be exactly 6 digits")]
  MalformedOtp,
}

// ============================================================================
// Username Value Object
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
  const MAX_LENGTH: usize = 150;

  /// Creates a new Username, trimming surrounding whitespace
  pub fn new(username: impl Into<String>) -> Result<Self, ValueObjectError> {
    let username = username.into().trim().to_string();

    if username.is_empty()
      || username.chars().count() > Self::MAX_LENGTH
      || username.chars().any(char::is_whitespace)
    {
      return Err(ValueObjectError::InvalidUsername);
    }

    Ok(Self(username))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for Username {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// ============================================================================
// Email Value Object
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
  /// Creates a new Email after validation
  pub fn new(email: impl Into<String>) -> Result<Self, ValueObjectError> {
    let email = email.into().trim().to_string();

    if !email.validate_email() {
      return Err(ValueObjectError::InvalidEmail(email));
    }

    Ok(Self(email))
  }

  /// Returns the email as a string slice
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Consumes self and returns the inner String
  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for Email {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl AsRef<str> for Email {
  fn as_ref(&self) -> &str {
    &self.0
  }
}

// ============================================================================
// Password Value Object (Plain Password - Never Stored)
// ============================================================================

#[derive(Clone)]
pub struct Password(String);

impl Password {
  const MAX_LENGTH: usize = 128;

  /// Creates a new Password after validation
  pub fn new(password: impl Into<String>) -> Result<Self, ValueObjectError> {
    let password = password.into();

    if password.is_empty() {
      return Err(ValueObjectError::PasswordEmpty);
    }

    if password.len() > Self::MAX_LENGTH {
      return Err(ValueObjectError::PasswordTooLong);
    }

    Ok(Self(password))
  }

  /// Returns the password as a string slice (use with caution)
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

// Implement Debug without exposing the password
impl fmt::Debug for Password {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("Password(***)")
  }
}

// ============================================================================
// PasswordHash Value Object (Argon2id Hash)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
  /// Creates a new PasswordHash from an existing hash string
  pub fn from_hash(hash: impl Into<String>) -> Result<Self, ValueObjectError> {
    let hash = hash.into();

    Argon2PasswordHash::new(&hash).map_err(|_| ValueObjectError::InvalidPasswordHash)?;

    Ok(Self(hash))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

// ============================================================================
// OtpCode Value Object
// ============================================================================

/// Six digit one-time password used for password resets
#[derive(Clone, PartialEq, Eq)]
pub struct OtpCode(String);

impl OtpCode {
  pub const LENGTH: usize = 6;

  pub fn new(code: impl Into<String>) -> Result<Self, ValueObjectError> {
    let code = code.into().trim().to_string();

    if code.len() != Self::LENGTH || !code.chars().all(|c| c.is_ascii_digit()) {
      return Err(ValueObjectError::MalformedOtp);
    }

    Ok(Self(code))
  }

  /// Generates a uniformly random code
  pub fn generate() -> Self {
    use rand::Rng;

    let value: u32 = rand::rngs::OsRng.gen_range(0..1_000_000);
    Self(format!("{value:06}"))
  }

  /// Hex encoded SHA-256 of the code, as persisted on the user
  pub fn hash(&self) -> String {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(self.0.as_bytes());
    hex::encode(hasher.finalize())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Debug for OtpCode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("OtpCode(***)")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_username_validation() {
    assert_eq!(Username::new("  alice ").unwrap().as_str(), "alice");
    assert!(Username::new("").is_err());
    assert!(Username::new("   ").is_err());
    assert!(Username::new("al ice").is_err());
    assert!(Username::new("a".repeat(151)).is_err());
  }

  #[test]
  fn test_email_validation() {
    assert!(Email::new("test@example.com").is_ok());
    assert!(Email::new("user.name@domain.co.uk").is_ok());

    assert!(Email::new("invalid").is_err());
    assert!(Email::new("@example.com").is_err());
    assert!(Email::new("test@").is_err());
  }

  #[test]
  fn test_password_validation() {
    // Short passwords are accepted
    assert!(Password::new("pw1").is_ok());

    assert!(matches!(
      Password::new(""),
      Err(ValueObjectError::PasswordEmpty)
    ));

    let long_password = "a".repeat(129);
    assert!(matches!(
      Password::new(long_password),
      Err(ValueObjectError::PasswordTooLong)
    ));
  }

  #[test]
  fn test_password_hash_rejects_garbage() {
    assert!(PasswordHash::from_hash("not-a-hash").is_err());
  }

  #[test]
  fn test_otp_validation() {
    assert!(OtpCode::new("111111").is_ok());
    assert!(OtpCode::new("12345").is_err());
    assert!(OtpCode::new("1234567").is_err());
    assert!(OtpCode::new("12a456").is_err());
  }

  #[test]
  fn test_generated_otp_is_six_digits() {
    for _ in 0..20 {
      let code = OtpCode::generate();
      assert!(OtpCode::new(code.as_str()).is_ok());
    }
  }

  #[test]
  fn test_otp_hash_is_stable() {
    let code = OtpCode::new("123456").unwrap();
    assert_eq!(code.hash(), OtpCode::new("123456").unwrap().hash());
    assert_eq!(code.hash().len(), 64);
    assert_ne!(code.hash(), OtpCode::new("654321").unwrap().hash());
  }
}
