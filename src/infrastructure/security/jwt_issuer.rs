use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::auth::{AuthError, IssuedToken, TokenIssuer, TokenSubject, User};

/// Issuer claim stamped on every token
const ISSUER: &str = "jobboard";

/// JWT claims carried by access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
  /// Subject (user id)
  sub: String,
  iss: String,
  username: String,
  /// Issued at (Unix timestamp)
  iat: i64,
  /// Expiration time (Unix timestamp)
  exp: i64,
}

/// HS256 bearer token issuer
pub struct JwtTokenIssuer {
  encoding_key: EncodingKey,
  decoding_key: DecodingKey,
  ttl: Duration,
}

impl JwtTokenIssuer {
  pub fn new(secret: &str, ttl: Duration) -> Self {
    Self {
      encoding_key: EncodingKey::from_secret(secret.as_bytes()),
      decoding_key: DecodingKey::from_secret(secret.as_bytes()),
      ttl,
    }
  }

  fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
    encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
      .map_err(|e| AuthError::Token(format!("JWT encoding error: {}", e)))
  }

  fn issue_at(&self, user: &User, now: DateTime<Utc>) -> Result<IssuedToken, AuthError> {
    let expires_at = now + self.ttl;
    let claims = Claims {
      sub: user.id.to_string(),
      iss: ISSUER.to_string(),
      username: user.username.clone(),
      iat: now.timestamp(),
      exp: expires_at.timestamp(),
    };

    Ok(IssuedToken {
      token: self.sign(&claims)?,
      expires_at,
    })
  }
}

impl TokenIssuer for JwtTokenIssuer {
  fn issue(&self, user: &User) -> Result<IssuedToken, AuthError> {
    self.issue_at(user, Utc::now())
  }

  fn validate(&self, token: &str) -> Result<TokenSubject, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_issuer(&[ISSUER]);
    validation.set_required_spec_claims(&["exp", "sub", "iss"]);

    let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
      match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
      }
    })?;

    let user_id = data
      .claims
      .sub
      .parse()
      .map_err(|_| AuthError::InvalidToken)?;

    Ok(TokenSubject {
      user_id,
      username: data.claims.username,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn user() -> User {
    let now = Utc::now();
    User {
      id: 7,
      username: "alice".to_string(),
      email: None,
      first_name: None,
      middle_name: None,
      last_name: None,
      password_hash: "hash".to_string(),
      password_reset_code_hash: None,
      password_reset_expires_at: None,
      created_at: now,
      updated_at: now,
    }
  }

  #[test]
  fn test_issue_and_validate() {
    let issuer = JwtTokenIssuer::new("secret", Duration::seconds(3600));
    let issued = issuer.issue(&user()).unwrap();

    assert!(issued.expires_at > Utc::now());

    let subject = issuer.validate(&issued.token).unwrap();
    assert_eq!(subject.user_id, 7);
    assert_eq!(subject.username, "alice");
  }

  #[test]
  fn test_wrong_secret_is_invalid() {
    let issued = JwtTokenIssuer::new("secret", Duration::seconds(3600)).issue(&user()).unwrap();
    let other = JwtTokenIssuer::new("other-secret", Duration::seconds(3600));

    assert!(matches!(
      other.validate(&issued.token),
      Err(AuthError::InvalidToken)
    ));
  }

  #[test]
  fn test_expired_token() {
    let issuer = JwtTokenIssuer::new("secret", Duration::seconds(60));
    let issued = issuer
      .issue_at(&user(), Utc::now() - Duration::hours(2))
      .unwrap();

    assert!(matches!(
      issuer.validate(&issued.token),
      Err(AuthError::TokenExpired)
    ));
  }

  #[test]
  fn test_garbage_is_invalid() {
    let issuer = JwtTokenIssuer::new("secret", Duration::seconds(60));
    assert!(matches!(
      issuer.validate("definitely-not-a-jwt"),
      Err(AuthError::InvalidToken)
    ));
  }
}
