use actix_web::{
  HttpRequest, HttpResponse,
  error::{JsonPayloadError, PathError, QueryPayloadError, ResponseError, UrlencodedError},
  http::{StatusCode, header::ContentType},
};
use actix_multipart::MultipartError;
use std::fmt;

use crate::domain::auth::{AuthError, ValueObjectError};
use crate::domain::board::{BoardError, StorageError};
use crate::domain::shared::RepositoryError;

use super::dtos::ErrorResponse;

/// API error type that maps domain errors to HTTP responses
#[derive(Debug, Clone)]
pub enum ApiError {
  /// Validation error (400 Bad Request)
  Validation(String),

  /// Authentication error (401 Unauthorized)
  Auth(AuthErrorKind),

  /// Missing resource (404 Not Found)
  NotFound(String),

  /// Uniqueness or integrity violation (409 Conflict)
  Conflict(String),

  /// Internal server error (500 Internal Server Error)
  Internal(String),
}

/// Authentication error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
  /// Unknown username or wrong password
  InvalidCredentials,

  /// No bearer token on a protected route
  MissingToken,

  /// Malformed, forged or orphaned token
  InvalidToken,

  TokenExpired,
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::Validation(msg) => write!(f, "Validation error: {}", msg),
      ApiError::Auth(kind) => write!(f, "Authentication error: {:?}", kind),
      ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
      ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
      ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
    }
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match self {
      ApiError::Validation(_) => StatusCode::BAD_REQUEST,
      ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Conflict(_) => StatusCode::CONFLICT,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    let (error_type, detail) = match self {
      ApiError::Validation(msg) => ("validation_error", msg.clone()),
      ApiError::Auth(kind) => match kind {
        AuthErrorKind::InvalidCredentials => (
          "invalid_credentials",
          "Incorrect username or password".to_string(),
        ),
        AuthErrorKind::MissingToken => ("missing_token", "Not authenticated".to_string()),
        AuthErrorKind::InvalidToken => (
          "invalid_token",
          "Could not validate credentials".to_string(),
        ),
        AuthErrorKind::TokenExpired => ("token_expired", "Token has expired".to_string()),
      },
      ApiError::NotFound(msg) => ("not_found", msg.clone()),
      ApiError::Conflict(msg) => ("conflict", msg.clone()),
      ApiError::Internal(msg) => {
        // Don't expose internal error details in production
        tracing::error!("Internal error: {}", msg);
        (
          "internal_error",
          "An internal server error occurred".to_string(),
        )
      }
    };

    let error_response = ErrorResponse {
      error: error_type.to_string(),
      status: status.as_u16(),
      detail,
    };

    let mut builder = HttpResponse::build(status);
    if matches!(self, ApiError::Auth(_)) {
      builder.insert_header(("WWW-Authenticate", "Bearer"));
    }

    builder
      .content_type(ContentType::json())
      .json(error_response)
  }
}

fn from_repository(error: RepositoryError) -> ApiError {
  match error {
    RepositoryError::NotFound { entity, .. } => ApiError::NotFound(format!("{entity} not found")),
    RepositoryError::DuplicateKey(_) => ApiError::Conflict("Record already exists".to_string()),
    RepositoryError::ForeignKeyViolation(_) => {
      ApiError::Conflict("Referenced user or job does not exist".to_string())
    }
    other => ApiError::Internal(other.to_string()),
  }
}

/// Convert AuthError to ApiError
impl From<AuthError> for ApiError {
  fn from(error: AuthError) -> Self {
    match error {
      AuthError::InvalidCredentials => ApiError::Auth(AuthErrorKind::InvalidCredentials),
      AuthError::MissingToken => ApiError::Auth(AuthErrorKind::MissingToken),
      AuthError::InvalidToken => ApiError::Auth(AuthErrorKind::InvalidToken),
      AuthError::TokenExpired => ApiError::Auth(AuthErrorKind::TokenExpired),
      AuthError::UsernameTaken => ApiError::Conflict("Username already registered".to_string()),
      AuthError::UserNotFound => ApiError::NotFound("User not found".to_string()),
      AuthError::InvalidOtp => ApiError::Validation("Invalid OTP".to_string()),
      AuthError::ValueObject(err) => ApiError::from(err),
      AuthError::Repository(err) => from_repository(err),
      AuthError::Hash(err) => ApiError::Internal(err.to_string()),
      AuthError::Token(msg) => ApiError::Internal(msg),
    }
  }
}

impl From<ValueObjectError> for ApiError {
  fn from(error: ValueObjectError) -> Self {
    ApiError::Validation(error.to_string())
  }
}

impl From<BoardError> for ApiError {
  fn from(error: BoardError) -> Self {
    match error {
      BoardError::NotFound(entity) => ApiError::NotFound(format!("{entity} not found")),
      BoardError::Conflict(msg) => ApiError::Conflict(msg),
      BoardError::Validation(msg) => ApiError::Validation(msg),
      BoardError::Repository(err) => from_repository(err),
      BoardError::Storage(StorageError::NotFound) => ApiError::NotFound("File not found".to_string()),
      BoardError::Storage(StorageError::InvalidName(_)) => {
        ApiError::Validation("Invalid file name".to_string())
      }
      BoardError::Storage(err) => ApiError::Internal(err.to_string()),
    }
  }
}

impl From<MultipartError> for ApiError {
  fn from(error: MultipartError) -> Self {
    ApiError::Validation(format!("Invalid multipart payload: {}", error))
  }
}

/// Convert validation errors from validator crate
impl From<validator::ValidationErrors> for ApiError {
  fn from(errors: validator::ValidationErrors) -> Self {
    let mut messages: Vec<String> = errors
      .field_errors()
      .iter()
      .flat_map(|(field, errors)| {
        errors
          .iter()
          .map(|error| {
            error
              .message
              .as_ref()
              .map(|m| m.to_string())
              .unwrap_or_else(|| format!("Invalid field: {}", field))
          })
          .collect::<Vec<_>>()
      })
      .collect();
    messages.sort();

    ApiError::Validation(messages.join(", "))
  }
}

/// Renders malformed JSON bodies through `ApiError`
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
  ApiError::Validation(format!("Invalid JSON body: {}", err)).into()
}

/// Renders malformed form bodies through `ApiError`
pub fn form_error_handler(err: UrlencodedError, _req: &HttpRequest) -> actix_web::Error {
  ApiError::Validation(format!("Invalid form body: {}", err)).into()
}

/// Renders unparsable path segments through `ApiError`
pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
  ApiError::Validation(format!("Invalid path parameter: {}", err)).into()
}

/// Renders unparsable query strings through `ApiError`
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
  ApiError::Validation(format!("Invalid query string: {}", err)).into()
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::body::to_bytes;

  #[test]
  fn test_api_error_status_codes() {
    assert_eq!(
      ApiError::Validation("test".to_string()).status_code(),
      StatusCode::BAD_REQUEST
    );
    assert_eq!(
      ApiError::Auth(AuthErrorKind::InvalidCredentials).status_code(),
      StatusCode::UNAUTHORIZED
    );
    assert_eq!(
      ApiError::NotFound("Job not found".to_string()).status_code(),
      StatusCode::NOT_FOUND
    );
    assert_eq!(
      ApiError::Conflict("dup".to_string()).status_code(),
      StatusCode::CONFLICT
    );
    assert_eq!(
      ApiError::Internal("test".to_string()).status_code(),
      StatusCode::INTERNAL_SERVER_ERROR
    );
  }

  #[test]
  fn test_auth_error_conversion() {
    let api_error: ApiError = AuthError::InvalidCredentials.into();
    assert_eq!(api_error.status_code(), StatusCode::UNAUTHORIZED);

    let api_error: ApiError = AuthError::UsernameTaken.into();
    assert_eq!(api_error.status_code(), StatusCode::CONFLICT);

    let api_error: ApiError = AuthError::InvalidOtp.into();
    assert_eq!(api_error.status_code(), StatusCode::BAD_REQUEST);

    let api_error: ApiError = AuthError::ValueObject(ValueObjectError::MalformedOtp).into();
    assert_eq!(api_error.status_code(), StatusCode::BAD_REQUEST);

    let api_error: ApiError = AuthError::UserNotFound.into();
    assert_eq!(api_error.status_code(), StatusCode::NOT_FOUND);
  }

  #[test]
  fn test_board_error_conversion() {
    let api_error: ApiError = BoardError::NotFound("Job".to_string()).into();
    assert!(matches!(&api_error, ApiError::NotFound(msg) if msg == "Job not found"));

    let api_error: ApiError = BoardError::Storage(StorageError::InvalidName("..".into())).into();
    assert_eq!(api_error.status_code(), StatusCode::BAD_REQUEST);

    let api_error: ApiError =
      BoardError::Repository(RepositoryError::ConnectionFailed("down".into())).into();
    assert_eq!(api_error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
  }

  #[actix_web::test]
  async fn test_error_body_shape() {
    let response = ApiError::Conflict("Username already registered".to_string()).error_response();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = to_bytes(response.into_body()).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["error"], "conflict");
    assert_eq!(json["status"], 409);
    assert_eq!(json["detail"], "Username already registered");
  }

  #[actix_web::test]
  async fn test_internal_details_are_hidden() {
    let response = ApiError::Internal("password=hunter2".to_string()).error_response();
    let body = to_bytes(response.into_body()).await.unwrap();

    assert!(!String::from_utf8_lossy(&body).contains("hunter2"));
  }
}
