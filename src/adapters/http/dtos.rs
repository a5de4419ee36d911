use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::auth::{LoginUserCommand, RegisterUserCommand, ResetPasswordCommand, UpdateUserCommand};
use crate::application::board::ApplicantDetails;
use crate::domain::board::{ApplicationChanges, JobChanges, NewJob, SavedJobChanges};
use crate::domain::shared::EntityId;

/// Request for user registration
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
  #[validate(length(
    min = 1,
    max = 150,
    message = "Username must be between 1 and 150 characters"
  ))]
  pub username: String,

  #[validate(length(min = 1, max = 128, message = "Password must be between 1 and 128 characters"))]
  pub password: String,

  #[validate(
    email(message = "Invalid email format"),
    length(max = 255, message = "Email must be at most 255 characters")
  )]
  pub email: Option<String>,

  #[validate(length(max = 100, message = "First name must be at most 100 characters"))]
  pub first_name: Option<String>,

  #[validate(length(max = 100, message = "Middle name must be at most 100 characters"))]
  pub middle_name: Option<String>,

  #[validate(length(max = 100, message = "Last name must be at most 100 characters"))]
  pub last_name: Option<String>,
}

impl From<RegisterRequest> for RegisterUserCommand {
  fn from(request: RegisterRequest) -> Self {
    Self {
      username: request.username,
      password: request.password,
      email: request.email,
      first_name: request.first_name,
      middle_name: request.middle_name,
      last_name: request.last_name,
    }
  }
}

/// Credentials for the token endpoint, sent as JSON or as a form
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
  #[validate(length(min = 1, message = "Username is required"))]
  pub username: String,

  #[validate(length(min = 1, message = "Password is required"))]
  pub password: String,
}

impl From<LoginRequest> for LoginUserCommand {
  fn from(request: LoginRequest) -> Self {
    Self {
      username: request.username,
      password: request.password,
    }
  }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendOtpRequest {
  #[validate(email(message = "Invalid email format"))]
  pub email: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResetPasswordRequest {
  #[validate(email(message = "Invalid email format"))]
  pub email: String,

  pub otp: String,

  #[validate(length(min = 1, max = 128, message = "Password must be between 1 and 128 characters"))]
  pub new_password: String,
}

impl From<ResetPasswordRequest> for ResetPasswordCommand {
  fn from(request: ResetPasswordRequest) -> Self {
    Self {
      email: request.email,
      otp: request.otp,
      new_password: request.new_password,
    }
  }
}

/// Partial profile update
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
  #[validate(length(
    min = 1,
    max = 150,
    message = "Username must be between 1 and 150 characters"
  ))]
  pub username: Option<String>,

  #[validate(
    email(message = "Invalid email format"),
    length(max = 255, message = "Email must be at most 255 characters")
  )]
  pub email: Option<String>,

  #[validate(length(max = 100, message = "First name must be at most 100 characters"))]
  pub first_name: Option<String>,

  #[validate(length(max = 100, message = "Middle name must be at most 100 characters"))]
  pub middle_name: Option<String>,

  #[validate(length(max = 100, message = "Last name must be at most 100 characters"))]
  pub last_name: Option<String>,
}

impl From<UpdateUserRequest> for UpdateUserCommand {
  fn from(request: UpdateUserRequest) -> Self {
    Self {
      username: request.username,
      email: request.email,
      first_name: request.first_name,
      middle_name: request.middle_name,
      last_name: request.last_name,
    }
  }
}

fn default_true() -> bool {
  true
}

/// New job posting; `user_id` defaults to the caller
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateJobRequest {
  pub user_id: Option<EntityId>,

  #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
  pub title: String,

  #[validate(length(max = 255, message = "Company must be at most 255 characters"))]
  pub company: Option<String>,

  #[validate(length(min = 1, message = "Description is required"))]
  pub description: String,

  #[validate(length(max = 100, message = "Salary must be at most 100 characters"))]
  pub salary: Option<String>,

  #[validate(length(min = 1, max = 255, message = "Location must be between 1 and 255 characters"))]
  pub location: String,

  pub tags: Option<String>,

  #[serde(default = "default_true")]
  pub is_remote: bool,

  #[validate(length(max = 255, message = "Logo must be at most 255 characters"))]
  pub logo: Option<String>,
}

impl CreateJobRequest {
  pub fn into_draft(self, current_user: EntityId) -> NewJob {
    NewJob {
      user_id: self.user_id.unwrap_or(current_user),
      title: self.title,
      company: self.company,
      description: self.description,
      salary: self.salary,
      location: self.location,
      tags: self.tags,
      is_remote: self.is_remote,
      logo: self.logo,
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateJobRequest {
  pub user_id: Option<EntityId>,

  #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
  pub title: Option<String>,

  #[validate(length(max = 255, message = "Company must be at most 255 characters"))]
  pub company: Option<String>,

  #[validate(length(min = 1, message = "Description must not be empty"))]
  pub description: Option<String>,

  #[validate(length(max = 100, message = "Salary must be at most 100 characters"))]
  pub salary: Option<String>,

  #[validate(length(min = 1, max = 255, message = "Location must be between 1 and 255 characters"))]
  pub location: Option<String>,

  pub tags: Option<String>,
  pub is_remote: Option<bool>,
  #[validate(length(max = 255, message = "Logo must be at most 255 characters"))]
  pub logo: Option<String>,
}

impl From<UpdateJobRequest> for JobChanges {
  fn from(request: UpdateJobRequest) -> Self {
    Self {
      user_id: request.user_id,
      title: request.title,
      company: request.company,
      description: request.description,
      salary: request.salary,
      location: request.location,
      tags: request.tags,
      is_remote: request.is_remote,
      logo: request.logo,
    }
  }
}

/// JSON application without an upload; `user_id` defaults to the caller
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateApplicationRequest {
  pub user_id: Option<EntityId>,
  pub job_id: EntityId,

  #[validate(
    email(message = "Invalid email format"),
    length(max = 255, message = "Email must be at most 255 characters")
  )]
  pub email: Option<String>,

  #[validate(length(max = 32, message = "Mobile number is too long"))]
  pub mobile_number: Option<String>,

  #[validate(range(min = 0, message = "Expected salary must not be negative"))]
  pub expected_salary: Option<i64>,

  pub resume: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateApplicationRequest {
  #[validate(
    email(message = "Invalid email format"),
    length(max = 255, message = "Email must be at most 255 characters")
  )]
  pub email: Option<String>,

  #[validate(length(max = 32, message = "Mobile number is too long"))]
  pub mobile_number: Option<String>,

  #[validate(range(min = 0, message = "Expected salary must not be negative"))]
  pub expected_salary: Option<i64>,

  pub resume: Option<String>,
}

impl From<UpdateApplicationRequest> for ApplicationChanges {
  fn from(request: UpdateApplicationRequest) -> Self {
    Self {
      email: request.email,
      mobile_number: request.mobile_number,
      expected_salary: request.expected_salary,
      resume: request.resume,
    }
  }
}

/// JSON carried in the `obj_in` part of a resume upload
///
/// The job comes from the path; any `job_id` in the document is ignored.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ApplicationFormData {
  pub user_id: Option<EntityId>,

  #[validate(
    email(message = "Invalid email format"),
    length(max = 255, message = "Email must be at most 255 characters")
  )]
  pub email: Option<String>,

  #[validate(length(max = 32, message = "Mobile number is too long"))]
  pub mobile_number: Option<String>,

  #[validate(range(min = 0, message = "Expected salary must not be negative"))]
  pub expected_salary: Option<i64>,
}

impl From<ApplicationFormData> for ApplicantDetails {
  fn from(form: ApplicationFormData) -> Self {
    Self {
      email: form.email,
      mobile_number: form.mobile_number,
      expected_salary: form.expected_salary,
    }
  }
}

/// Bookmark request; `user_id` defaults to the caller
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSavedJobRequest {
  pub user_id: Option<EntityId>,
  pub job_id: EntityId,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSavedJobRequest {
  pub user_id: Option<EntityId>,
  pub job_id: Option<EntityId>,
}

impl From<UpdateSavedJobRequest> for SavedJobChanges {
  fn from(request: UpdateSavedJobRequest) -> Self {
    Self {
      user_id: request.user_id,
      job_id: request.job_id,
    }
  }
}

/// `?user_id=..&job_id=..` lookup
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct UserJobQuery {
  pub user_id: EntityId,
  pub job_id: EntityId,
}

/// Standard success response for operations without data
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
  pub message: String,
}

impl MessageResponse {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
    }
  }
}

/// Standard error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
  /// Error type/code
  pub error: String,

  /// HTTP status code
  pub status: u16,

  /// Human-readable error message
  pub detail: String,
}

#[cfg(test)]
mod tests {
  use super::*;
  use validator::Validate;

  #[test]
  fn test_register_request_validation() {
    let request: RegisterRequest =
      serde_json::from_str(r#"{"username": "alice", "password": "pw1"}"#).unwrap();
    assert!(request.validate().is_ok());
    assert!(request.email.is_none());

    let request: RegisterRequest = serde_json::from_str(
      r#"{"username": "alice", "password": "pw1", "email": "not-an-email"}"#,
    )
    .unwrap();
    assert!(request.validate().is_err());

    let request: RegisterRequest =
      serde_json::from_str(r#"{"username": "", "password": "pw1"}"#).unwrap();
    assert!(request.validate().is_err());
  }

  #[test]
  fn test_create_job_defaults() {
    let request: CreateJobRequest = serde_json::from_str(
      r#"{"title": "Dev", "description": "Write code", "location": "Berlin"}"#,
    )
    .unwrap();
    assert!(request.validate().is_ok());

    let draft = request.into_draft(7);
    assert_eq!(draft.user_id, 7);
    assert!(draft.is_remote);
  }

  #[test]
  fn test_explicit_owner_wins() {
    let request: CreateJobRequest = serde_json::from_str(
      r#"{"user_id": 3, "title": "Dev", "description": "d", "location": "l", "is_remote": false}"#,
    )
    .unwrap();

    let draft = request.into_draft(7);
    assert_eq!(draft.user_id, 3);
    assert!(!draft.is_remote);
  }

  #[test]
  fn test_name_longer_than_column_rejected() {
    let long_name = "a".repeat(101);
    let request = RegisterRequest {
      username: "alice".to_string(),
      password: "pw1".to_string(),
      email: None,
      first_name: Some(long_name.clone()),
      middle_name: None,
      last_name: None,
    };
    let errors = request.validate().unwrap_err();
    assert!(errors.field_errors().contains_key("first_name"));

    let update = UpdateUserRequest {
      last_name: Some(long_name),
      ..Default::default()
    };
    assert!(update.validate().is_err());

    let update = UpdateUserRequest {
      first_name: Some("a".repeat(100)),
      ..Default::default()
    };
    assert!(update.validate().is_ok());
  }

  #[test]
  fn test_job_fields_longer_than_column_rejected() {
    let request: CreateJobRequest = serde_json::from_str(&format!(
      r#"{{"title": "Dev", "description": "d", "location": "l", "salary": "{}"}}"#,
      "9".repeat(101)
    ))
    .unwrap();
    let errors = request.validate().unwrap_err();
    assert!(errors.field_errors().contains_key("salary"));

    let update = UpdateJobRequest {
      company: Some("c".repeat(256)),
      ..Default::default()
    };
    assert!(update.validate().is_err());

    let update = UpdateJobRequest {
      logo: Some("l".repeat(256)),
      ..Default::default()
    };
    assert!(update.validate().is_err());
  }

  #[test]
  fn test_negative_salary_rejected() {
    let form: ApplicationFormData =
      serde_json::from_str(r#"{"expected_salary": -1, "job_id": 99}"#).unwrap();
    assert!(form.validate().is_err());
  }
}
