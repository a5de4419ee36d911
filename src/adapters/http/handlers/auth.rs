use actix_web::{HttpResponse, web};
use std::sync::Arc;
use validator::Validate;

use crate::adapters::http::{
  dtos::{LoginRequest, MessageResponse, RegisterRequest, ResetPasswordRequest, SendOtpRequest},
  errors::ApiError,
  middleware::AuthenticatedUser,
};
use crate::application::auth::{
  LoginUserUseCase, RegisterUserUseCase, RequestPasswordOtpUseCase, ResetPasswordUseCase,
  UserOut,
};

/// Handler for user registration
///
/// POST /user
/// Body: RegisterRequest (JSON)
/// Response: UserOut (JSON) with status 200
pub async fn register_handler(
  request: web::Json<RegisterRequest>,
  use_case: web::Data<Arc<RegisterUserUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let user = use_case.execute(request.into_inner().into()).await?;

  Ok(HttpResponse::Ok().json(user))
}

/// Handler for the token endpoint
///
/// POST /login/access-token
/// Body: LoginRequest (JSON or form encoded)
/// Response: LoginUserResponse (JSON) with status 200
pub async fn login_handler(
  request: web::Either<web::Json<LoginRequest>, web::Form<LoginRequest>>,
  use_case: web::Data<Arc<LoginUserUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let request = match request {
    web::Either::Left(json) => json.into_inner(),
    web::Either::Right(form) => form.into_inner(),
  };
  request.validate()?;

  let response = use_case.execute(request.into()).await?;

  Ok(HttpResponse::Ok().json(response))
}

/// Handler for getting current user information
///
/// GET /me
/// Headers: Authorization: Bearer <token>
pub async fn current_user_handler(user: AuthenticatedUser) -> HttpResponse {
  HttpResponse::Ok().json(UserOut::from(user.into_inner()))
}

/// POST /send-otp
pub async fn send_otp_handler(
  request: web::Json<SendOtpRequest>,
  use_case: web::Data<Arc<RequestPasswordOtpUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  use_case.execute(request.into_inner().email).await?;

  Ok(HttpResponse::Ok().json(MessageResponse::new("OTP sent")))
}

/// POST /reset-password-otp
pub async fn reset_password_handler(
  request: web::Json<ResetPasswordRequest>,
  use_case: web::Data<Arc<ResetPasswordUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  use_case.execute(request.into_inner().into()).await?;

  Ok(HttpResponse::Ok().json(MessageResponse::new("Password reset successful!")))
}
