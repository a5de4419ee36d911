use actix_web::{HttpResponse, web};
use std::sync::Arc;
use validator::Validate;

use crate::adapters::http::{dtos::UpdateUserRequest, errors::ApiError, middleware::AuthenticatedUser};
use crate::application::auth::UserUseCase;
use crate::domain::shared::{EntityId, PaginationParams};

/// GET /user
pub async fn list_users_handler(
  _user: AuthenticatedUser,
  query: web::Query<PaginationParams>,
  use_case: web::Data<Arc<UserUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let page = use_case.list(query.into_inner().into()).await?;
  Ok(HttpResponse::Ok().json(page))
}

/// GET /user/{id}
pub async fn get_user_handler(
  _user: AuthenticatedUser,
  path: web::Path<EntityId>,
  use_case: web::Data<Arc<UserUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let user = use_case.get(path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(user))
}

/// PUT /user/{id}
pub async fn update_user_handler(
  _user: AuthenticatedUser,
  path: web::Path<EntityId>,
  request: web::Json<UpdateUserRequest>,
  use_case: web::Data<Arc<UserUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let user = use_case
    .update(path.into_inner(), request.into_inner().into())
    .await?;
  Ok(HttpResponse::Ok().json(user))
}

/// DELETE /user/{id}
///
/// Cascades to the user's jobs, applications and saved jobs.
pub async fn delete_user_handler(
  _user: AuthenticatedUser,
  path: web::Path<EntityId>,
  use_case: web::Data<Arc<UserUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let user = use_case.delete(path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(user))
}
