use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use std::sync::Arc;
use validator::Validate;

use super::read_multipart;
use crate::adapters::http::{
  dtos::{CreateJobRequest, UpdateJobRequest},
  errors::ApiError,
  middleware::AuthenticatedUser,
};
use crate::application::board::JobUseCase;
use crate::domain::shared::{EntityId, PaginationParams};

/// GET /job
pub async fn list_jobs_handler(
  _user: AuthenticatedUser,
  query: web::Query<PaginationParams>,
  use_case: web::Data<Arc<JobUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let page = use_case.list(query.into_inner().into()).await?;
  Ok(HttpResponse::Ok().json(page))
}

/// POST /job
///
/// The job is owned by the caller unless `user_id` is given.
pub async fn create_job_handler(
  user: AuthenticatedUser,
  request: web::Json<CreateJobRequest>,
  use_case: web::Data<Arc<JobUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let job = use_case
    .create(request.into_inner().into_draft(user.id()))
    .await?;
  Ok(HttpResponse::Ok().json(job))
}

/// GET /job/{id}
pub async fn get_job_handler(
  _user: AuthenticatedUser,
  path: web::Path<EntityId>,
  use_case: web::Data<Arc<JobUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let job = use_case.get(path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(job))
}

/// PUT /job/{id}
pub async fn update_job_handler(
  _user: AuthenticatedUser,
  path: web::Path<EntityId>,
  request: web::Json<UpdateJobRequest>,
  use_case: web::Data<Arc<JobUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let job = use_case
    .update(path.into_inner(), request.into_inner().into())
    .await?;
  Ok(HttpResponse::Ok().json(job))
}

/// DELETE /job/{id}
pub async fn delete_job_handler(
  _user: AuthenticatedUser,
  path: web::Path<EntityId>,
  use_case: web::Data<Arc<JobUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let job = use_case.delete(path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(job))
}

/// GET /jobs/user/{user_id}
pub async fn jobs_by_user_handler(
  _user: AuthenticatedUser,
  path: web::Path<EntityId>,
  query: web::Query<PaginationParams>,
  use_case: web::Data<Arc<JobUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let page = use_case
    .list_by_user(path.into_inner(), query.into_inner().into())
    .await?;
  Ok(HttpResponse::Ok().json(page))
}

/// GET /jobs/applied/{user_id}
pub async fn applied_jobs_handler(
  _user: AuthenticatedUser,
  path: web::Path<EntityId>,
  query: web::Query<PaginationParams>,
  use_case: web::Data<Arc<JobUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let page = use_case
    .list_applied(path.into_inner(), query.into_inner().into())
    .await?;
  Ok(HttpResponse::Ok().json(page))
}

/// POST /upload-logo
///
/// Multipart body with a single `file` part. Responds with `{filename}`.
pub async fn upload_logo_handler(
  _user: AuthenticatedUser,
  payload: Multipart,
  use_case: web::Data<Arc<JobUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let file = read_multipart(payload).await?.require_file()?;

  let logo = use_case.upload_logo(&file.file_name, &file.bytes).await?;
  Ok(HttpResponse::Ok().json(logo))
}
