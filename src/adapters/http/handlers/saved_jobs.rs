use actix_web::{HttpResponse, web};
use std::sync::Arc;

use crate::adapters::http::{
  dtos::{CreateSavedJobRequest, UpdateSavedJobRequest, UserJobQuery},
  errors::ApiError,
  middleware::AuthenticatedUser,
};
use crate::application::board::SavedJobUseCase;
use crate::domain::board::NewSavedJob;
use crate::domain::shared::{EntityId, PaginationParams};

/// GET /save-job
pub async fn list_saved_jobs_handler(
  _user: AuthenticatedUser,
  query: web::Query<PaginationParams>,
  use_case: web::Data<Arc<SavedJobUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let page = use_case.list(query.into_inner().into()).await?;
  Ok(HttpResponse::Ok().json(page))
}

/// POST /save-job
pub async fn save_job_handler(
  user: AuthenticatedUser,
  request: web::Json<CreateSavedJobRequest>,
  use_case: web::Data<Arc<SavedJobUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let request = request.into_inner();

  let saved = use_case
    .create(NewSavedJob {
      user_id: request.user_id.unwrap_or(user.id()),
      job_id: request.job_id,
    })
    .await?;
  Ok(HttpResponse::Ok().json(saved))
}

/// GET /save-job/{id}
pub async fn get_saved_job_handler(
  _user: AuthenticatedUser,
  path: web::Path<EntityId>,
  use_case: web::Data<Arc<SavedJobUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let saved = use_case.get(path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(saved))
}

/// PUT /save-job/{id}
pub async fn update_saved_job_handler(
  _user: AuthenticatedUser,
  path: web::Path<EntityId>,
  request: web::Json<UpdateSavedJobRequest>,
  use_case: web::Data<Arc<SavedJobUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let saved = use_case
    .update(path.into_inner(), request.into_inner().into())
    .await?;
  Ok(HttpResponse::Ok().json(saved))
}

/// DELETE /save-job/{id}
pub async fn delete_saved_job_handler(
  _user: AuthenticatedUser,
  path: web::Path<EntityId>,
  use_case: web::Data<Arc<SavedJobUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let saved = use_case.delete(path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(saved))
}

/// GET /save-job/user-job?user_id=..&job_id=..
pub async fn saved_job_by_user_and_job_handler(
  _user: AuthenticatedUser,
  query: web::Query<UserJobQuery>,
  use_case: web::Data<Arc<SavedJobUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let saved = use_case
    .find_by_user_and_job(query.user_id, query.job_id)
    .await?;
  Ok(HttpResponse::Ok().json(saved))
}

/// GET /saved-jobs/{user_id}
///
/// Each entry carries the title, location, description and salary of its job.
pub async fn saved_jobs_by_user_handler(
  _user: AuthenticatedUser,
  path: web::Path<EntityId>,
  query: web::Query<PaginationParams>,
  use_case: web::Data<Arc<SavedJobUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let page = use_case
    .list_by_user(path.into_inner(), query.into_inner().into())
    .await?;
  Ok(HttpResponse::Ok().json(page))
}
