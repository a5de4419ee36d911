use actix_files::NamedFile;
use actix_multipart::Multipart;
use actix_web::{
  HttpResponse,
  http::header::{ContentDisposition, DispositionParam, DispositionType},
  web,
};
use std::sync::Arc;
use validator::Validate;

use super::read_multipart;
use crate::adapters::http::{
  dtos::{ApplicationFormData, CreateApplicationRequest, UpdateApplicationRequest, UserJobQuery},
  errors::ApiError,
  middleware::AuthenticatedUser,
};
use crate::application::board::{ApplicationUseCase, ResumeUpload};
use crate::domain::board::NewApplication;
use crate::domain::shared::{EntityId, PaginationParams};

/// Multipart part holding the applicant JSON
const DETAILS_FIELD: &str = "obj_in";

/// GET /application
pub async fn list_applications_handler(
  _user: AuthenticatedUser,
  query: web::Query<PaginationParams>,
  use_case: web::Data<Arc<ApplicationUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let page = use_case.list(query.into_inner().into()).await?;
  Ok(HttpResponse::Ok().json(page))
}

/// POST /application
pub async fn create_application_handler(
  user: AuthenticatedUser,
  request: web::Json<CreateApplicationRequest>,
  use_case: web::Data<Arc<ApplicationUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;
  let request = request.into_inner();

  let draft = NewApplication {
    user_id: request.user_id.unwrap_or(user.id()),
    job_id: request.job_id,
    email: request.email,
    mobile_number: request.mobile_number,
    expected_salary: request.expected_salary,
    resume: request.resume,
  };

  let application = use_case.create(draft).await?;
  Ok(HttpResponse::Ok().json(application))
}

/// POST /application/{job_id}
///
/// Multipart body: `obj_in` with the applicant JSON and `file` with the resume.
pub async fn apply_with_resume_handler(
  user: AuthenticatedUser,
  path: web::Path<EntityId>,
  payload: Multipart,
  use_case: web::Data<Arc<ApplicationUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let mut form = read_multipart(payload).await?;
  let file = form.require_file()?;

  let details: ApplicationFormData = match form.fields.get(DETAILS_FIELD) {
    Some(raw) if !raw.trim().is_empty() => serde_json::from_str(raw)
      .map_err(|e| ApiError::Validation(format!("Invalid '{}' document: {}", DETAILS_FIELD, e)))?,
    _ => ApplicationFormData::default(),
  };
  details.validate()?;

  let user_id = details.user_id.unwrap_or(user.id());
  let application = use_case
    .apply_with_resume(
      user_id,
      path.into_inner(),
      details.into(),
      ResumeUpload {
        file_name: file.file_name,
        bytes: file.bytes,
      },
    )
    .await?;

  Ok(HttpResponse::Ok().json(application))
}

/// GET /application/{id}
pub async fn get_application_handler(
  _user: AuthenticatedUser,
  path: web::Path<EntityId>,
  use_case: web::Data<Arc<ApplicationUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let application = use_case.get(path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(application))
}

/// PUT /application/{id}
pub async fn update_application_handler(
  _user: AuthenticatedUser,
  path: web::Path<EntityId>,
  request: web::Json<UpdateApplicationRequest>,
  use_case: web::Data<Arc<ApplicationUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let application = use_case
    .update(path.into_inner(), request.into_inner().into())
    .await?;
  Ok(HttpResponse::Ok().json(application))
}

/// DELETE /application/{id}
pub async fn delete_application_handler(
  _user: AuthenticatedUser,
  path: web::Path<EntityId>,
  use_case: web::Data<Arc<ApplicationUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let application = use_case.delete(path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(application))
}

/// GET /application/job/{job_id}
pub async fn applications_by_job_handler(
  _user: AuthenticatedUser,
  path: web::Path<EntityId>,
  query: web::Query<PaginationParams>,
  use_case: web::Data<Arc<ApplicationUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let page = use_case
    .list_by_job(path.into_inner(), query.into_inner().into())
    .await?;
  Ok(HttpResponse::Ok().json(page))
}

/// GET /application/user-job?user_id=..&job_id=..
pub async fn application_by_user_and_job_handler(
  _user: AuthenticatedUser,
  query: web::Query<UserJobQuery>,
  use_case: web::Data<Arc<ApplicationUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let application = use_case
    .find_by_user_and_job(query.user_id, query.job_id)
    .await?;
  Ok(HttpResponse::Ok().json(application))
}

/// GET /application/download/{filename}
///
/// Streams a stored resume back as an attachment.
pub async fn download_resume_handler(
  _user: AuthenticatedUser,
  path: web::Path<String>,
  use_case: web::Data<Arc<ApplicationUseCase>>,
) -> Result<NamedFile, ApiError> {
  let filename = path.into_inner();
  let resume_path = use_case.open_resume(&filename).await?;

  let file = NamedFile::open_async(&resume_path).await.map_err(|e| {
    ApiError::Internal(format!("Failed to open resume {}: {}", resume_path.display(), e))
  })?;

  Ok(file.set_content_disposition(ContentDisposition {
    disposition: DispositionType::Attachment,
    parameters: vec![DispositionParam::Filename(filename)],
  }))
}
