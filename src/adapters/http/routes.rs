use actix_web::{HttpResponse, web};
use std::path::PathBuf;
use std::sync::Arc;

use crate::application::auth::{
  GetCurrentUserUseCase, LoginUserUseCase, RegisterUserUseCase, RequestPasswordOtpUseCase,
  ResetPasswordUseCase, UserUseCase,
};
use crate::application::board::{ApplicationUseCase, JobUseCase, SavedJobUseCase};

use super::errors::{form_error_handler, json_error_handler, path_error_handler, query_error_handler};
use super::handlers::{applications, auth, jobs, saved_jobs, users};
use super::middleware::AuthMiddleware;

/// Public mount point of uploaded logos
pub const LOGO_ROUTE: &str = "/uploads/logos";

/// Every use case the HTTP layer talks to
#[derive(Clone)]
pub struct ApiDependencies {
  pub register: Arc<RegisterUserUseCase>,
  pub login: Arc<LoginUserUseCase>,
  pub current_user: Arc<GetCurrentUserUseCase>,
  pub send_otp: Arc<RequestPasswordOtpUseCase>,
  pub reset_password: Arc<ResetPasswordUseCase>,
  pub users: Arc<UserUseCase>,
  pub jobs: Arc<JobUseCase>,
  pub applications: Arc<ApplicationUseCase>,
  pub saved_jobs: Arc<SavedJobUseCase>,
}

/// Configure the versioned API
///
/// Registration, login and both password reset steps are public. Every
/// other route requires a bearer token; the check happens in the
/// [`AuthenticatedUser`](super::middleware::AuthenticatedUser) extractor.
///
/// # Routes
///
/// - POST /login/access-token, GET /me
/// - POST /send-otp, POST /reset-password-otp
/// - GET|POST /user, GET|PUT|DELETE /user/{id}
/// - GET|POST /job, GET|PUT|DELETE /job/{id}
/// - GET /jobs/user/{user_id}, GET /jobs/applied/{user_id}, POST /upload-logo
/// - GET|POST /application, GET|PUT|DELETE /application/{id}
/// - POST /application/{job_id} (multipart resume upload)
/// - GET /application/job/{job_id}, GET /application/user-job
/// - GET /application/download/{filename}
/// - GET|POST /save-job, GET|PUT|DELETE /save-job/{id}
/// - GET /save-job/user-job, GET /saved-jobs/{user_id}
pub fn configure_api_routes(cfg: &mut web::ServiceConfig, deps: ApiDependencies) {
  cfg
    .app_data(web::Data::new(deps.register))
    .app_data(web::Data::new(deps.login))
    .app_data(web::Data::new(deps.send_otp))
    .app_data(web::Data::new(deps.reset_password))
    .app_data(web::Data::new(deps.users))
    .app_data(web::Data::new(deps.jobs))
    .app_data(web::Data::new(deps.applications))
    .app_data(web::Data::new(deps.saved_jobs));

  // Auth
  cfg
    .route("/login/access-token", web::post().to(auth::login_handler))
    .route("/me", web::get().to(auth::current_user_handler))
    .route("/send-otp", web::post().to(auth::send_otp_handler))
    .route(
      "/reset-password-otp",
      web::post().to(auth::reset_password_handler),
    );

  // Users
  cfg
    .service(
      web::resource("/user")
        .route(web::get().to(users::list_users_handler))
        .route(web::post().to(auth::register_handler)),
    )
    .service(
      web::resource("/user/{id}")
        .route(web::get().to(users::get_user_handler))
        .route(web::put().to(users::update_user_handler))
        .route(web::delete().to(users::delete_user_handler)),
    );

  // Jobs
  cfg
    .service(
      web::resource("/job")
        .route(web::get().to(jobs::list_jobs_handler))
        .route(web::post().to(jobs::create_job_handler)),
    )
    .service(
      web::resource("/job/{id}")
        .route(web::get().to(jobs::get_job_handler))
        .route(web::put().to(jobs::update_job_handler))
        .route(web::delete().to(jobs::delete_job_handler)),
    )
    .route("/jobs/user/{user_id}", web::get().to(jobs::jobs_by_user_handler))
    .route(
      "/jobs/applied/{user_id}",
      web::get().to(jobs::applied_jobs_handler),
    )
    .route("/upload-logo", web::post().to(jobs::upload_logo_handler));

  // Applications; literal segments go before /application/{id}
  cfg
    .service(
      web::resource("/application")
        .route(web::get().to(applications::list_applications_handler))
        .route(web::post().to(applications::create_application_handler)),
    )
    .route(
      "/application/user-job",
      web::get().to(applications::application_by_user_and_job_handler),
    )
    .route(
      "/application/job/{job_id}",
      web::get().to(applications::applications_by_job_handler),
    )
    .route(
      "/application/download/{filename}",
      web::get().to(applications::download_resume_handler),
    )
    .service(
      web::resource("/application/{id}")
        .route(web::get().to(applications::get_application_handler))
        .route(web::put().to(applications::update_application_handler))
        .route(web::delete().to(applications::delete_application_handler))
        .route(web::post().to(applications::apply_with_resume_handler)),
    );

  // Saved jobs
  cfg
    .service(
      web::resource("/save-job")
        .route(web::get().to(saved_jobs::list_saved_jobs_handler))
        .route(web::post().to(saved_jobs::save_job_handler)),
    )
    .route(
      "/save-job/user-job",
      web::get().to(saved_jobs::saved_job_by_user_and_job_handler),
    )
    .service(
      web::resource("/save-job/{id}")
        .route(web::get().to(saved_jobs::get_saved_job_handler))
        .route(web::put().to(saved_jobs::update_saved_job_handler))
        .route(web::delete().to(saved_jobs::delete_saved_job_handler)),
    )
    .route(
      "/saved-jobs/{user_id}",
      web::get().to(saved_jobs::saved_jobs_by_user_handler),
    );
}

/// Configure the whole application
///
/// Mounts the API under `api_prefix` behind [`AuthMiddleware`], serves
/// uploaded logos from `logo_dir` and exposes `/health`. Extractor failures
/// are rendered with the same error body as every other failure.
///
/// # Example
///
/// ```no_run
/// use actix_web::App;
/// use std::path::PathBuf;
/// # use jobboard::adapters::http::routes::{ApiDependencies, configure_app};
///
/// # fn example(deps: ApiDependencies) {
/// let app = App::new().configure(|cfg| {
///   configure_app(cfg, deps, "/api/v1", PathBuf::from("uploads/logos"))
/// });
/// # }
/// ```
pub fn configure_app(
  cfg: &mut web::ServiceConfig,
  deps: ApiDependencies,
  api_prefix: &str,
  logo_dir: PathBuf,
) {
  let current_user = deps.current_user.clone();

  cfg
    .app_data(web::JsonConfig::default().error_handler(json_error_handler))
    .app_data(web::FormConfig::default().error_handler(form_error_handler))
    .app_data(web::PathConfig::default().error_handler(path_error_handler))
    .app_data(web::QueryConfig::default().error_handler(query_error_handler))
    .route("/health", web::get().to(|| async { HttpResponse::Ok().body("OK") }))
    .service(actix_files::Files::new(LOGO_ROUTE, logo_dir))
    .service(
      web::scope(api_prefix)
        .wrap(AuthMiddleware::new(current_user))
        .configure(|cfg| configure_api_routes(cfg, deps)),
    );
}
