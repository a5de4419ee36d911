//! Assembles repositories, security adapters and use cases from configuration

use sqlx::PgPool;
use std::sync::Arc;

use super::config::{OtpMode, SecurityConfig, StorageConfig};
use super::persistence::memory::{
  MemoryApplicationRepository, MemoryJobRepository, MemorySavedJobRepository, MemoryStore,
  MemoryUserRepository,
};
use super::persistence::postgres::{
  PostgresApplicationRepository, PostgresJobRepository, PostgresSavedJobRepository,
  PostgresUserRepository,
};
use super::security::{Argon2PasswordHasher, FixedOtpPolicy, JwtTokenIssuer, StoredOtpPolicy};
use super::storage::LocalFileStorage;
use crate::adapters::http::ApiDependencies;
use crate::application::auth::{
  GetCurrentUserUseCase, LoginUserUseCase, RegisterUserUseCase, RequestPasswordOtpUseCase,
  ResetPasswordUseCase, UserUseCase,
};
use crate::application::board::{ApplicationUseCase, JobUseCase, SavedJobUseCase};
use crate::domain::auth::{AuthError, AuthService, OtpPolicy, UserRepository};
use crate::domain::board::{ApplicationRepository, FileStorage, JobRepository, SavedJobRepository};

/// One handle per table
#[derive(Clone)]
pub struct Repositories {
  pub users: Arc<dyn UserRepository>,
  pub jobs: Arc<dyn JobRepository>,
  pub applications: Arc<dyn ApplicationRepository>,
  pub saved_jobs: Arc<dyn SavedJobRepository>,
}

impl Repositories {
  pub fn postgres(pool: PgPool) -> Self {
    Self {
      users: Arc::new(PostgresUserRepository::new(pool.clone())),
      jobs: Arc::new(PostgresJobRepository::new(pool.clone())),
      applications: Arc::new(PostgresApplicationRepository::new(pool.clone())),
      saved_jobs: Arc::new(PostgresSavedJobRepository::new(pool)),
    }
  }

  /// Fresh, empty tables that live as long as the returned handles
  pub fn in_memory() -> Self {
    let store = MemoryStore::new();
    Self {
      users: Arc::new(MemoryUserRepository::new(store.clone())),
      jobs: Arc::new(MemoryJobRepository::new(store.clone())),
      applications: Arc::new(MemoryApplicationRepository::new(store.clone())),
      saved_jobs: Arc::new(MemorySavedJobRepository::new(store)),
    }
  }
}

/// Builds every use case the HTTP layer needs
///
/// # Errors
/// Fails only if the password hasher cannot be initialized
pub fn build_dependencies(
  repos: Repositories,
  security: &SecurityConfig,
  storage: &StorageConfig,
) -> Result<ApiDependencies, AuthError> {
  let password_hasher = Arc::new(Argon2PasswordHasher::new()?);
  let token_issuer = Arc::new(JwtTokenIssuer::new(
    &security.jwt_secret,
    security.token_ttl(),
  ));

  let otp_policy: Arc<dyn OtpPolicy> = match security.otp.mode {
    OtpMode::Fixed => {
      tracing::warn!("Password reset uses a fixed OTP; set security.otp.mode = \"stored\" outside development");
      Arc::new(FixedOtpPolicy::new(security.otp.fixed_code.clone()))
    }
    OtpMode::Stored => Arc::new(StoredOtpPolicy::new(
      repos.users.clone(),
      security.otp.ttl(),
    )),
  };

  let auth_service = Arc::new(AuthService::new(
    repos.users.clone(),
    password_hasher,
    token_issuer,
    otp_policy,
  ));

  let file_storage: Arc<dyn FileStorage> = Arc::new(LocalFileStorage::new(
    storage.resume_dir.clone(),
    storage.logo_dir.clone(),
  ));

  Ok(ApiDependencies {
    register: Arc::new(RegisterUserUseCase::new(auth_service.clone())),
    login: Arc::new(LoginUserUseCase::new(auth_service.clone())),
    current_user: Arc::new(GetCurrentUserUseCase::new(auth_service.clone())),
    send_otp: Arc::new(RequestPasswordOtpUseCase::new(auth_service.clone())),
    reset_password: Arc::new(ResetPasswordUseCase::new(auth_service)),
    users: Arc::new(UserUseCase::new(repos.users)),
    jobs: Arc::new(JobUseCase::new(
      repos.jobs.clone(),
      repos.applications.clone(),
      file_storage.clone(),
    )),
    applications: Arc::new(ApplicationUseCase::new(
      repos.applications.clone(),
      repos.jobs.clone(),
      file_storage,
    )),
    saved_jobs: Arc::new(SavedJobUseCase::new(repos.saved_jobs, repos.jobs)),
  })
}
