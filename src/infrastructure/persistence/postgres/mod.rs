pub mod application_repository;
pub mod job_repository;
pub mod saved_job_repository;
pub mod user_repository;

pub use application_repository::PostgresApplicationRepository;
pub use job_repository::PostgresJobRepository;
pub use saved_job_repository::PostgresSavedJobRepository;
pub use user_repository::PostgresUserRepository;
