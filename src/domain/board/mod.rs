//! Job postings, applications and saved jobs

pub mod entities;
pub mod errors;
pub mod ports;

pub use entities::{
  Application, ApplicationChanges, Job, JobChanges, NewApplication, NewJob, NewSavedJob, SavedJob,
  SavedJobChanges,
};
pub use errors::{BoardError, StorageError};
pub use ports::{ApplicationRepository, FileStorage, JobRepository, SavedJobRepository, StoredFile};
