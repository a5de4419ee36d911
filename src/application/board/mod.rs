//! Job board use cases
//!
//! One orchestrator per entity. Each wraps repository calls, converts
//! persistence failures into `BoardError` and maps entities to the output
//! schemas served over HTTP.

mod applications;
mod jobs;
mod saved_jobs;

pub use applications::{ApplicantDetails, ApplicationOut, ApplicationUseCase, ResumeUpload};
pub use jobs::{JobOut, JobUseCase, LogoOut};
pub use saved_jobs::{SavedJobDetailsOut, SavedJobOut, SavedJobUseCase};
