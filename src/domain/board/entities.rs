use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::shared::{Entity, EntityId};

/// A job posting owned by a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
  pub id: EntityId,
  /// Owner of the posting
  pub user_id: EntityId,
  pub title: String,
  pub company: Option<String>,
  pub description: String,
  /// Free text, e.g. "80k-100k"
  pub salary: Option<String>,
  pub location: String,
  /// Comma separated tags
  pub tags: Option<String>,
  pub is_remote: bool,
  /// Stored logo filename
  pub logo: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Entity for Job {
  type Draft = NewJob;
  type Changes = JobChanges;

  const NAME: &'static str = "Job";

  fn id(&self) -> EntityId {
    self.id
  }
}

#[derive(Debug, Clone)]
pub struct NewJob {
  pub user_id: EntityId,
  pub title: String,
  pub company: Option<String>,
  pub description: String,
  pub salary: Option<String>,
  pub location: String,
  pub tags: Option<String>,
  pub is_remote: bool,
  pub logo: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct JobChanges {
  pub user_id: Option<EntityId>,
  pub title: Option<String>,
  pub company: Option<String>,
  pub description: Option<String>,
  pub salary: Option<String>,
  pub location: Option<String>,
  pub tags: Option<String>,
  pub is_remote: Option<bool>,
  pub logo: Option<String>,
}

impl JobChanges {
  pub fn apply_to(self, job: &mut Job, now: DateTime<Utc>) {
    if let Some(user_id) = self.user_id {
      job.user_id = user_id;
    }
    if let Some(title) = self.title {
      job.title = title;
    }
    if let Some(company) = self.company {
      job.company = Some(company);
    }
    if let Some(description) = self.description {
      job.description = description;
    }
    if let Some(salary) = self.salary {
      job.salary = Some(salary);
    }
    if let Some(location) = self.location {
      job.location = location;
    }
    if let Some(tags) = self.tags {
      job.tags = Some(tags);
    }
    if let Some(is_remote) = self.is_remote {
      job.is_remote = is_remote;
    }
    if let Some(logo) = self.logo {
      job.logo = Some(logo);
    }
    job.updated_at = now;
  }
}

/// A user's submission to a job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
  pub id: EntityId,
  pub user_id: EntityId,
  pub job_id: EntityId,
  pub email: Option<String>,
  pub mobile_number: Option<String>,
  pub expected_salary: Option<i64>,
  /// Path of the stored resume file
  pub resume: Option<String>,
  pub applied_at: DateTime<Utc>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Entity for Application {
  type Draft = NewApplication;
  type Changes = ApplicationChanges;

  const NAME: &'static str = "Application";

  fn id(&self) -> EntityId {
    self.id
  }
}

#[derive(Debug, Clone)]
pub struct NewApplication {
  pub user_id: EntityId,
  pub job_id: EntityId,
  pub email: Option<String>,
  pub mobile_number: Option<String>,
  pub expected_salary: Option<i64>,
  pub resume: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ApplicationChanges {
  pub email: Option<String>,
  pub mobile_number: Option<String>,
  pub expected_salary: Option<i64>,
  pub resume: Option<String>,
}

impl ApplicationChanges {
  pub fn apply_to(self, application: &mut Application, now: DateTime<Utc>) {
    if let Some(email) = self.email {
      application.email = Some(email);
    }
    if let Some(mobile_number) = self.mobile_number {
      application.mobile_number = Some(mobile_number);
    }
    if let Some(expected_salary) = self.expected_salary {
      application.expected_salary = Some(expected_salary);
    }
    if let Some(resume) = self.resume {
      application.resume = Some(resume);
    }
    application.updated_at = now;
  }
}

/// A job bookmarked by a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedJob {
  pub id: EntityId,
  pub user_id: EntityId,
  pub job_id: EntityId,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Entity for SavedJob {
  type Draft = NewSavedJob;
  type Changes = SavedJobChanges;

  const NAME: &'static str = "SavedJob";

  fn id(&self) -> EntityId {
    self.id
  }
}

#[derive(Debug, Clone)]
pub struct NewSavedJob {
  pub user_id: EntityId,
  pub job_id: EntityId,
}

/// Re-points a saved job at another user or job
#[derive(Debug, Clone, Default)]
pub struct SavedJobChanges {
  pub user_id: Option<EntityId>,
  pub job_id: Option<EntityId>,
}

impl SavedJobChanges {
  pub fn apply_to(self, saved: &mut SavedJob, now: DateTime<Utc>) {
    if let Some(user_id) = self.user_id {
      saved.user_id = user_id;
    }
    if let Some(job_id) = self.job_id {
      saved.job_id = job_id;
    }
    saved.updated_at = now;
  }
}
