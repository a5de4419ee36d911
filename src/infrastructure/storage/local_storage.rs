use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::board::{FileStorage, StorageError, StoredFile};
use crate::domain::shared::EntityId;

/// Stores uploads as plain files under two directories
///
/// Directories are created on first write.
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
  resume_dir: PathBuf,
  logo_dir: PathBuf,
}

impl LocalFileStorage {
  pub fn new(resume_dir: impl Into<PathBuf>, logo_dir: impl Into<PathBuf>) -> Self {
    Self {
      resume_dir: resume_dir.into(),
      logo_dir: logo_dir.into(),
    }
  }

  async fn write(dir: &Path, name: String, bytes: &[u8]) -> Result<StoredFile, StorageError> {
    tokio::fs::create_dir_all(dir).await?;

    let path = dir.join(&name);
    tokio::fs::write(&path, bytes).await?;

    tracing::debug!(path = %path.display(), size = bytes.len(), "Stored upload");

    Ok(StoredFile { name, path })
  }
}

/// Keeps the last path component and replaces anything outside `[A-Za-z0-9._-]`
///
/// Runs of dots collapse to one and leading dots are dropped.
fn sanitize_file_name(original: &str) -> String {
  let base = original
    .rsplit(['/', '\\'])
    .next()
    .unwrap_or_default()
    .trim();

  let mut cleaned = String::with_capacity(base.len());
  for c in base.chars() {
    let c = if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
      c
    } else {
      '_'
    };
    if c == '.' && cleaned.ends_with('.') {
      continue;
    }
    cleaned.push(c);
  }

  let cleaned = cleaned.trim_start_matches('.');
  if cleaned.is_empty() {
    "upload".to_string()
  } else {
    cleaned.to_string()
  }
}

fn random_suffix() -> String {
  let mut suffix = Uuid::new_v4().simple().to_string();
  suffix.truncate(12);
  suffix
}

/// A name is safe when it is exactly one normal path component
fn is_safe_name(name: &str) -> bool {
  if name.contains(['/', '\\', '\0']) {
    return false;
  }

  let mut components = Path::new(name).components();
  matches!(
    (components.next(), components.next()),
    (Some(Component::Normal(_)), None)
  )
}

#[async_trait]
impl FileStorage for LocalFileStorage {
  async fn save_resume(
    &self,
    user_id: EntityId,
    original_name: &str,
    bytes: &[u8],
  ) -> Result<StoredFile, StorageError> {
    let name = format!(
      "user_{}_{}_{}",
      user_id,
      random_suffix(),
      sanitize_file_name(original_name)
    );

    Self::write(&self.resume_dir, name, bytes).await
  }

  async fn save_logo(&self, original_name: &str, bytes: &[u8]) -> Result<StoredFile, StorageError> {
    let extension = Path::new(original_name)
      .extension()
      .and_then(|ext| ext.to_str())
      .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
      .map(|ext| ext.to_ascii_lowercase());

    let id = Uuid::new_v4();
    let name = match extension {
      Some(ext) => format!("{id}.{ext}"),
      None => id.to_string(),
    };

    Self::write(&self.logo_dir, name, bytes).await
  }

  async fn resume_path(&self, name: &str) -> Result<PathBuf, StorageError> {
    if !is_safe_name(name) {
      return Err(StorageError::InvalidName(name.to_string()));
    }

    let path = self.resume_dir.join(name);
    match tokio::fs::metadata(&path).await {
      Ok(meta) if meta.is_file() => Ok(path),
      Ok(_) => Err(StorageError::NotFound),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound),
      Err(e) => Err(StorageError::Io(e)),
    }
  }
}
