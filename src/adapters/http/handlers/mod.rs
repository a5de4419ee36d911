pub mod applications;
pub mod auth;
pub mod jobs;
pub mod saved_jobs;
pub mod users;

use std::collections::HashMap;

use actix_multipart::Multipart;
use futures_util::TryStreamExt;

use crate::adapters::http::errors::ApiError;

/// Upper bound for a single uploaded file
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// A file part of a multipart body
#[derive(Debug)]
pub struct UploadedFile {
  pub file_name: String,
  pub bytes: Vec<u8>,
}

/// Multipart body split into its `file` part and plain text fields
#[derive(Debug, Default)]
pub struct MultipartForm {
  pub file: Option<UploadedFile>,
  pub fields: HashMap<String, String>,
}

impl MultipartForm {
  pub fn require_file(&mut self) -> Result<UploadedFile, ApiError> {
    self
      .file
      .take()
      .ok_or_else(|| ApiError::Validation("Missing 'file' part".to_string()))
  }
}

/// Drains a multipart payload into memory
///
/// Parts larger than [`MAX_UPLOAD_BYTES`] are rejected.
pub async fn read_multipart(mut payload: Multipart) -> Result<MultipartForm, ApiError> {
  let mut form = MultipartForm::default();

  while let Some(mut field) = payload.try_next().await? {
    let name = field.name().unwrap_or_default().to_string();
    let file_name = field
      .content_disposition()
      .and_then(|cd| cd.get_filename())
      .map(str::to_owned);

    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await? {
      if bytes.len() + chunk.len() > MAX_UPLOAD_BYTES {
        return Err(ApiError::Validation(format!(
          "Part '{}' exceeds the {} byte upload limit",
          name, MAX_UPLOAD_BYTES
        )));
      }
      bytes.extend_from_slice(&chunk);
    }

    if name == "file" {
      form.file = Some(UploadedFile {
        file_name: file_name.unwrap_or_else(|| "upload".to_string()),
        bytes,
      });
    } else {
      let text = String::from_utf8(bytes)
        .map_err(|_| ApiError::Validation(format!("Field '{}' is not valid UTF-8", name)))?;
      form.fields.insert(name, text);
    }
  }

  Ok(form)
}
