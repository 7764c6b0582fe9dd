pub mod coatings;
pub mod health;
pub mod materials;
pub mod shapes;
pub mod users;

use std::path::Path;

use axum::extract::Multipart;

use crate::errors::ApiError;

pub(crate) struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Pull the `file` part out of a multipart upload.
pub(crate) async fn read_upload(mut multipart: Multipart) -> Result<UploadedFile, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("invalid multipart payload: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or("upload").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::validation(format!("failed to read uploaded file: {}", e)))?
            .to_vec();
        return Ok(UploadedFile { name, bytes });
    }

    Err(ApiError::validation("missing 'file' form field"))
}

pub(crate) fn require_extension(file_name: &str, allowed: &[&str]) -> Result<(), ApiError> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    if allowed.contains(&ext.as_str()) {
        Ok(())
    } else {
        Err(ApiError::validation(format!(
            "unsupported file extension '{}', expected one of: {}",
            ext,
            allowed.join(", ")
        )))
    }
}
