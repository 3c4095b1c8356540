use std::collections::HashMap;

use axum::extract::Multipart;
use chrono::{DateTime, Utc};

use crate::{
    error::{AppError, AppResult},
    storage::UploadedImage,
};

/// Multipart form drained into memory: text fields by name, file parts by
/// name. Parts without a content type are treated as text.
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedImage>,
}

impl MultipartForm {
    pub async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut fields = HashMap::new();
        let mut files = HashMap::new();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let name = match field.name() {
                Some(n) => n.to_string(),
                None => continue,
            };
            match field.content_type() {
                Some(mime) => {
                    let content_type = mime.to_string();
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                    files.insert(
                        name,
                        UploadedImage {
                            content_type,
                            bytes: bytes.to_vec(),
                        },
                    );
                }
                None => {
                    let value = field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                    fields.insert(name, value);
                }
            }
        }

        Ok(Self { fields, files })
    }

    pub fn text(&self, name: &str) -> Option<String> {
        self.fields.get(name).cloned().filter(|v| !v.is_empty())
    }

    pub fn require_text(&self, name: &str, missing_message: &str) -> AppResult<String> {
        self.text(name)
            .ok_or_else(|| AppError::BadRequest(missing_message.to_string()))
    }

    pub fn file(&self, name: &str) -> Option<UploadedImage> {
        self.files.get(name).cloned()
    }

    pub fn require_file(&self, name: &str, missing_message: &str) -> AppResult<UploadedImage> {
        self.file(name)
            .ok_or_else(|| AppError::BadRequest(missing_message.to_string()))
    }
}

pub fn parse_amount(value: &str, invalid_message: &str) -> AppResult<i64> {
    value
        .parse::<i64>()
        .map_err(|_| AppError::BadRequest(invalid_message.to_string()))
}

pub fn parse_datetime(value: &str, invalid_message: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::BadRequest(invalid_message.to_string()))
}
