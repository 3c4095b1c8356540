use std::path::PathBuf;

use tokio::fs;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

const ALLOWED_FORMATS: [(&str, &str); 4] = [
    ("image/jpeg", "jpg"),
    ("image/jpg", "jpg"),
    ("image/png", "png"),
    ("image/webp", "webp"),
];

/// Map a mime type to a file extension, rejecting anything outside the
/// supported set.
pub fn image_extension(mime: &str) -> AppResult<&'static str> {
    ALLOWED_FORMATS
        .iter()
        .find(|(allowed, _)| *allowed == mime)
        .map(|(_, ext)| *ext)
        .ok_or_else(|| {
            AppError::BadRequest(
                "Invalid image format. Allowed formats: jpeg, jpg, png, webp".into(),
            )
        })
}

/// One file lifted out of a multipart request, not yet validated.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, serde::Serialize, utoipa::ToSchema)]
pub struct StoredImage {
    pub public_id: String,
    pub url: String,
}

/// Disk-backed stand-in for the external image service. Files land under
/// `<root>/<folder>/` and are addressed by a generated public id.
#[derive(Clone)]
pub struct ImageStore {
    root: PathBuf,
    base_url: String,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into(),
        }
    }

    /// Persist one image. Any IO failure surfaces as an upstream error so the
    /// enclosing operation aborts without partial state.
    pub async fn store(&self, folder: &str, image: &UploadedImage) -> AppResult<StoredImage> {
        let ext = image_extension(&image.content_type)?;
        let public_id = format!("{folder}/{}.{ext}", Uuid::new_v4());

        let path = self.root.join(&public_id);
        let upload = async {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::write(&path, &image.bytes).await
        };
        if let Err(err) = upload.await {
            tracing::error!(error = %err, public_id = %public_id, "image store write failed");
            return Err(AppError::Upstream(
                "Failed to upload image. Please try again.".into(),
            ));
        }

        let url = format!("{}/uploads/{}", self.base_url.trim_end_matches('/'), public_id);
        Ok(StoredImage { public_id, url })
    }
}
