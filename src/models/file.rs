//! Project file (document link) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::enums::FileCategory;
use super::project::PersonRef;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFile {
    pub id: i32,
    pub project_id: i32,
    pub name: String,
    pub url: String,
    pub category: FileCategory,
    pub file_type: Option<String>,
    pub size: Option<String>,
    pub uploaded_at: DateTime<Utc>,
    pub uploaded_by: Option<PersonRef>,
}

/// Create file link request
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFileLink {
    #[validate(length(min = 1, message = "File name is required"))]
    pub name: String,
    #[validate(url(message = "File link must be a valid URL"))]
    pub url: String,
    pub category: FileCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
}

/// Binary payload for multipart uploads
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Judged by content type, or by extension when the type is unknown
    pub fn is_image(&self) -> bool {
        if let Some(content_type) = self.content_type.as_deref() {
            return content_type.starts_with("image/");
        }
        let extension = self
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        matches!(extension.as_str(), "png" | "jpg" | "jpeg" | "gif" | "webp" | "heic")
    }
}
