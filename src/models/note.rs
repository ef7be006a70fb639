//! Project note model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::enums::NoteType;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteAuthor {
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
    pub initials: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectNote {
    pub id: i32,
    pub content: String,
    #[serde(rename = "type")]
    pub note_type: NoteType,
    #[serde(default)]
    pub image_urls: Vec<String>,
    pub author: NoteAuthor,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_edited: bool,
}

/// Create note request
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateNote {
    #[validate(length(min = 1, message = "Note content is required"))]
    pub content: String,
    #[serde(rename = "type")]
    pub note_type: NoteType,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub image_urls: Vec<String>,
}

/// Response of the note image upload endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteImageUploaded {
    pub image_url: String,
}
