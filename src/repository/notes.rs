//! Project note endpoints

use reqwest::multipart::{Form, Part};

use super::Repository;
use crate::{
    error::AppResult,
    models::{
        file::UploadedFile,
        note::{CreateNote, NoteImageUploaded, ProjectNote},
        NoteType,
    },
};

impl Repository {
    pub async fn notes_list(&self, project_id: i32, note_type: Option<NoteType>) -> AppResult<Vec<ProjectNote>> {
        let mut request = self.get(&format!("/projects/{}/notes", project_id));
        if let Some(note_type) = note_type {
            request = request.query(&[("type", note_type.as_str())]);
        }
        self.fetch(request, "fetch notes").await
    }

    pub async fn notes_create(&self, project_id: i32, data: &CreateNote) -> AppResult<ProjectNote> {
        self.fetch(
            self.post(&format!("/projects/{}/notes", project_id)).json(data),
            "create note",
        )
        .await
    }

    pub async fn notes_delete(&self, project_id: i32, note_id: i32) -> AppResult<()> {
        self.execute(
            self.delete(&format!("/projects/{}/notes/{}", project_id, note_id)),
            "delete note",
        )
        .await
    }

    /// Upload an image and return the URL to reference from a note
    pub async fn notes_upload_image(&self, project_id: i32, image: UploadedFile) -> AppResult<String> {
        let mut part = Part::bytes(image.bytes).file_name(image.file_name);
        if let Some(content_type) = image.content_type.as_deref() {
            part = part.mime_str(content_type)?;
        }
        let form = Form::new().part("image", part);

        let uploaded: NoteImageUploaded = self
            .fetch(
                self.post(&format!("/projects/{}/notes/image", project_id)).multipart(form),
                "upload image",
            )
            .await?;
        Ok(uploaded.image_url)
    }
}
