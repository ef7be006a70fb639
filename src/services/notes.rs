//! Project notes

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        file::UploadedFile,
        note::{CreateNote, ProjectNote},
        NoteType,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct NotesService {
    repository: Repository,
}

impl NotesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, project_id: i32, note_type: Option<NoteType>) -> AppResult<Vec<ProjectNote>> {
        self.repository.notes_list(project_id, note_type).await
    }

    /// Create a note, uploading its images first
    pub async fn create(
        &self,
        project_id: i32,
        content: &str,
        note_type: NoteType,
        images: Vec<UploadedFile>,
    ) -> AppResult<ProjectNote> {
        let mut data = CreateNote {
            content: content.trim().to_string(),
            note_type,
            image_urls: Vec::with_capacity(images.len()),
        };
        data.validate()?;

        for image in images {
            if !image.is_image() {
                return Err(AppError::Validation(format!(
                    "{} is not an image",
                    image.file_name
                )));
            }
            let url = self.repository.notes_upload_image(project_id, image).await?;
            data.image_urls.push(url);
        }

        let note = self.repository.notes_create(project_id, &data).await?;
        tracing::info!("Note {} added to project {}", note.id, project_id);
        Ok(note)
    }

    pub async fn delete(&self, project_id: i32, note_id: i32) -> AppResult<()> {
        self.repository.notes_delete(project_id, note_id).await?;
        tracing::info!("Note {} deleted from project {}", note_id, project_id);
        Ok(())
    }
}
