//! Project documents: uploaded files and external links

use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        file::{CreateFileLink, ProjectFile, UploadedFile},
        FileCategory,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct FilesService {
    repository: Repository,
}

impl FilesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, project_id: i32, category: Option<FileCategory>) -> AppResult<Vec<ProjectFile>> {
        self.repository.files_list(project_id, category).await
    }

    pub async fn add_link(&self, project_id: i32, data: CreateFileLink) -> AppResult<ProjectFile> {
        data.validate()?;
        let file = self.repository.files_create_link(project_id, &data).await?;
        tracing::info!("Link {} added to project {}", file.id, project_id);
        Ok(file)
    }

    pub async fn upload(&self, project_id: i32, file: UploadedFile, category: FileCategory) -> AppResult<ProjectFile> {
        let name = file.file_name.clone();
        let uploaded = self.repository.files_upload(project_id, file, category).await?;
        tracing::info!("Uploaded {} to project {} ({})", name, project_id, category);
        Ok(uploaded)
    }

    pub async fn delete(&self, project_id: i32, file_id: i32) -> AppResult<()> {
        self.repository.files_delete(project_id, file_id).await?;
        tracing::info!("File {} deleted from project {}", file_id, project_id);
        Ok(())
    }
}
