//! Project file endpoints

use reqwest::multipart::{Form, Part};

use super::Repository;
use crate::{
    error::AppResult,
    models::{
        file::{CreateFileLink, ProjectFile, UploadedFile},
        FileCategory,
    },
};

impl Repository {
    pub async fn files_list(&self, project_id: i32, category: Option<FileCategory>) -> AppResult<Vec<ProjectFile>> {
        let mut request = self.get(&format!("/projects/{}/files", project_id));
        if let Some(category) = category {
            request = request.query(&[("category", category.as_str())]);
        }
        self.fetch(request, "fetch files").await
    }

    pub async fn files_create_link(&self, project_id: i32, data: &CreateFileLink) -> AppResult<ProjectFile> {
        self.fetch(
            self.post(&format!("/projects/{}/files", project_id)).json(data),
            "create file link",
        )
        .await
    }

    pub async fn files_upload(
        &self,
        project_id: i32,
        file: UploadedFile,
        category: FileCategory,
    ) -> AppResult<ProjectFile> {
        let mut part = Part::bytes(file.bytes).file_name(file.file_name);
        if let Some(content_type) = file.content_type.as_deref() {
            part = part.mime_str(content_type)?;
        }
        let form = Form::new().part("file", part);

        self.fetch(
            self.post(&format!("/projects/{}/files/upload", project_id))
                .query(&[("category", category.as_str())])
                .multipart(form),
            "upload file",
        )
        .await
    }

    pub async fn files_delete(&self, project_id: i32, file_id: i32) -> AppResult<()> {
        self.execute(
            self.delete(&format!("/projects/{}/files/{}", project_id, file_id)),
            "delete file",
        )
        .await
    }
}
