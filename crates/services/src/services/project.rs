use std::sync::Arc;

use domain::models::project::{CreateProject, Project, UpdateProject};
use domain::types::{ColumnId, project_status_for_column};
use repos::{BoardRepository, RepositoryError};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ProjectServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("Project not found: {0}")]
    ProjectNotFound(Uuid),
    #[error("A project titled '{0}' already exists")]
    DuplicateTitle(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type Result<T> = std::result::Result<T, ProjectServiceError>;

/// CRUD over projects plus the project-board move. Status is derived from
/// the destination column on a move, exactly as task status is.
#[derive(Clone)]
pub struct ProjectService {
    repository: Arc<dyn BoardRepository>,
}

impl ProjectService {
    pub fn new(repository: Arc<dyn BoardRepository>) -> Self {
        Self { repository }
    }

    pub async fn create_project(&self, data: CreateProject) -> Result<Project> {
        let title = data.title.trim();
        if title.is_empty() {
            return Err(ProjectServiceError::Validation(
                "Project title must not be empty".to_string(),
            ));
        }
        if self.repository.exists_by_title(title).await? {
            return Err(ProjectServiceError::DuplicateTitle(title.to_string()));
        }

        let project = Project::new(&data, Uuid::new_v4());
        self.repository.add_project(&project).await?;
        tracing::info!("Created project {} '{}'", project.id, project.title);
        Ok(project)
    }

    pub async fn get_projects(&self) -> Result<Vec<Project>> {
        Ok(self.repository.fetch_projects().await?)
    }

    pub async fn get_project(&self, id: Uuid) -> Result<Project> {
        self.repository
            .fetch_project(id)
            .await?
            .ok_or(ProjectServiceError::ProjectNotFound(id))
    }

    pub async fn update_project(&self, id: Uuid, mut payload: UpdateProject) -> Result<Project> {
        if let Some(title) = &payload.title {
            let trimmed = title.trim();
            if trimmed.is_empty() {
                return Err(ProjectServiceError::Validation(
                    "Project title must not be empty".to_string(),
                ));
            }
            let existing = self.get_project(id).await?;
            if !trimmed.eq_ignore_ascii_case(existing.title.trim())
                && self.repository.exists_by_title(trimmed).await?
            {
                return Err(ProjectServiceError::DuplicateTitle(trimmed.to_string()));
            }
            payload.title = Some(trimmed.to_string());
        }

        let project = self
            .repository
            .update_project(id, &payload)
            .await
            .map_err(|e| Self::not_found(e, id))?;
        tracing::debug!("Updated project {}", id);
        Ok(project)
    }

    /// The project-board drag: derive the project's status from the
    /// destination column and persist it.
    pub async fn move_project(&self, id: Uuid, column: &ColumnId) -> Result<Project> {
        let status = project_status_for_column(column);
        let payload = UpdateProject {
            status: Some(status),
            ..Default::default()
        };
        let project = self
            .repository
            .update_project(id, &payload)
            .await
            .map_err(|e| Self::not_found(e, id))?;
        tracing::debug!("Moved project {} to column '{}' ({})", id, column, status);
        Ok(project)
    }

    pub async fn delete_project(&self, id: Uuid) -> Result<()> {
        self.repository
            .delete_project(id)
            .await
            .map_err(|e| Self::not_found(e, id))?;
        tracing::info!("Deleted project {}", id);
        Ok(())
    }

    fn not_found(error: RepositoryError, id: Uuid) -> ProjectServiceError {
        match error {
            RepositoryError::ProjectNotFound => ProjectServiceError::ProjectNotFound(id),
            other => ProjectServiceError::Repository(other),
        }
    }
}
