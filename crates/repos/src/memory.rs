//! In-memory reference adapter for the Repository Port.
//!
//! Backs the test suite and doubles as executable documentation of the
//! contract a hosted-store adapter must satisfy. Per-call atomicity comes
//! from holding the write lock for the whole call.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use domain::models::project::{Project, UpdateProject};
use domain::models::task::Task;
use domain::types::ColumnId;
use ordering::ColumnMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{BoardRepository, RepositoryError, Result};

#[derive(Default)]
pub struct MemoryRepository {
    state: RwLock<HashMap<Uuid, Project>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a project directly, bypassing the service layer. Test setup only.
    pub async fn insert_project(&self, project: Project) {
        self.state.write().await.insert(project.id, project);
    }
}

#[async_trait::async_trait]
impl BoardRepository for MemoryRepository {
    async fn fetch_tasks_for_project(&self, project_id: Uuid) -> Result<Vec<Task>> {
        let state = self.state.read().await;
        let project = state
            .get(&project_id)
            .ok_or(RepositoryError::ProjectNotFound)?;
        Ok(project.tasks.clone())
    }

    async fn save_tasks(&self, project_id: Uuid, columns: &ColumnMap) -> Result<()> {
        let mut state = self.state.write().await;
        let project = state
            .get_mut(&project_id)
            .ok_or(RepositoryError::ProjectNotFound)?;
        let affected: HashSet<&ColumnId> = columns.keys().collect();
        project.tasks.retain(|task| !affected.contains(&task.column_id));
        for items in columns.values() {
            project.tasks.extend(items.iter().cloned());
        }
        tracing::debug!(
            "Replaced {} column(s) for project {}",
            affected.len(),
            project_id
        );
        Ok(())
    }

    async fn fetch_projects(&self) -> Result<Vec<Project>> {
        let state = self.state.read().await;
        let mut projects: Vec<Project> = state.values().cloned().collect();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(projects)
    }

    async fn fetch_project(&self, id: Uuid) -> Result<Option<Project>> {
        Ok(self.state.read().await.get(&id).cloned())
    }

    async fn add_project(&self, project: &Project) -> Result<()> {
        let mut state = self.state.write().await;
        if state.contains_key(&project.id) {
            return Err(RepositoryError::Conflict(format!(
                "project {} already exists",
                project.id
            )));
        }
        state.insert(project.id, project.clone());
        Ok(())
    }

    async fn update_project(&self, id: Uuid, patch: &UpdateProject) -> Result<Project> {
        let mut state = self.state.write().await;
        let project = state.get_mut(&id).ok_or(RepositoryError::ProjectNotFound)?;

        if let Some(title) = &patch.title {
            project.title = title.trim().to_string();
        }
        if let Some(description) = &patch.description {
            let trimmed = description.trim();
            project.description = (!trimmed.is_empty()).then(|| trimmed.to_string());
        }
        if let Some(status) = patch.status {
            project.status = status;
        }
        if let Some(technologies) = &patch.technologies {
            project.technologies = technologies.clone();
        }
        if let Some(tags) = &patch.tags {
            project.tags = tags.clone();
        }
        project.updated_at = Utc::now();

        Ok(project.clone())
    }

    async fn delete_project(&self, id: Uuid) -> Result<()> {
        let mut state = self.state.write().await;
        state
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::ProjectNotFound)
    }

    async fn exists_by_title(&self, title: &str) -> Result<bool> {
        let needle = title.trim().to_lowercase();
        let state = self.state.read().await;
        Ok(state
            .values()
            .any(|project| project.title.trim().to_lowercase() == needle))
    }
}
