//! The Repository Port: the ordering engine's only external boundary.
//!
//! Adapters for a concrete store implement [`BoardRepository`]; the engine
//! never sees the storage technology behind it. [`memory::MemoryRepository`]
//! is the reference adapter and the one the test suite runs against.

use async_trait::async_trait;
use domain::models::project::{Project, UpdateProject};
use domain::models::task::Task;
use ordering::ColumnMap;
use thiserror::Error;
use uuid::Uuid;

pub mod memory;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("project not found")]
    ProjectNotFound,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, RepositoryError>;

#[async_trait]
pub trait BoardRepository: Send + Sync {
    /// All tasks in the project, in no guaranteed order; callers re-sort by
    /// `order`. Unknown project ids fail with [`RepositoryError::ProjectNotFound`].
    async fn fetch_tasks_for_project(&self, project_id: Uuid) -> Result<Vec<Task>>;

    /// Replace the full task state of every column key present in the map,
    /// effectively atomically per call. Columns absent from the map are left
    /// untouched.
    async fn save_tasks(&self, project_id: Uuid, columns: &ColumnMap) -> Result<()>;

    /// All projects, newest first.
    async fn fetch_projects(&self) -> Result<Vec<Project>>;

    async fn fetch_project(&self, id: Uuid) -> Result<Option<Project>>;

    async fn add_project(&self, project: &Project) -> Result<()>;

    /// Merge the patch over the stored record, refresh its `updated_at`, and
    /// return the result. Unknown ids fail with
    /// [`RepositoryError::ProjectNotFound`].
    async fn update_project(&self, id: Uuid, patch: &UpdateProject) -> Result<Project>;

    /// Delete the project and the tasks it owns. Unknown ids fail with
    /// [`RepositoryError::ProjectNotFound`].
    async fn delete_project(&self, id: Uuid) -> Result<()>;

    /// Whether a project with this title exists, compared case-insensitively
    /// on the trimmed title, against the latest committed state.
    async fn exists_by_title(&self, title: &str) -> Result<bool>;
}
