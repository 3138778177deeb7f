//! Board facade: the one call surface route handlers and UI state stores
//! depend on. Composes the task and project services, serializes writers
//! per board, and publishes a notification after every committed mutation.

use std::sync::Arc;

use dashmap::DashMap;
use domain::events::{
    BoardEvent, EVENT_BOARD_REORDERED, EVENT_PROJECT_CREATED, EVENT_PROJECT_DELETED,
    EVENT_PROJECT_MOVED, EVENT_PROJECT_UPDATED, EVENT_TASK_CREATED, EVENT_TASK_DELETED,
    EVENT_TASK_MOVED, EVENT_TASK_UPDATED,
};
use domain::models::project::{CreateProject, Project, UpdateProject};
use domain::models::task::{CreateTask, Task, UpdateTask};
use domain::types::ColumnId;
use ordering::ColumnMap;
use repos::BoardRepository;
use services::services::config::BoardConfig;
use services::services::project::{ProjectService, ProjectServiceError};
use services::services::task::{TaskService, TaskServiceError};
use thiserror::Error;
use tokio::sync::{Mutex, broadcast};
use uuid::Uuid;

const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error(transparent)]
    Task(#[from] TaskServiceError),
    #[error(transparent)]
    Project(#[from] ProjectServiceError),
}

pub type Result<T> = std::result::Result<T, BoardError>;

/// One writer at a time per board: every task mutation runs its whole
/// fetch-compute-save cycle under the owning project's lock, and project
/// mutations serialize through a single project-table lock. Callers that use
/// the services directly bypass this and must serialize themselves.
#[derive(Clone)]
pub struct Board {
    tasks: TaskService,
    projects: ProjectService,
    board_locks: Arc<DashMap<Uuid, Arc<Mutex<()>>>>,
    project_lock: Arc<Mutex<()>>,
    events: broadcast::Sender<BoardEvent>,
}

impl Board {
    pub fn new(repository: Arc<dyn BoardRepository>, config: BoardConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            tasks: TaskService::new(repository.clone(), config),
            projects: ProjectService::new(repository),
            board_locks: Arc::new(DashMap::new()),
            project_lock: Arc::new(Mutex::new(())),
            events,
        }
    }

    /// Mutations publish a [`BoardEvent`] here after committing. Slow or
    /// absent subscribers never fail a mutation.
    pub fn subscribe(&self) -> broadcast::Receiver<BoardEvent> {
        self.events.subscribe()
    }

    fn board_lock(&self, project_id: Uuid) -> Arc<Mutex<()>> {
        self.board_locks
            .entry(project_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn publish(&self, event: BoardEvent) {
        // A send error only means nobody is subscribed right now.
        let _ = self.events.send(event);
    }

    pub async fn create_project(&self, data: CreateProject) -> Result<Project> {
        let _guard = self.project_lock.lock().await;
        let project = self.projects.create_project(data).await?;
        self.publish(BoardEvent::project(EVENT_PROJECT_CREATED, project.id));
        Ok(project)
    }

    pub async fn get_projects(&self) -> Result<Vec<Project>> {
        Ok(self.projects.get_projects().await?)
    }

    pub async fn get_project(&self, id: Uuid) -> Result<Project> {
        Ok(self.projects.get_project(id).await?)
    }

    pub async fn update_project(&self, id: Uuid, payload: UpdateProject) -> Result<Project> {
        let _guard = self.project_lock.lock().await;
        let project = self.projects.update_project(id, payload).await?;
        self.publish(BoardEvent::project(EVENT_PROJECT_UPDATED, id));
        Ok(project)
    }

    pub async fn move_project(&self, id: Uuid, column: &ColumnId) -> Result<Project> {
        let _guard = self.project_lock.lock().await;
        let project = self.projects.move_project(id, column).await?;
        self.publish(BoardEvent::project(EVENT_PROJECT_MOVED, id));
        Ok(project)
    }

    pub async fn delete_project(&self, id: Uuid) -> Result<()> {
        let _guard = self.project_lock.lock().await;
        self.projects.delete_project(id).await?;
        self.board_locks.remove(&id);
        self.publish(BoardEvent::project(EVENT_PROJECT_DELETED, id));
        Ok(())
    }

    pub async fn get_board(&self, project_id: Uuid) -> Result<ColumnMap> {
        Ok(self.tasks.get_board(project_id).await?)
    }

    pub async fn add_task(&self, project_id: Uuid, data: CreateTask) -> Result<Task> {
        let lock = self.board_lock(project_id);
        let _guard = lock.lock().await;
        let task = self.tasks.add_task(project_id, data).await?;
        self.publish(BoardEvent::task(EVENT_TASK_CREATED, task.id, project_id));
        Ok(task)
    }

    pub async fn move_task(
        &self,
        project_id: Uuid,
        from: &ColumnId,
        to: &ColumnId,
        from_index: usize,
        to_index: usize,
    ) -> Result<Task> {
        let lock = self.board_lock(project_id);
        let _guard = lock.lock().await;
        let task = self
            .tasks
            .move_task(project_id, from, to, from_index, to_index)
            .await?;
        self.publish(BoardEvent::task(EVENT_TASK_MOVED, task.id, project_id));
        Ok(task)
    }

    pub async fn update_task(
        &self,
        project_id: Uuid,
        id: Uuid,
        column_id: &ColumnId,
        updates: UpdateTask,
    ) -> Result<Task> {
        let lock = self.board_lock(project_id);
        let _guard = lock.lock().await;
        let task = self
            .tasks
            .update_task(project_id, id, column_id, updates)
            .await?;
        self.publish(BoardEvent::task(EVENT_TASK_UPDATED, id, project_id));
        Ok(task)
    }

    pub async fn delete_task(
        &self,
        project_id: Uuid,
        id: Uuid,
        column_id: &ColumnId,
    ) -> Result<()> {
        let lock = self.board_lock(project_id);
        let _guard = lock.lock().await;
        self.tasks.delete_task(project_id, id, column_id).await?;
        self.publish(BoardEvent::task(EVENT_TASK_DELETED, id, project_id));
        Ok(())
    }

    pub async fn reorder_column(
        &self,
        project_id: Uuid,
        column_id: &ColumnId,
        ordered_ids: &[Uuid],
    ) -> Result<()> {
        let lock = self.board_lock(project_id);
        let _guard = lock.lock().await;
        self.tasks
            .reorder_column(project_id, column_id, ordered_ids)
            .await?;
        self.publish(BoardEvent::project(EVENT_BOARD_REORDERED, project_id));
        Ok(())
    }
}
