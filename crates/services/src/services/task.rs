use std::sync::Arc;

use chrono::Utc;
use domain::models::task::{CreateTask, Task, UpdateTask};
use domain::types::{ColumnId, task_status_for_column};
use ordering::{ColumnMap, OrderingError};
use repos::{BoardRepository, RepositoryError};
use thiserror::Error;
use uuid::Uuid;

use super::config::BoardConfig;

#[derive(Debug, Error)]
pub enum TaskServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("Task not found: {0}")]
    TaskNotFound(Uuid),
    #[error(transparent)]
    Ordering(#[from] OrderingError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type Result<T> = std::result::Result<T, TaskServiceError>;

/// Orchestrates task mutations for one project board: derives status from
/// the column, keeps `order` contiguous, and persists through the injected
/// repository. Every operation is a single fetch, compute, save cycle;
/// serializing concurrent writers is the caller's responsibility.
#[derive(Clone)]
pub struct TaskService {
    repository: Arc<dyn BoardRepository>,
    config: BoardConfig,
}

fn locate(columns: &ColumnMap, id: Uuid) -> Option<(ColumnId, usize)> {
    columns.iter().find_map(|(column, items)| {
        items
            .iter()
            .position(|task| task.id == id)
            .map(|index| (column.clone(), index))
    })
}

fn take_column(columns: &mut ColumnMap, column_id: &ColumnId) -> ColumnMap {
    let mut changed = ColumnMap::new();
    if let Some(items) = columns.remove(column_id) {
        changed.insert(column_id.clone(), items);
    }
    changed
}

impl TaskService {
    pub fn new(repository: Arc<dyn BoardRepository>, config: BoardConfig) -> Self {
        Self { repository, config }
    }

    /// The project's tasks bucketed into columns, each sorted by `order`.
    pub async fn get_board(&self, project_id: Uuid) -> Result<ColumnMap> {
        let tasks = self.repository.fetch_tasks_for_project(project_id).await?;
        Ok(ordering::bucket_by_column(tasks))
    }

    pub async fn add_task(&self, project_id: Uuid, data: CreateTask) -> Result<Task> {
        if data.title.trim().is_empty() {
            return Err(TaskServiceError::Validation(
                "Task title must not be empty".to_string(),
            ));
        }

        let mut columns = self.get_board(project_id).await?;
        let id = Uuid::new_v4();
        tracing::debug!(
            "Creating task '{}' in column '{}' of project {}",
            data.title.trim(),
            data.column_id,
            project_id
        );

        let mut task = Task::new(project_id, &data, id);
        task.order = ordering::add_to_column(&mut columns, &data.column_id, task.clone())?;

        let changed = take_column(&mut columns, &data.column_id);
        self.repository.save_tasks(project_id, &changed).await?;
        Ok(task)
    }

    /// Move the task at `from_index` to `to_index`, recomputing its status on
    /// a cross-column move and restoring contiguous `order` in both columns.
    /// Indices refer to the state the caller last fetched; a stale view
    /// surfaces as `IndexOutOfRange` rather than a silent misplacement.
    pub async fn move_task(
        &self,
        project_id: Uuid,
        from: &ColumnId,
        to: &ColumnId,
        from_index: usize,
        to_index: usize,
    ) -> Result<Task> {
        let mut columns = self.get_board(project_id).await?;
        let landed = ordering::move_between_columns(&mut columns, from, to, from_index, to_index)?;

        let moved_id = {
            let dest = columns
                .get_mut(to)
                .ok_or_else(|| OrderingError::UnknownColumn(to.clone()))?;
            let len = dest.len();
            let task = dest.get_mut(landed).ok_or(OrderingError::IndexOutOfRange {
                column: to.clone(),
                index: landed,
                len,
            })?;
            if from != to {
                task.status = task_status_for_column(to);
            }
            task.updated_at = Utc::now();
            task.id
        };

        for column in [from, to] {
            if let Some(items) = columns.get_mut(column) {
                ordering::reindex_column(items);
            }
        }

        let moved = columns
            .get(to)
            .and_then(|items| items.iter().find(|task| task.id == moved_id))
            .cloned()
            .ok_or(TaskServiceError::TaskNotFound(moved_id))?;

        tracing::debug!(
            "Moved task {} from '{}'[{}] to '{}'[{}]",
            moved.id,
            from,
            from_index,
            to,
            landed
        );
        self.repository.save_tasks(project_id, &columns).await?;
        Ok(moved)
    }

    /// Merge `updates` over the task. The column argument is the caller's
    /// view of where the task lives; the task is found wherever it actually
    /// is, so a stale view updates the right record.
    pub async fn update_task(
        &self,
        project_id: Uuid,
        id: Uuid,
        column_id: &ColumnId,
        updates: UpdateTask,
    ) -> Result<Task> {
        if let Some(title) = &updates.title
            && title.trim().is_empty()
        {
            return Err(TaskServiceError::Validation(
                "Task title must not be empty".to_string(),
            ));
        }

        let mut columns = self.get_board(project_id).await?;
        let (column, index) = locate(&columns, id).ok_or(TaskServiceError::TaskNotFound(id))?;
        if column != *column_id {
            tracing::warn!(
                "Task {} expected in column '{}' but found in '{}'",
                id,
                column_id,
                column
            );
        }

        let updated = {
            let items = columns
                .get_mut(&column)
                .ok_or_else(|| OrderingError::UnknownColumn(column.clone()))?;
            let Some(task) = items.get_mut(index) else {
                return Err(TaskServiceError::TaskNotFound(id));
            };
            if let Some(title) = updates.title {
                task.title = title.trim().to_string();
            }
            if let Some(description) = updates.description {
                let trimmed = description.trim();
                task.description = (!trimmed.is_empty()).then(|| trimmed.to_string());
            }
            task.updated_at = Utc::now();
            task.clone()
        };

        let changed = take_column(&mut columns, &column);
        self.repository.save_tasks(project_id, &changed).await?;
        Ok(updated)
    }

    /// Remove the task and reindex the remaining items of its column.
    pub async fn delete_task(&self, project_id: Uuid, id: Uuid, column_id: &ColumnId) -> Result<()> {
        let mut columns = self.get_board(project_id).await?;
        let (column, index) = locate(&columns, id).ok_or(TaskServiceError::TaskNotFound(id))?;
        if column != *column_id {
            tracing::warn!(
                "Task {} expected in column '{}' but found in '{}'",
                id,
                column_id,
                column
            );
        }

        if let Some(items) = columns.get_mut(&column) {
            items.remove(index);
            ordering::reindex_column(items);
        }

        tracing::debug!("Deleted task {} from column '{}'", id, column);
        let changed = take_column(&mut columns, &column);
        self.repository.save_tasks(project_id, &changed).await?;
        Ok(())
    }

    /// Rewrite a column's order to match the given id sequence. Ids missing
    /// from the column are dropped with a warning, or rejected outright when
    /// `strict_reorder` is set; ids the sequence leaves out keep their prior
    /// relative order at the tail.
    pub async fn reorder_column(
        &self,
        project_id: Uuid,
        column_id: &ColumnId,
        ordered_ids: &[Uuid],
    ) -> Result<()> {
        let mut columns = self.get_board(project_id).await?;
        let missing = ordering::sequence_column(&mut columns, column_id, ordered_ids)?;
        if !missing.is_empty() {
            if self.config.strict_reorder {
                return Err(TaskServiceError::Validation(format!(
                    "Reorder names {} task id(s) not present in column '{}'",
                    missing.len(),
                    column_id
                )));
            }
            tracing::warn!(
                "Dropping {} unknown task id(s) from reorder of column '{}'",
                missing.len(),
                column_id
            );
        }

        let changed = take_column(&mut columns, column_id);
        self.repository.save_tasks(project_id, &changed).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    use domain::models::project::{CreateProject, Project};
    use domain::types::TaskStatus;
    use repos::memory::MemoryRepository;

    use super::*;

    struct CountingRepository {
        inner: MemoryRepository,
        saves: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl BoardRepository for CountingRepository {
        async fn fetch_tasks_for_project(&self, project_id: Uuid) -> repos::Result<Vec<Task>> {
            self.inner.fetch_tasks_for_project(project_id).await
        }

        async fn save_tasks(&self, project_id: Uuid, columns: &ColumnMap) -> repos::Result<()> {
            self.saves.fetch_add(1, AtomicOrdering::SeqCst);
            self.inner.save_tasks(project_id, columns).await
        }

        async fn fetch_projects(&self) -> repos::Result<Vec<Project>> {
            self.inner.fetch_projects().await
        }

        async fn fetch_project(&self, id: Uuid) -> repos::Result<Option<Project>> {
            self.inner.fetch_project(id).await
        }

        async fn add_project(&self, project: &Project) -> repos::Result<()> {
            self.inner.add_project(project).await
        }

        async fn update_project(
            &self,
            id: Uuid,
            patch: &domain::models::project::UpdateProject,
        ) -> repos::Result<Project> {
            self.inner.update_project(id, patch).await
        }

        async fn delete_project(&self, id: Uuid) -> repos::Result<()> {
            self.inner.delete_project(id).await
        }

        async fn exists_by_title(&self, title: &str) -> repos::Result<bool> {
            self.inner.exists_by_title(title).await
        }
    }

    async fn seeded_repo() -> (Arc<MemoryRepository>, Uuid) {
        let repo = Arc::new(MemoryRepository::new());
        let project = Project::new(
            &CreateProject {
                title: "Portfolio".to_string(),
                description: None,
                technologies: vec![],
                tags: vec![],
            },
            Uuid::new_v4(),
        );
        let id = project.id;
        repo.insert_project(project).await;
        (repo, id)
    }

    fn service(repo: Arc<MemoryRepository>) -> TaskService {
        TaskService::new(repo, BoardConfig::default())
    }

    fn create(column: &str, title: &str) -> CreateTask {
        CreateTask {
            column_id: column.into(),
            title: title.to_string(),
            description: None,
        }
    }

    fn column<'a>(board: &'a ColumnMap, id: &str) -> &'a [Task] {
        &board[&ColumnId::from(id)]
    }

    fn assert_contiguous(columns: &ColumnMap) {
        for (column, items) in columns {
            let orders: Vec<u32> = items.iter().map(|t| t.order).collect();
            let expected: Vec<u32> = (0..items.len() as u32).collect();
            assert_eq!(orders, expected, "column '{column}' is not contiguous");
        }
    }

    #[tokio::test]
    async fn add_task_derives_status_and_appends() {
        let (repo, project_id) = seeded_repo().await;
        let service = service(repo);

        let first = service
            .add_task(project_id, create("completed", "X"))
            .await
            .unwrap();
        let second = service
            .add_task(project_id, create("completed", "Y"))
            .await
            .unwrap();

        assert_eq!(first.status, TaskStatus::Done);
        assert_eq!(first.order, 0);
        assert_eq!(second.order, 1);

        let board = service.get_board(project_id).await.unwrap();
        assert_eq!(column(&board, "completed").len(), 2);
        assert_contiguous(&board);
    }

    #[tokio::test]
    async fn blank_title_is_rejected_without_a_write() {
        let counting = Arc::new(CountingRepository {
            inner: MemoryRepository::new(),
            saves: AtomicUsize::new(0),
        });
        let service = TaskService::new(counting.clone(), BoardConfig::default());

        let result = service
            .add_task(Uuid::new_v4(), create("ideas", "   "))
            .await;

        assert!(matches!(result, Err(TaskServiceError::Validation(_))));
        assert_eq!(counting.saves.load(AtomicOrdering::SeqCst), 0);
    }

    #[tokio::test]
    async fn move_across_columns_recomputes_status_and_orders() {
        let (repo, project_id) = seeded_repo().await;
        let service = service(repo);
        let t1 = service
            .add_task(project_id, create("ideas", "T1"))
            .await
            .unwrap();
        service
            .add_task(project_id, create("ideas", "T2"))
            .await
            .unwrap();

        let moved = service
            .move_task(project_id, &"ideas".into(), &"completed".into(), 0, 0)
            .await
            .unwrap();

        assert_eq!(moved.id, t1.id);
        assert_eq!(moved.status, TaskStatus::Done);
        assert_eq!(moved.order, 0);
        assert!(moved.updated_at >= t1.updated_at);

        let board = service.get_board(project_id).await.unwrap();
        let ideas = column(&board, "ideas");
        let completed = column(&board, "completed");
        assert_eq!(ideas.len(), 1);
        assert_eq!(ideas[0].title, "T2");
        assert_eq!(ideas[0].order, 0);
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].title, "T1");
        assert_contiguous(&board);
    }

    #[tokio::test]
    async fn noop_move_changes_nothing() {
        let (repo, project_id) = seeded_repo().await;
        let service = service(repo);
        for title in ["a", "b", "c"] {
            service
                .add_task(project_id, create("ideas", title))
                .await
                .unwrap();
        }
        let snapshot = service.get_board(project_id).await.unwrap();
        let before: Vec<(Uuid, u32)> = column(&snapshot, "ideas")
            .iter()
            .map(|t| (t.id, t.order))
            .collect();

        service
            .move_task(project_id, &"ideas".into(), &"ideas".into(), 1, 1)
            .await
            .unwrap();

        let snapshot = service.get_board(project_id).await.unwrap();
        let after: Vec<(Uuid, u32)> = column(&snapshot, "ideas")
            .iter()
            .map(|t| (t.id, t.order))
            .collect();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn move_with_stale_index_fails() {
        let (repo, project_id) = seeded_repo().await;
        let service = service(repo);
        service
            .add_task(project_id, create("ideas", "only"))
            .await
            .unwrap();

        let result = service
            .move_task(project_id, &"ideas".into(), &"completed".into(), 3, 0)
            .await;

        assert!(matches!(
            result,
            Err(TaskServiceError::Ordering(OrderingError::IndexOutOfRange { .. }))
        ));
    }

    #[tokio::test]
    async fn delete_reindexes_the_column() {
        let (repo, project_id) = seeded_repo().await;
        let service = service(repo);
        let mut ids = Vec::new();
        for title in ["a", "b", "c"] {
            ids.push(
                service
                    .add_task(project_id, create("ideas", title))
                    .await
                    .unwrap()
                    .id,
            );
        }

        service
            .delete_task(project_id, ids[1], &"ideas".into())
            .await
            .unwrap();

        let board = service.get_board(project_id).await.unwrap();
        let ideas = column(&board, "ideas");
        let titles: Vec<&str> = ideas.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "c"]);
        assert_eq!(ideas.iter().map(|t| t.order).collect::<Vec<_>>(), vec![0, 1]);
    }

    #[tokio::test]
    async fn update_merges_and_finds_mislocated_tasks() {
        let (repo, project_id) = seeded_repo().await;
        let service = service(repo);
        let task = service
            .add_task(project_id, create("ideas", "draft"))
            .await
            .unwrap();

        let updated = service
            .update_task(
                project_id,
                task.id,
                &"completed".into(),
                UpdateTask {
                    title: Some("  final  ".to_string()),
                    description: Some("notes".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "final");
        assert_eq!(updated.description.as_deref(), Some("notes"));
        assert_eq!(updated.column_id, ColumnId::from("ideas"));

        let missing = service
            .update_task(project_id, Uuid::new_v4(), &"ideas".into(), UpdateTask::default())
            .await;
        assert!(matches!(missing, Err(TaskServiceError::TaskNotFound(_))));
    }

    #[tokio::test]
    async fn reorder_applies_permutation_and_drops_strangers() {
        let (repo, project_id) = seeded_repo().await;
        let service = service(repo);
        let mut ids = Vec::new();
        for title in ["a", "b", "c"] {
            ids.push(
                service
                    .add_task(project_id, create("ideas", title))
                    .await
                    .unwrap()
                    .id,
            );
        }

        service
            .reorder_column(
                project_id,
                &"ideas".into(),
                &[ids[2], ids[0], Uuid::new_v4(), ids[1]],
            )
            .await
            .unwrap();

        let board = service.get_board(project_id).await.unwrap();
        let titles: Vec<&str> = column(&board, "ideas")
            .iter()
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(titles, vec!["c", "a", "b"]);
        assert_contiguous(&board);
    }

    #[tokio::test]
    async fn strict_reorder_rejects_unknown_ids_before_writing() {
        let (repo, project_id) = seeded_repo().await;
        let service = TaskService::new(
            repo.clone(),
            BoardConfig {
                strict_reorder: true,
            },
        );
        let task = service
            .add_task(project_id, create("ideas", "a"))
            .await
            .unwrap();

        let result = service
            .reorder_column(project_id, &"ideas".into(), &[Uuid::new_v4(), task.id])
            .await;

        assert!(matches!(result, Err(TaskServiceError::Validation(_))));
        let board = service.get_board(project_id).await.unwrap();
        assert_eq!(column(&board, "ideas")[0].id, task.id);
        assert_eq!(column(&board, "ideas")[0].order, 0);
    }

    #[tokio::test]
    async fn contiguity_survives_a_mixed_mutation_sequence() {
        let (repo, project_id) = seeded_repo().await;
        let service = service(repo);
        let mut ids = Vec::new();
        for title in ["a", "b", "c", "d"] {
            ids.push(
                service
                    .add_task(project_id, create("ideas", title))
                    .await
                    .unwrap()
                    .id,
            );
        }

        service
            .move_task(project_id, &"ideas".into(), &"in-progress".into(), 1, 0)
            .await
            .unwrap();
        service
            .move_task(project_id, &"in-progress".into(), &"completed".into(), 0, 0)
            .await
            .unwrap();
        service
            .delete_task(project_id, ids[0], &"ideas".into())
            .await
            .unwrap();
        service
            .move_task(project_id, &"ideas".into(), &"ideas".into(), 0, 1)
            .await
            .unwrap();

        let board = service.get_board(project_id).await.unwrap();
        assert_contiguous(&board);
        let total: usize = board.values().map(Vec::len).sum();
        assert_eq!(total, 4);
    }
}
