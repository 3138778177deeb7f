use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const EVENT_TASK_CREATED: &str = "task.created";
pub const EVENT_TASK_UPDATED: &str = "task.updated";
pub const EVENT_TASK_MOVED: &str = "task.moved";
pub const EVENT_TASK_DELETED: &str = "task.deleted";

pub const EVENT_PROJECT_CREATED: &str = "project.created";
pub const EVENT_PROJECT_UPDATED: &str = "project.updated";
pub const EVENT_PROJECT_MOVED: &str = "project.moved";
pub const EVENT_PROJECT_DELETED: &str = "project.deleted";

pub const EVENT_BOARD_REORDERED: &str = "board.reordered";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskEventPayload {
    pub task_id: Uuid,
    pub project_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectEventPayload {
    pub project_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum BoardEventPayload {
    Task(TaskEventPayload),
    Project(ProjectEventPayload),
}

/// Notification published after a successful mutation so UI state stores can
/// refresh without polling.
#[derive(Debug, Clone, Serialize)]
pub struct BoardEvent {
    pub name: &'static str,
    pub payload: BoardEventPayload,
}

impl BoardEvent {
    pub fn task(name: &'static str, task_id: Uuid, project_id: Uuid) -> Self {
        Self {
            name,
            payload: BoardEventPayload::Task(TaskEventPayload {
                task_id,
                project_id,
            }),
        }
    }

    pub fn project(name: &'static str, project_id: Uuid) -> Self {
        Self {
            name,
            payload: BoardEventPayload::Project(ProjectEventPayload { project_id }),
        }
    }
}
