use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::types::{ColumnId, TaskStatus, task_status_for_column};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct Task {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// Derived from `column_id`; never set independently of an add or move.
    pub status: TaskStatus,
    pub column_id: ColumnId,
    /// Zero-based position within the column, assigned by the ordering
    /// primitives; contiguous per column after every mutation.
    pub order: u32,
    #[ts(type = "Date")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "Date")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateTask {
    pub column_id: ColumnId,
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl Task {
    pub fn new(project_id: Uuid, data: &CreateTask, id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id,
            project_id,
            title: data.title.trim().to_string(),
            description: data
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(String::from),
            status: task_status_for_column(&data.column_id),
            column_id: data.column_id.clone(),
            order: 0,
            created_at: now,
            updated_at: now,
        }
    }
}
