use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, TS, EnumString, Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, TS, EnumString, Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ProjectStatus {
    #[default]
    Idea,
    Planning,
    InProgress,
    Completed,
    OnHold,
}

/// The fixed column set of the board. Columns are display buckets, not
/// persisted entities; item status is derived from the column it occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, TS, EnumString, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum BoardColumn {
    Ideas,
    InProgress,
    Completed,
}

impl BoardColumn {
    /// Display order on the board.
    pub const ALL: [BoardColumn; 3] = [
        BoardColumn::Ideas,
        BoardColumn::InProgress,
        BoardColumn::Completed,
    ];

    pub fn task_status(self) -> TaskStatus {
        match self {
            BoardColumn::Ideas => TaskStatus::Todo,
            BoardColumn::InProgress => TaskStatus::InProgress,
            BoardColumn::Completed => TaskStatus::Done,
        }
    }

    pub fn project_status(self) -> ProjectStatus {
        match self {
            BoardColumn::Ideas => ProjectStatus::Idea,
            BoardColumn::InProgress => ProjectStatus::InProgress,
            BoardColumn::Completed => ProjectStatus::Completed,
        }
    }

    /// The column a task with the given status belongs on.
    pub fn for_task_status(status: TaskStatus) -> BoardColumn {
        match status {
            TaskStatus::Todo => BoardColumn::Ideas,
            TaskStatus::InProgress => BoardColumn::InProgress,
            TaskStatus::Done => BoardColumn::Completed,
        }
    }
}

/// Column identifier as it arrives from clients. Unknown ids stay
/// representable so a stale board view degrades instead of failing.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
pub struct ColumnId(String);

impl ColumnId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn known(&self) -> Option<BoardColumn> {
        self.0.parse().ok()
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<BoardColumn> for ColumnId {
    fn from(column: BoardColumn) -> Self {
        Self(column.to_string())
    }
}

impl From<&str> for ColumnId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Unrecognized columns fall back to todo; the fallback is logged as a
/// data-quality signal rather than treated as success.
pub fn task_status_for_column(column: &ColumnId) -> TaskStatus {
    match column.known() {
        Some(known) => known.task_status(),
        None => {
            tracing::warn!("Unknown column id '{}', falling back to todo", column);
            TaskStatus::Todo
        }
    }
}

pub fn project_status_for_column(column: &ColumnId) -> ProjectStatus {
    match column.known() {
        Some(known) => known.project_status(),
        None => {
            tracing::warn!("Unknown column id '{}', falling back to idea", column);
            ProjectStatus::Idea
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_ids_round_trip() {
        for column in BoardColumn::ALL {
            let id = ColumnId::from(column);
            assert_eq!(id.known(), Some(column));
        }
        assert_eq!("in-progress".parse::<BoardColumn>(), Ok(BoardColumn::InProgress));
        assert!("doing".parse::<BoardColumn>().is_err());
    }

    #[test]
    fn statuses_serialize_kebab_case() {
        assert_eq!(
            serde_json::to_value(TaskStatus::InProgress).unwrap(),
            serde_json::json!("in-progress")
        );
        assert_eq!(
            serde_json::to_value(ProjectStatus::OnHold).unwrap(),
            serde_json::json!("on-hold")
        );
        assert_eq!(
            serde_json::to_value(BoardColumn::Ideas).unwrap(),
            serde_json::json!("ideas")
        );
    }

    #[test]
    fn task_status_derives_from_column() {
        assert_eq!(task_status_for_column(&"ideas".into()), TaskStatus::Todo);
        assert_eq!(
            task_status_for_column(&"in-progress".into()),
            TaskStatus::InProgress
        );
        assert_eq!(task_status_for_column(&"completed".into()), TaskStatus::Done);
    }

    #[test]
    fn unknown_column_falls_back() {
        assert_eq!(task_status_for_column(&"backlog".into()), TaskStatus::Todo);
        assert_eq!(
            project_status_for_column(&"backlog".into()),
            ProjectStatus::Idea
        );
    }

    #[test]
    fn project_status_derives_from_column() {
        assert_eq!(
            project_status_for_column(&"completed".into()),
            ProjectStatus::Completed
        );
        assert_eq!(
            project_status_for_column(&"in-progress".into()),
            ProjectStatus::InProgress
        );
    }
}
