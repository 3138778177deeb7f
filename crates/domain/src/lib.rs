pub mod events;
pub mod models;
pub mod types;

pub use types::{BoardColumn, ColumnId, ProjectStatus, TaskStatus};
