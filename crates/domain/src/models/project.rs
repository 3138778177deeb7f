use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::task::Task;
use crate::types::ProjectStatus;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub technologies: Vec<String>,
    pub tags: Vec<String>,
    /// Tasks are owned by the project; their whole lifecycle is scoped to it.
    pub tasks: Vec<Task>,
    #[ts(type = "Date")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "Date")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateProject {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct UpdateProject {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub technologies: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

impl Project {
    pub fn new(data: &CreateProject, id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id,
            title: data.title.trim().to_string(),
            description: data
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(String::from),
            status: ProjectStatus::default(),
            technologies: data.technologies.clone(),
            tags: data.tags.clone(),
            tasks: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}
