/// Task model
///
/// Tasks live in one of three kanban status columns per project. Within a
/// `(project_id, status)` column, `sort_order` establishes display order: new
/// and moved tasks append at `max + 1` (0 for an empty column), so values are
/// monotonically increasing but not necessarily contiguous after moves.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::UserSnapshot;

/// Kanban status column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Backlog column
    Todo,

    /// Work in progress
    InProgress,

    /// Completed
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "inprogress",
            TaskStatus::Done => "done",
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Todo
    }
}

/// A task row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID (UUID v4)
    pub id: Uuid,

    /// Short title (optional)
    pub title: Option<String>,

    /// Task description (required)
    pub description: String,

    /// Status column the task sits in
    pub status: TaskStatus,

    /// Owning project
    pub project_id: Uuid,

    /// Assigned member, None when unassigned
    pub assigned_to: Option<Uuid>,

    /// Member who created the task
    pub created_by: Uuid,

    /// Display position within the (project_id, status) column
    pub sort_order: i32,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Short title (optional)
    pub title: Option<String>,

    /// Task description
    pub description: String,

    /// Target status column
    #[serde(default)]
    pub status: TaskStatus,

    /// Owning project
    pub project_id: Uuid,

    /// Pre-assigned member, None for unassigned
    pub assigned_to: Option<Uuid>,
}

/// A task enriched with a snapshot of its assignee
///
/// This is the shape returned by project task listings: the task row plus a
/// denormalized `{id, name, email, role}` of the assigned user, or None when
/// unassigned. The snapshot reflects store state at read time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskWithAssignee {
    /// The task row
    #[serde(flatten)]
    pub task: Task,

    /// Assignee profile snapshot, None when unassigned
    pub assigned_user: Option<UserSnapshot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_strings() {
        assert_eq!(TaskStatus::Todo.as_str(), "todo");
        assert_eq!(TaskStatus::InProgress.as_str(), "inprogress");
        assert_eq!(TaskStatus::Done.as_str(), "done");
    }

    #[test]
    fn test_status_default_is_todo() {
        assert_eq!(TaskStatus::default(), TaskStatus::Todo);
    }

    #[test]
    fn test_status_serde_tags() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"inprogress\""
        );
        let parsed: TaskStatus = serde_json::from_str("\"done\"").unwrap();
        assert_eq!(parsed, TaskStatus::Done);
    }
}
