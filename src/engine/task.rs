/// Task engine
///
/// Owns the per-project task lifecycle: creation into a status column,
/// per-column ordering, assignment, and the project deletion cascade.
///
/// # Column ordering
///
/// Within a `(project_id, status)` column, a task's `sort_order` is computed
/// as the column's current maximum plus one (0 for an empty column), both on
/// creation and on every move. Sibling tasks are never reordered: a move into
/// the same column still appends at the end. The read-max/write-max+1
/// sequence is not atomic, so two concurrent writers on the same column can
/// produce duplicate `sort_order` values — a known, accepted race; the value
/// is monotonically increasing only for sequential writers.
use std::collections::HashMap;
use std::sync::Arc;

use futures::future::try_join;
use tracing::{info, warn};
use uuid::Uuid;

use crate::engine::membership::MembershipEngine;
use crate::error::{CoreError, CoreResult};
use crate::models::task::{CreateTask, Task, TaskStatus, TaskWithAssignee};
use crate::models::user::UserSnapshot;
use crate::repo::{MembershipRepo, ProjectRepo, TaskRepo, UserRepo};

/// Result of a project deletion cascade
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CascadeSummary {
    /// Task rows removed
    pub tasks_deleted: u64,

    /// Membership rows removed
    pub members_deleted: u64,

    /// Whether the project row itself was removed
    pub project_deleted: bool,
}

/// Task lifecycle, ordering, assignment, and cascade deletion
#[derive(Clone)]
pub struct TaskEngine {
    tasks: Arc<dyn TaskRepo>,
    users: Arc<dyn UserRepo>,
    projects: Arc<dyn ProjectRepo>,
    members: Arc<dyn MembershipRepo>,
    membership: MembershipEngine,
}

impl TaskEngine {
    pub fn new(
        tasks: Arc<dyn TaskRepo>,
        users: Arc<dyn UserRepo>,
        projects: Arc<dyn ProjectRepo>,
        members: Arc<dyn MembershipRepo>,
        membership: MembershipEngine,
    ) -> Self {
        Self {
            tasks,
            users,
            projects,
            members,
            membership,
        }
    }

    /// Creates a task in a status column of a project
    ///
    /// Requires an active membership for the requester. The stored
    /// `can_create_tasks` permission flag is intentionally not consulted:
    /// any active member may create tasks regardless of the flag, matching
    /// observed production behavior. A pre-assigned `assigned_to` is stored
    /// as given; only [`Self::assign`] validates assignees.
    ///
    /// # Errors
    ///
    /// Forbidden when the requester has no active membership in the project.
    pub async fn create(&self, data: CreateTask, requester_id: Uuid) -> CoreResult<Task> {
        self.membership
            .require_active_member(data.project_id, requester_id)
            .await?;

        let next_order = self.next_sort_order(data.project_id, data.status).await?;

        let task = self.tasks.create(data, requester_id, next_order).await?;

        info!(
            task_id = %task.id,
            project_id = %task.project_id,
            status = task.status.as_str(),
            sort_order = task.sort_order,
            "Task created"
        );

        Ok(task)
    }

    /// Lists a project's tasks ascending by column position, each enriched
    /// with a snapshot of its assignee (None when unassigned)
    ///
    /// # Errors
    ///
    /// Forbidden when the caller has no active membership in the project.
    pub async fn list_by_project(
        &self,
        project_id: Uuid,
        user_id: Uuid,
    ) -> CoreResult<Vec<TaskWithAssignee>> {
        self.membership
            .require_active_member(project_id, user_id)
            .await?;

        let tasks = self.tasks.list_by_project(project_id).await?;

        // Resolve each distinct assignee once, then project the snapshot
        let mut snapshots: HashMap<Uuid, UserSnapshot> = HashMap::new();
        for task in &tasks {
            if let Some(assignee_id) = task.assigned_to {
                if !snapshots.contains_key(&assignee_id) {
                    if let Some(user) = self.users.find_by_id(assignee_id).await? {
                        snapshots.insert(assignee_id, UserSnapshot::from(&user));
                    }
                }
            }
        }

        Ok(tasks
            .into_iter()
            .map(|task| {
                let assigned_user = task.assigned_to.and_then(|id| snapshots.get(&id).cloned());
                TaskWithAssignee {
                    task,
                    assigned_user,
                }
            })
            .collect())
    }

    /// Moves a task to a status column, appending at the end
    ///
    /// The new `sort_order` is recomputed against the target column's
    /// maximum; a move within the task's current column therefore still
    /// appends. No caller identity is taken and no membership is checked —
    /// any valid task id can be moved by any caller. That matches the
    /// observed behavior of the system this replaces and is preserved as-is.
    ///
    /// # Errors
    ///
    /// NotFound when no task with `task_id` exists.
    pub async fn move_to_column(&self, task_id: Uuid, new_status: TaskStatus) -> CoreResult<Task> {
        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| CoreError::NotFound("Task not found".to_string()))?;

        let next_order = self.next_sort_order(task.project_id, new_status).await?;

        let moved = self
            .tasks
            .set_column(task_id, new_status, next_order)
            .await?
            .ok_or_else(|| CoreError::NotFound("Task not found".to_string()))?;

        info!(
            %task_id,
            status = new_status.as_str(),
            sort_order = moved.sort_order,
            "Task moved"
        );

        Ok(moved)
    }

    /// Assigns a task to a member of its project
    ///
    /// # Errors
    ///
    /// - NotFound when the task is absent
    /// - Forbidden when the requester has no active membership in the
    ///   task's project
    /// - InvalidAssignee when the assignee has no active membership in the
    ///   same project (distinct from Forbidden: the caller was allowed,
    ///   the target user is not eligible)
    pub async fn assign(
        &self,
        task_id: Uuid,
        assignee_id: Uuid,
        requester_id: Uuid,
    ) -> CoreResult<Task> {
        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| CoreError::NotFound("Task not found".to_string()))?;

        self.membership
            .require_active_member(task.project_id, requester_id)
            .await?;

        let assignee = self.members.find(task.project_id, assignee_id).await?;
        match assignee {
            Some(m) if m.is_active() => {}
            _ => {
                return Err(CoreError::InvalidAssignee(
                    "The selected user is not an active member of this project".to_string(),
                ))
            }
        }

        let updated = self
            .tasks
            .set_assignee(task_id, assignee_id)
            .await?
            .ok_or_else(|| CoreError::NotFound("Task not found".to_string()))?;

        info!(%task_id, assignee = %assignee_id, "Task assigned");

        Ok(updated)
    }

    /// Deletes a project and everything referencing it
    ///
    /// Requires an active admin membership. Tasks and memberships are
    /// deleted concurrently, then the project row — children before parent,
    /// so a partial failure cannot leave rows pointing at a deleted project.
    /// There is no compensating rollback: a failure after the child
    /// deletions leaves an orphaned project record with no tasks or members,
    /// surfaced as Internal with the earlier deletions standing.
    ///
    /// # Errors
    ///
    /// - NotFound when the project is absent
    /// - Forbidden when the requester is not an active admin of the project
    pub async fn delete_project_cascade(
        &self,
        requester_id: Uuid,
        project_id: Uuid,
    ) -> CoreResult<CascadeSummary> {
        self.projects
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| CoreError::NotFound("Project not found".to_string()))?;

        self.membership
            .require_active_admin(project_id, requester_id)
            .await?;

        let (tasks_deleted, members_deleted) = try_join(
            self.tasks.delete_by_project(project_id),
            self.members.delete_by_project(project_id),
        )
        .await?;

        let project_deleted = self.projects.delete(project_id).await.map_err(|e| {
            warn!(
                %project_id,
                tasks_deleted,
                members_deleted,
                "Cascade failed after child deletions; project row remains"
            );
            e
        })?;

        info!(
            %project_id,
            tasks_deleted,
            members_deleted,
            "Project deleted with cascade"
        );

        Ok(CascadeSummary {
            tasks_deleted,
            members_deleted,
            project_deleted,
        })
    }

    /// Next append position for a column: max + 1, or 0 when empty
    async fn next_sort_order(&self, project_id: Uuid, status: TaskStatus) -> CoreResult<i32> {
        let max = self.tasks.max_sort_order(project_id, status).await?;
        Ok(max.map_or(0, |m| m + 1))
    }
}
