/// Repository layer
///
/// One explicit repository trait per entity, injected into the engines as
/// `Arc<dyn …>`. No engine holds a database handle: everything an operation
/// needs from the store is named here, which also makes the engines testable
/// against in-memory fakes.
///
/// The Postgres implementations live in [`pg`]. Single rows come back as
/// `Option`, absent-on-update comes back as `Option` too, and bulk deletes
/// report the number of rows removed.
use async_trait::async_trait;
use uuid::Uuid;

use crate::models::membership::{CreateMembership, MemberStatus, ProjectMember};
use crate::models::project::{CreateProject, Project};
use crate::models::task::{CreateTask, Task, TaskStatus};
use crate::models::user::{CreateUser, UpdateUser, User};

pub mod pg;

/// Error type for repository operations
///
/// Uniqueness and membership conflicts are detected by the engines via
/// find-before-create, so the store surface only reports transport/database
/// failures.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// Underlying database failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Repository result alias
pub type RepoResult<T> = Result<T, RepoError>;

/// Identity store: user rows
#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Creates a user row
    async fn create(&self, data: CreateUser) -> RepoResult<User>;

    /// Point lookup by id
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>>;

    /// Point lookup by email
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// Applies the non-None fields of `data`; None when the user is absent
    async fn update(&self, id: Uuid, data: UpdateUser) -> RepoResult<Option<User>>;

    /// True when another user (excluding `exclude_id`) already owns `email`
    async fn is_email_taken(&self, email: &str, exclude_id: Option<Uuid>) -> RepoResult<bool>;
}

/// Project store
#[async_trait]
pub trait ProjectRepo: Send + Sync {
    /// Creates a project row
    async fn create(&self, data: CreateProject, created_by: Uuid) -> RepoResult<Project>;

    /// Point lookup by id
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Project>>;

    /// Batch lookup, order unspecified
    async fn find_by_ids(&self, ids: &[Uuid]) -> RepoResult<Vec<Project>>;

    /// All projects created by a user
    async fn list_by_creator(&self, creator_id: Uuid) -> RepoResult<Vec<Project>>;

    /// Deletes the project row; true when a row was removed
    async fn delete(&self, id: Uuid) -> RepoResult<bool>;
}

/// Project-member relation store
#[async_trait]
pub trait MembershipRepo: Send + Sync {
    /// Inserts a membership row
    ///
    /// Callers check for an existing `(project_id, user_id)` row first; the
    /// primary key rejects the pair a second time regardless.
    async fn create(&self, data: CreateMembership) -> RepoResult<ProjectMember>;

    /// The membership row for a (project, user) pair, any status
    async fn find(&self, project_id: Uuid, user_id: Uuid) -> RepoResult<Option<ProjectMember>>;

    /// Sets the lifecycle status; None when no row exists
    async fn set_status(
        &self,
        project_id: Uuid,
        user_id: Uuid,
        status: MemberStatus,
    ) -> RepoResult<Option<ProjectMember>>;

    /// All membership rows for a project, any status
    async fn list_by_project(&self, project_id: Uuid) -> RepoResult<Vec<ProjectMember>>;

    /// Active membership rows for a project
    async fn list_active_by_project(&self, project_id: Uuid) -> RepoResult<Vec<ProjectMember>>;

    /// Active membership rows for a user across projects
    async fn list_active_by_user(&self, user_id: Uuid) -> RepoResult<Vec<ProjectMember>>;

    /// Removes every membership row for a project; returns rows removed
    async fn delete_by_project(&self, project_id: Uuid) -> RepoResult<u64>;
}

/// Task store
#[async_trait]
pub trait TaskRepo: Send + Sync {
    /// Inserts a task row with an engine-computed column position
    async fn create(&self, data: CreateTask, created_by: Uuid, sort_order: i32)
        -> RepoResult<Task>;

    /// Point lookup by id
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Task>>;

    /// Highest sort_order in a (project, status) column, None when empty
    async fn max_sort_order(
        &self,
        project_id: Uuid,
        status: TaskStatus,
    ) -> RepoResult<Option<i32>>;

    /// All tasks of a project, ascending by sort_order
    async fn list_by_project(&self, project_id: Uuid) -> RepoResult<Vec<Task>>;

    /// Moves a task to a column position; None when the task is absent
    async fn set_column(
        &self,
        id: Uuid,
        status: TaskStatus,
        sort_order: i32,
    ) -> RepoResult<Option<Task>>;

    /// Sets the assignee; None when the task is absent
    async fn set_assignee(&self, id: Uuid, assignee_id: Uuid) -> RepoResult<Option<Task>>;

    /// Removes every task of a project; returns rows removed
    async fn delete_by_project(&self, project_id: Uuid) -> RepoResult<u64>;
}
