/// PostgreSQL repository implementations
///
/// Thin sqlx wrappers over the tables created by the initial migration. Each
/// repository owns a clone of the shared pool; the engines only ever see the
/// traits.
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::membership::{CreateMembership, MemberStatus, ProjectMember};
use crate::models::project::{CreateProject, Project};
use crate::models::task::{CreateTask, Task, TaskStatus};
use crate::models::user::{CreateUser, UpdateUser, User};
use crate::repo::{MembershipRepo, ProjectRepo, RepoResult, TaskRepo, UserRepo};

const USER_COLUMNS: &str =
    "id, name, email, password_hash, role, email_verified, created_at, updated_at";

const PROJECT_COLUMNS: &str = "id, name, description, created_by, created_at, updated_at";

const MEMBER_COLUMNS: &str = "project_id, user_id, role, status, can_create_tasks, \
     can_assign_tasks, created_at, updated_at";

const TASK_COLUMNS: &str = "id, title, description, status, project_id, assigned_to, \
     created_by, sort_order, created_at, updated_at";

/// User rows in Postgres
#[derive(Debug, Clone)]
pub struct PgUserRepo {
    pool: PgPool,
}

impl PgUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn create(&self, data: CreateUser) -> RepoResult<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, password_hash, name, role, email_verified)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.name)
        .bind(data.role)
        .bind(data.email_verified)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update(&self, id: Uuid, data: UpdateUser) -> RepoResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                password_hash = COALESCE($3, password_hash),
                email_verified = COALESCE($4, email_verified),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(data.name)
        .bind(data.password_hash)
        .bind(data.email_verified)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn is_email_taken(&self, email: &str, exclude_id: Option<Uuid>) -> RepoResult<bool> {
        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM users
                WHERE email = $1 AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(email)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(taken)
    }
}

/// Project rows in Postgres
#[derive(Debug, Clone)]
pub struct PgProjectRepo {
    pool: PgPool,
}

impl PgProjectRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectRepo for PgProjectRepo {
    async fn create(&self, data: CreateProject, created_by: Uuid) -> RepoResult<Project> {
        let project = sqlx::query_as::<_, Project>(&format!(
            r#"
            INSERT INTO projects (name, description, created_by)
            VALUES ($1, $2, $3)
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(data.name)
        .bind(data.description)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(project)
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> RepoResult<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    async fn list_by_creator(&self, creator_id: Uuid) -> RepoResult<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(&format!(
            r#"
            SELECT {PROJECT_COLUMNS} FROM projects
            WHERE created_by = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(creator_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    async fn delete(&self, id: Uuid) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Membership rows in Postgres
#[derive(Debug, Clone)]
pub struct PgMembershipRepo {
    pool: PgPool,
}

impl PgMembershipRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipRepo for PgMembershipRepo {
    async fn create(&self, data: CreateMembership) -> RepoResult<ProjectMember> {
        let member = sqlx::query_as::<_, ProjectMember>(&format!(
            r#"
            INSERT INTO project_members (project_id, user_id, role, status)
            VALUES ($1, $2, $3, $4)
            RETURNING {MEMBER_COLUMNS}
            "#
        ))
        .bind(data.project_id)
        .bind(data.user_id)
        .bind(data.role)
        .bind(data.status)
        .fetch_one(&self.pool)
        .await?;

        Ok(member)
    }

    async fn find(&self, project_id: Uuid, user_id: Uuid) -> RepoResult<Option<ProjectMember>> {
        let member = sqlx::query_as::<_, ProjectMember>(&format!(
            r#"
            SELECT {MEMBER_COLUMNS} FROM project_members
            WHERE project_id = $1 AND user_id = $2
            "#
        ))
        .bind(project_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(member)
    }

    async fn set_status(
        &self,
        project_id: Uuid,
        user_id: Uuid,
        status: MemberStatus,
    ) -> RepoResult<Option<ProjectMember>> {
        let member = sqlx::query_as::<_, ProjectMember>(&format!(
            r#"
            UPDATE project_members
            SET status = $3, updated_at = NOW()
            WHERE project_id = $1 AND user_id = $2
            RETURNING {MEMBER_COLUMNS}
            "#
        ))
        .bind(project_id)
        .bind(user_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(member)
    }

    async fn list_by_project(&self, project_id: Uuid) -> RepoResult<Vec<ProjectMember>> {
        let members = sqlx::query_as::<_, ProjectMember>(&format!(
            r#"
            SELECT {MEMBER_COLUMNS} FROM project_members
            WHERE project_id = $1
            ORDER BY created_at ASC
            "#
        ))
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }

    async fn list_active_by_project(&self, project_id: Uuid) -> RepoResult<Vec<ProjectMember>> {
        let members = sqlx::query_as::<_, ProjectMember>(&format!(
            r#"
            SELECT {MEMBER_COLUMNS} FROM project_members
            WHERE project_id = $1 AND status = 'active'
            ORDER BY created_at ASC
            "#
        ))
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }

    async fn list_active_by_user(&self, user_id: Uuid) -> RepoResult<Vec<ProjectMember>> {
        let members = sqlx::query_as::<_, ProjectMember>(&format!(
            r#"
            SELECT {MEMBER_COLUMNS} FROM project_members
            WHERE user_id = $1 AND status = 'active'
            ORDER BY created_at ASC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }

    async fn delete_by_project(&self, project_id: Uuid) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM project_members WHERE project_id = $1")
            .bind(project_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

/// Task rows in Postgres
#[derive(Debug, Clone)]
pub struct PgTaskRepo {
    pool: PgPool,
}

impl PgTaskRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepo for PgTaskRepo {
    async fn create(
        &self,
        data: CreateTask,
        created_by: Uuid,
        sort_order: i32,
    ) -> RepoResult<Task> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks (title, description, status, project_id, assigned_to,
                               created_by, sort_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.project_id)
        .bind(data.assigned_to)
        .bind(created_by)
        .bind(sort_order)
        .fetch_one(&self.pool)
        .await?;

        Ok(task)
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn max_sort_order(
        &self,
        project_id: Uuid,
        status: TaskStatus,
    ) -> RepoResult<Option<i32>> {
        let max: Option<i32> = sqlx::query_scalar(
            "SELECT MAX(sort_order) FROM tasks WHERE project_id = $1 AND status = $2",
        )
        .bind(project_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok(max)
    }

    async fn list_by_project(&self, project_id: Uuid) -> RepoResult<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS} FROM tasks
            WHERE project_id = $1
            ORDER BY sort_order ASC
            "#
        ))
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    async fn set_column(
        &self,
        id: Uuid,
        status: TaskStatus,
        sort_order: i32,
    ) -> RepoResult<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            UPDATE tasks
            SET status = $2, sort_order = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .bind(sort_order)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn set_assignee(&self, id: Uuid, assignee_id: Uuid) -> RepoResult<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            UPDATE tasks
            SET assigned_to = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(assignee_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn delete_by_project(&self, project_id: Uuid) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM tasks WHERE project_id = $1")
            .bind(project_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
