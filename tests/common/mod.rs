//! Common test utilities for integration tests
//!
//! Provides in-memory implementations of the repository traits, a recording
//! mailer, and a `TestContext` that wires every engine against them, so the
//! full flows run without a database or SMTP relay.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use taskboard::auth::password::hash_password;
use taskboard::auth::project_token::ProjectTokenService;
use taskboard::email::{EmailError, EmailSender};
use taskboard::engine::invite::InvitationService;
use taskboard::engine::membership::MembershipEngine;
use taskboard::engine::project::ProjectService;
use taskboard::engine::task::TaskEngine;
use taskboard::engine::views::ViewService;
use taskboard::models::membership::{CreateMembership, MemberRole, MemberStatus, ProjectMember};
use taskboard::models::project::{CreateProject, Project};
use taskboard::models::task::{CreateTask, Task, TaskStatus};
use taskboard::models::user::{CreateUser, UpdateUser, User, UserRole};
use taskboard::repo::{
    MembershipRepo, ProjectRepo, RepoResult, TaskRepo, UserRepo,
};

pub const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";
pub const BASE_URL: &str = "https://taskboard.test";

/// In-memory user store
#[derive(Default)]
pub struct InMemoryUsers {
    rows: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepo for InMemoryUsers {
    async fn create(&self, data: CreateUser) -> RepoResult<User> {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: data.name,
            email: data.email,
            password_hash: data.password_hash,
            role: data.role,
            email_verified: data.email_verified,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>> {
        Ok(self.rows.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn update(&self, id: Uuid, data: UpdateUser) -> RepoResult<Option<User>> {
        let mut rows = self.rows.lock().unwrap();
        let Some(user) = rows.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(name) = data.name {
            user.name = Some(name);
        }
        if let Some(hash) = data.password_hash {
            user.password_hash = hash;
        }
        if let Some(verified) = data.email_verified {
            user.email_verified = verified;
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn is_email_taken(&self, email: &str, exclude_id: Option<Uuid>) -> RepoResult<bool> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .any(|u| u.email == email && Some(u.id) != exclude_id))
    }
}

/// In-memory project store
#[derive(Default)]
pub struct InMemoryProjects {
    rows: Mutex<Vec<Project>>,
}

impl InMemoryProjects {
    pub fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl ProjectRepo for InMemoryProjects {
    async fn create(&self, data: CreateProject, created_by: Uuid) -> RepoResult<Project> {
        let now = Utc::now();
        let project = Project {
            id: Uuid::new_v4(),
            name: data.name,
            description: data.description,
            created_by,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().push(project.clone());
        Ok(project)
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Project>> {
        Ok(self.rows.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> RepoResult<Vec<Project>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn list_by_creator(&self, creator_id: Uuid) -> RepoResult<Vec<Project>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.created_by == creator_id)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: Uuid) -> RepoResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|p| p.id != id);
        Ok(rows.len() < before)
    }
}

/// In-memory membership store
#[derive(Default)]
pub struct InMemoryMemberships {
    rows: Mutex<Vec<ProjectMember>>,
}

impl InMemoryMemberships {
    pub fn count_for_project(&self, project_id: Uuid) -> usize {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.project_id == project_id)
            .count()
    }
}

#[async_trait]
impl MembershipRepo for InMemoryMemberships {
    async fn create(&self, data: CreateMembership) -> RepoResult<ProjectMember> {
        let now = Utc::now();
        let member = ProjectMember {
            project_id: data.project_id,
            user_id: data.user_id,
            role: data.role,
            status: data.status,
            can_create_tasks: true,
            can_assign_tasks: false,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().push(member.clone());
        Ok(member)
    }

    async fn find(&self, project_id: Uuid, user_id: Uuid) -> RepoResult<Option<ProjectMember>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.project_id == project_id && m.user_id == user_id)
            .cloned())
    }

    async fn set_status(
        &self,
        project_id: Uuid,
        user_id: Uuid,
        status: MemberStatus,
    ) -> RepoResult<Option<ProjectMember>> {
        let mut rows = self.rows.lock().unwrap();
        let Some(member) = rows
            .iter_mut()
            .find(|m| m.project_id == project_id && m.user_id == user_id)
        else {
            return Ok(None);
        };
        member.status = status;
        member.updated_at = Utc::now();
        Ok(Some(member.clone()))
    }

    async fn list_by_project(&self, project_id: Uuid) -> RepoResult<Vec<ProjectMember>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn list_active_by_project(&self, project_id: Uuid) -> RepoResult<Vec<ProjectMember>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.project_id == project_id && m.status == MemberStatus::Active)
            .cloned()
            .collect())
    }

    async fn list_active_by_user(&self, user_id: Uuid) -> RepoResult<Vec<ProjectMember>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.user_id == user_id && m.status == MemberStatus::Active)
            .cloned()
            .collect())
    }

    async fn delete_by_project(&self, project_id: Uuid) -> RepoResult<u64> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|m| m.project_id != project_id);
        Ok((before - rows.len()) as u64)
    }
}

/// In-memory task store
#[derive(Default)]
pub struct InMemoryTasks {
    rows: Mutex<Vec<Task>>,
}

impl InMemoryTasks {
    pub fn count_for_project(&self, project_id: Uuid) -> usize {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.project_id == project_id)
            .count()
    }
}

#[async_trait]
impl TaskRepo for InMemoryTasks {
    async fn create(
        &self,
        data: CreateTask,
        created_by: Uuid,
        sort_order: i32,
    ) -> RepoResult<Task> {
        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            title: data.title,
            description: data.description,
            status: data.status,
            project_id: data.project_id,
            assigned_to: data.assigned_to,
            created_by,
            sort_order,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().push(task.clone());
        Ok(task)
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Task>> {
        Ok(self.rows.lock().unwrap().iter().find(|t| t.id == id).cloned())
    }

    async fn max_sort_order(
        &self,
        project_id: Uuid,
        status: TaskStatus,
    ) -> RepoResult<Option<i32>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.project_id == project_id && t.status == status)
            .map(|t| t.sort_order)
            .max())
    }

    async fn list_by_project(&self, project_id: Uuid) -> RepoResult<Vec<Task>> {
        let mut tasks: Vec<Task> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect();
        tasks.sort_by_key(|t| t.sort_order);
        Ok(tasks)
    }

    async fn set_column(
        &self,
        id: Uuid,
        status: TaskStatus,
        sort_order: i32,
    ) -> RepoResult<Option<Task>> {
        let mut rows = self.rows.lock().unwrap();
        let Some(task) = rows.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        task.status = status;
        task.sort_order = sort_order;
        task.updated_at = Utc::now();
        Ok(Some(task.clone()))
    }

    async fn set_assignee(&self, id: Uuid, assignee_id: Uuid) -> RepoResult<Option<Task>> {
        let mut rows = self.rows.lock().unwrap();
        let Some(task) = rows.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        task.assigned_to = Some(assignee_id);
        task.updated_at = Utc::now();
        Ok(Some(task.clone()))
    }

    async fn delete_by_project(&self, project_id: Uuid) -> RepoResult<u64> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|t| t.project_id != project_id);
        Ok((before - rows.len()) as u64)
    }
}

/// A mail captured by [`RecordingMailer`]
#[derive(Debug, Clone)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

/// Records outgoing mail instead of delivering it
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<SentMail>>,
}

impl RecordingMailer {
    pub fn sent_to(&self, address: &str) -> Vec<SentMail> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.to == address)
            .cloned()
            .collect()
    }
}

/// Rejects every send with a transport error
#[derive(Default)]
pub struct FailingMailer;

#[async_trait]
impl EmailSender for FailingMailer {
    async fn send(
        &self,
        _to: &str,
        _subject: &str,
        _html_body: &str,
        _text_body: &str,
    ) -> Result<String, EmailError> {
        Err(EmailError::Transport("connection refused".to_string()))
    }
}

#[async_trait]
impl EmailSender for RecordingMailer {
    async fn send(
        &self,
        to: &str,
        subject: &str,
        html_body: &str,
        text_body: &str,
    ) -> Result<String, EmailError> {
        self.sent.lock().unwrap().push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            html_body: html_body.to_string(),
            text_body: text_body.to_string(),
        });
        Ok(format!("<{}@test>", Uuid::new_v4()))
    }
}

/// All engines wired against the in-memory stores
pub struct TestContext {
    pub users: Arc<InMemoryUsers>,
    pub projects: Arc<InMemoryProjects>,
    pub members: Arc<InMemoryMemberships>,
    pub tasks: Arc<InMemoryTasks>,
    pub mailer: Arc<RecordingMailer>,

    pub tokens: ProjectTokenService,
    pub membership: MembershipEngine,
    pub project_service: ProjectService,
    pub task_engine: TaskEngine,
    pub invites: InvitationService,
    pub views: ViewService,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_token_ttl(60)
    }

    /// Builds a context whose tokens expire after `ttl_minutes`
    pub fn with_token_ttl(ttl_minutes: i64) -> Self {
        let users = Arc::new(InMemoryUsers::default());
        let projects = Arc::new(InMemoryProjects::default());
        let members = Arc::new(InMemoryMemberships::default());
        let tasks = Arc::new(InMemoryTasks::default());
        let mailer = Arc::new(RecordingMailer::default());

        let tokens = ProjectTokenService::new(TEST_SECRET, ttl_minutes);
        let membership = MembershipEngine::new(members.clone());

        let project_service = ProjectService::new(
            users.clone(),
            projects.clone(),
            membership.clone(),
        );
        let task_engine = TaskEngine::new(
            tasks.clone(),
            users.clone(),
            projects.clone(),
            members.clone(),
            membership.clone(),
        );
        let invites = InvitationService::new(
            users.clone(),
            projects.clone(),
            membership.clone(),
            tokens.clone(),
            mailer.clone(),
            BASE_URL,
        );
        let views = ViewService::new(users.clone(), projects.clone(), members.clone());

        Self {
            users,
            projects,
            members,
            tasks,
            mailer,
            tokens,
            membership,
            project_service,
            task_engine,
            invites,
            views,
        }
    }

    /// An invitation service over this context's stores whose mailer
    /// rejects every send
    pub fn invites_with_failing_mailer(&self) -> InvitationService {
        InvitationService::new(
            self.users.clone(),
            self.projects.clone(),
            self.membership.clone(),
            self.tokens.clone(),
            Arc::new(FailingMailer),
            BASE_URL,
        )
    }

    /// Creates a verified account with the given role
    pub async fn create_user(&self, email: &str, role: UserRole) -> User {
        self.users
            .create(CreateUser {
                email: email.to_string(),
                password_hash: hash_password("test-password").unwrap(),
                name: Some(email.split('@').next().unwrap().to_string()),
                role,
                email_verified: true,
            })
            .await
            .unwrap()
    }

    /// Creates an admin account and a project it owns
    pub async fn create_project_with_owner(&self, email: &str, name: &str) -> (User, Project) {
        let owner = self.create_user(email, UserRole::Admin).await;
        let project = self
            .project_service
            .create(
                CreateProject {
                    name: name.to_string(),
                    description: format!("{name} description"),
                },
                owner.id,
            )
            .await
            .unwrap();
        (owner, project)
    }

    /// Creates a regular account and an active member-role membership for it
    pub async fn add_active_member(&self, project_id: Uuid, email: &str) -> User {
        let user = self.create_user(email, UserRole::User).await;
        self.members
            .create(CreateMembership {
                project_id,
                user_id: user.id,
                role: MemberRole::Member,
                status: MemberStatus::Active,
            })
            .await
            .unwrap();
        user
    }

    /// Creates a task through the engine as `creator_id`
    pub async fn create_task(
        &self,
        project_id: Uuid,
        creator_id: Uuid,
        description: &str,
        status: TaskStatus,
    ) -> Task {
        self.task_engine
            .create(
                CreateTask {
                    title: Some(description.to_string()),
                    description: description.to_string(),
                    status,
                    project_id,
                    assigned_to: None,
                },
                creator_id,
            )
            .await
            .unwrap()
    }
}
