/// Project service
///
/// Project creation is gated on the *account* role: only `admin` accounts
/// may create projects (project-level roles are a separate axis, carried on
/// the membership). Creation installs the creator's owner membership in the
/// same call, establishing the at-least-one-active-admin invariant.
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::engine::membership::MembershipEngine;
use crate::error::{CoreError, CoreResult};
use crate::models::project::{CreateProject, Project};
use crate::repo::{ProjectRepo, UserRepo};

/// Creates projects and their owner memberships
#[derive(Clone)]
pub struct ProjectService {
    users: Arc<dyn UserRepo>,
    projects: Arc<dyn ProjectRepo>,
    membership: MembershipEngine,
}

impl ProjectService {
    pub fn new(
        users: Arc<dyn UserRepo>,
        projects: Arc<dyn ProjectRepo>,
        membership: MembershipEngine,
    ) -> Self {
        Self {
            users,
            projects,
            membership,
        }
    }

    /// Creates a project owned by `creator_id`
    ///
    /// # Errors
    ///
    /// - NotFound when the creator account is absent
    /// - Forbidden when the creator's account role is not admin
    /// - Internal when the owner membership cannot be installed after the
    ///   project row was created (the project row stands; there is no
    ///   compensating rollback)
    pub async fn create(&self, data: CreateProject, creator_id: Uuid) -> CoreResult<Project> {
        let user = self
            .users
            .find_by_id(creator_id)
            .await?
            .ok_or_else(|| CoreError::NotFound("User not found".to_string()))?;

        if !user.role.can_create_projects() {
            return Err(CoreError::Forbidden(
                "Only admins can create projects".to_string(),
            ));
        }

        let project = self.projects.create(data, user.id).await?;

        self.membership
            .create_owner_membership(project.id, user.id)
            .await?;

        info!(project_id = %project.id, created_by = %user.id, "Project created");

        Ok(project)
    }
}
