/// Membership engine
///
/// Owns the project-member relation and is the single authorization gate for
/// everything that acts on a project: task creation, task listing, and
/// assignment all pass through [`MembershipEngine::require_active_member`],
/// destructive operations through [`MembershipEngine::require_active_admin`].
///
/// # Invariants
///
/// - At most one membership row per `(project_id, user_id)`: `invite` fails
///   with Conflict whenever any row exists for the pair, regardless of
///   status — no re-invite, no role change via re-invite.
/// - Status moves `Invited -> Active` exactly once and never reverts;
///   `activate` treats "already active" as success, not an error.
/// - `create_owner_membership` runs once, right after project creation, so
///   every project starts with at least one active admin.
use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::models::membership::{CreateMembership, MemberRole, MemberStatus, ProjectMember};
use crate::repo::MembershipRepo;

/// Authorization gate and membership lifecycle
#[derive(Clone)]
pub struct MembershipEngine {
    members: Arc<dyn MembershipRepo>,
}

impl MembershipEngine {
    pub fn new(members: Arc<dyn MembershipRepo>) -> Self {
        Self { members }
    }

    /// Fails with Forbidden unless `(project_id, user_id)` has an active
    /// membership; returns the membership row on success
    pub async fn require_active_member(
        &self,
        project_id: Uuid,
        user_id: Uuid,
    ) -> CoreResult<ProjectMember> {
        let member = self.members.find(project_id, user_id).await?;

        match member {
            Some(m) if m.is_active() => Ok(m),
            _ => Err(CoreError::Forbidden(
                "You are not a member of this project".to_string(),
            )),
        }
    }

    /// As [`Self::require_active_member`], additionally requiring the admin
    /// role within the project
    pub async fn require_active_admin(
        &self,
        project_id: Uuid,
        user_id: Uuid,
    ) -> CoreResult<ProjectMember> {
        let member = self.require_active_member(project_id, user_id).await?;

        if member.role != MemberRole::Admin {
            return Err(CoreError::Forbidden(
                "Admin access to this project is required".to_string(),
            ));
        }

        Ok(member)
    }

    /// Installs the project creator as an active admin
    ///
    /// Invoked exactly once, immediately after project creation.
    pub async fn create_owner_membership(
        &self,
        project_id: Uuid,
        user_id: Uuid,
    ) -> CoreResult<ProjectMember> {
        debug!(%project_id, %user_id, "Creating owner membership");

        let member = self
            .members
            .create(CreateMembership {
                project_id,
                user_id,
                role: MemberRole::Admin,
                status: MemberStatus::Active,
            })
            .await?;

        Ok(member)
    }

    /// Creates an invited membership for the pair
    ///
    /// # Errors
    ///
    /// Fails with Conflict when a membership row already exists for
    /// `(project_id, user_id)`, whatever its status.
    pub async fn invite(
        &self,
        project_id: Uuid,
        user_id: Uuid,
        role: MemberRole,
    ) -> CoreResult<ProjectMember> {
        if self.members.find(project_id, user_id).await?.is_some() {
            return Err(CoreError::Conflict(
                "User already invited to this project".to_string(),
            ));
        }

        debug!(%project_id, %user_id, role = role.as_str(), "Inviting member");

        let member = self
            .members
            .create(CreateMembership {
                project_id,
                user_id,
                role,
                status: MemberStatus::Invited,
            })
            .await?;

        Ok(member)
    }

    /// Activates the membership for a pair whose project-access token just
    /// verified
    ///
    /// Idempotent by design: an existing non-active row is set active, an
    /// already-active row is returned as-is, and a missing row is created as
    /// an active regular member.
    pub async fn activate(&self, project_id: Uuid, user_id: Uuid) -> CoreResult<ProjectMember> {
        match self.members.find(project_id, user_id).await? {
            Some(member) if member.is_active() => Ok(member),
            Some(_) => {
                let updated = self
                    .members
                    .set_status(project_id, user_id, MemberStatus::Active)
                    .await?
                    .ok_or_else(|| {
                        CoreError::Internal("Membership disappeared during activation".to_string())
                    })?;

                debug!(%project_id, %user_id, "Membership activated");
                Ok(updated)
            }
            None => {
                let member = self
                    .members
                    .create(CreateMembership {
                        project_id,
                        user_id,
                        role: MemberRole::Member,
                        status: MemberStatus::Active,
                    })
                    .await?;

                debug!(%project_id, %user_id, "Membership created active");
                Ok(member)
            }
        }
    }
}
