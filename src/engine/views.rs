/// Aggregation views
///
/// Read-only projections that join projects, memberships, and users into the
/// shapes dashboards consume. Nothing here mutates state; the engines own
/// every write path.
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::models::membership::{MemberRole, MemberStatus, ProjectMember};
use crate::models::user::{UserRole, UserSnapshot};
use crate::repo::{MembershipRepo, ProjectRepo, UserRepo};

/// A project as it appears on a user's dashboard
#[derive(Debug, Clone, Serialize)]
pub struct ProjectOverview {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// True when the viewing user created the project
    pub is_creator: bool,

    /// The viewer's project role, when a membership row exists
    pub member_role: Option<MemberRole>,

    /// The viewer's membership status, when a membership row exists
    pub member_status: Option<MemberStatus>,
}

/// An active member of a project, joined with their account
#[derive(Debug, Clone, Serialize)]
pub struct MemberProfile {
    pub user: UserSnapshot,
    pub role: MemberRole,
    pub status: MemberStatus,
    pub can_create_tasks: bool,
    pub can_assign_tasks: bool,

    /// When the membership row was created
    pub joined_at: DateTime<Utc>,
}

/// One member of one project in the flattened cross-project roster
///
/// `role` is the member's account-level role, not their project role, and
/// `created_at` is their account creation time.
#[derive(Debug, Clone, Serialize)]
pub struct TeamMemberRow {
    pub project_id: Uuid,
    pub project_name: String,
    pub user_id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub role: UserRole,
    pub status: MemberStatus,
    pub created_at: DateTime<Utc>,
}

/// Read-side joins over the three entity stores
#[derive(Clone)]
pub struct ViewService {
    users: Arc<dyn UserRepo>,
    projects: Arc<dyn ProjectRepo>,
    members: Arc<dyn MembershipRepo>,
}

impl ViewService {
    pub fn new(
        users: Arc<dyn UserRepo>,
        projects: Arc<dyn ProjectRepo>,
        members: Arc<dyn MembershipRepo>,
    ) -> Self {
        Self {
            users,
            projects,
            members,
        }
    }

    /// Every project the user created or actively belongs to, newest first
    ///
    /// Created and member projects are merged without duplicates. The
    /// `member_role`/`member_status` fields carry the viewer's membership
    /// row when one exists, including on projects they created.
    pub async fn my_projects(&self, user_id: Uuid) -> CoreResult<Vec<ProjectOverview>> {
        let created = self.projects.list_by_creator(user_id).await?;
        let memberships = self.members.list_active_by_user(user_id).await?;

        let membership_by_project: HashMap<Uuid, &ProjectMember> =
            memberships.iter().map(|m| (m.project_id, m)).collect();

        let mut seen: HashSet<Uuid> = HashSet::new();
        let mut overviews = Vec::with_capacity(created.len() + memberships.len());

        for project in &created {
            seen.insert(project.id);
            overviews.push(self.overview(project, user_id, &membership_by_project));
        }

        let member_project_ids: Vec<Uuid> = memberships
            .iter()
            .map(|m| m.project_id)
            .filter(|id| !seen.contains(id))
            .collect();

        for project in &self.projects.find_by_ids(&member_project_ids).await? {
            overviews.push(self.overview(project, user_id, &membership_by_project));
        }

        overviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        debug!(%user_id, count = overviews.len(), "Listed projects for user");

        Ok(overviews)
    }

    /// The active roster of a project, each member joined with their account
    ///
    /// # Errors
    ///
    /// - NotFound when the project has no active members, which also covers
    ///   a nonexistent project id
    /// - Internal when a membership row points at a missing account
    pub async fn project_members(&self, project_id: Uuid) -> CoreResult<Vec<MemberProfile>> {
        let memberships = self.members.list_active_by_project(project_id).await?;

        if memberships.is_empty() {
            return Err(CoreError::NotFound(
                "No members found for this project".to_string(),
            ));
        }

        let mut profiles = Vec::with_capacity(memberships.len());
        for membership in memberships {
            let user = self
                .users
                .find_by_id(membership.user_id)
                .await?
                .ok_or_else(|| {
                    CoreError::Internal(format!(
                        "Membership references missing user {}",
                        membership.user_id
                    ))
                })?;

            profiles.push(MemberProfile {
                user: UserSnapshot::from(&user),
                role: membership.role,
                status: membership.status,
                can_create_tasks: membership.can_create_tasks,
                can_assign_tasks: membership.can_assign_tasks,
                joined_at: membership.created_at,
            });
        }

        Ok(profiles)
    }

    /// Every member of every project the user created, flattened into one
    /// list and sorted by the member's account age, newest accounts first
    ///
    /// Memberships of any status are included. Rows pointing at missing
    /// accounts are skipped rather than failing the whole view.
    pub async fn my_teams(&self, user_id: Uuid) -> CoreResult<Vec<TeamMemberRow>> {
        let created = self.projects.list_by_creator(user_id).await?;

        let mut rows = Vec::new();
        for project in &created {
            for membership in self.members.list_by_project(project.id).await? {
                let Some(user) = self.users.find_by_id(membership.user_id).await? else {
                    continue;
                };

                rows.push(TeamMemberRow {
                    project_id: project.id,
                    project_name: project.name.clone(),
                    user_id: user.id,
                    name: user.name,
                    email: user.email,
                    role: user.role,
                    status: membership.status,
                    created_at: user.created_at,
                });
            }
        }

        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        debug!(%user_id, count = rows.len(), "Listed team rows for user");

        Ok(rows)
    }

    fn overview(
        &self,
        project: &crate::models::project::Project,
        viewer_id: Uuid,
        memberships: &HashMap<Uuid, &ProjectMember>,
    ) -> ProjectOverview {
        let membership = memberships.get(&project.id);
        ProjectOverview {
            id: project.id,
            name: project.name.clone(),
            description: project.description.clone(),
            created_by: project.created_by,
            created_at: project.created_at,
            updated_at: project.updated_at,
            is_creator: project.created_by == viewer_id,
            member_role: membership.map(|m| m.role),
            member_status: membership.map(|m| m.status),
        }
    }
}
