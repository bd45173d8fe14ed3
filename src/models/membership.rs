/// Project membership model
///
/// The `project_members` relation maps project × user to a role, a status,
/// and two permission flags. It is the single authorization source for the
/// task engine.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE member_role AS ENUM ('admin', 'member');
/// CREATE TYPE member_status AS ENUM ('invited', 'active');
///
/// CREATE TABLE project_members (
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     role member_role NOT NULL DEFAULT 'member',
///     status member_status NOT NULL DEFAULT 'invited',
///     can_create_tasks BOOLEAN NOT NULL DEFAULT TRUE,
///     can_assign_tasks BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (project_id, user_id)
/// );
/// ```
///
/// # Invariants
///
/// - At most one membership row per `(project_id, user_id)` pair.
/// - Status transitions `Invited -> Active` exactly once and never reverts.
/// - Project creation installs the creator as `Admin`/`Active`, so every
///   project starts with at least one active admin.
///
/// The permission flags are persisted but deliberately not enforced anywhere:
/// any active member may create tasks regardless of `can_create_tasks`. That
/// is observed production behavior, kept as-is.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role within a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "member_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    /// May perform destructive operations (project deletion)
    Admin,

    /// Regular project member
    Member,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Admin => "admin",
            MemberRole::Member => "member",
        }
    }
}

/// Membership lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "member_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    /// Invited by email, has not accepted yet
    Invited,

    /// Accepted; may act on the project
    Active,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Invited => "invited",
            MemberStatus::Active => "active",
        }
    }
}

/// A project membership row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProjectMember {
    /// Project ID
    pub project_id: Uuid,

    /// User ID
    pub user_id: Uuid,

    /// Role within the project
    pub role: MemberRole,

    /// Lifecycle status
    pub status: MemberStatus,

    /// Stored but unenforced permission flag
    pub can_create_tasks: bool,

    /// Stored but unenforced permission flag
    pub can_assign_tasks: bool,

    /// When the membership was created
    pub created_at: DateTime<Utc>,

    /// When the membership was last updated
    pub updated_at: DateTime<Utc>,
}

impl ProjectMember {
    /// True when the member may act on the project
    pub fn is_active(&self) -> bool {
        self.status == MemberStatus::Active
    }

    /// True for active admins
    pub fn is_active_admin(&self) -> bool {
        self.is_active() && self.role == MemberRole::Admin
    }
}

/// Input for creating a membership row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMembership {
    /// Project ID
    pub project_id: Uuid,

    /// User ID
    pub user_id: Uuid,

    /// Role to assign
    pub role: MemberRole,

    /// Initial status
    pub status: MemberStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(role: MemberRole, status: MemberStatus) -> ProjectMember {
        ProjectMember {
            project_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            role,
            status,
            can_create_tasks: true,
            can_assign_tasks: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_enum_strings() {
        assert_eq!(MemberRole::Admin.as_str(), "admin");
        assert_eq!(MemberRole::Member.as_str(), "member");
        assert_eq!(MemberStatus::Invited.as_str(), "invited");
        assert_eq!(MemberStatus::Active.as_str(), "active");
    }

    #[test]
    fn test_active_checks() {
        assert!(member(MemberRole::Member, MemberStatus::Active).is_active());
        assert!(!member(MemberRole::Member, MemberStatus::Invited).is_active());

        assert!(member(MemberRole::Admin, MemberStatus::Active).is_active_admin());
        assert!(!member(MemberRole::Admin, MemberStatus::Invited).is_active_admin());
        assert!(!member(MemberRole::Member, MemberStatus::Active).is_active_admin());
    }
}
