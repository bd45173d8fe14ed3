/// Invitation service
///
/// Drives the invite-to-join flow: an inviter names an email address, the
/// service resolves or creates the account behind it, records an invited
/// membership, and mails out a signed project-access link. The invitee later
/// redeems the token through one of two paths depending on whether their
/// account still needs onboarding.
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::auth::password::{hash_password, unusable_password_hash};
use crate::auth::project_token::ProjectTokenService;
use crate::email::{render_invitation_html, render_invitation_text, EmailSender};
use crate::engine::membership::MembershipEngine;
use crate::error::{CoreError, CoreResult};
use crate::models::membership::{MemberRole, ProjectMember};
use crate::models::user::{CreateUser, UpdateUser, User, UserRole};
use crate::repo::{ProjectRepo, UserRepo};

/// Outcome of a successful [`InvitationService::invite_member`] call
#[derive(Debug, Clone, serde::Serialize)]
pub struct Invitation {
    pub user_id: Uuid,
    pub email: String,
    pub project_id: Uuid,
    pub project_name: String,

    /// Full redemption link carrying the signed token
    pub invite_url: String,
}

/// Invite issuance and token redemption
#[derive(Clone)]
pub struct InvitationService {
    users: Arc<dyn UserRepo>,
    projects: Arc<dyn ProjectRepo>,
    membership: MembershipEngine,
    tokens: ProjectTokenService,
    mailer: Arc<dyn EmailSender>,
    base_url: String,
}

impl InvitationService {
    pub fn new(
        users: Arc<dyn UserRepo>,
        projects: Arc<dyn ProjectRepo>,
        membership: MembershipEngine,
        tokens: ProjectTokenService,
        mailer: Arc<dyn EmailSender>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            users,
            projects,
            membership,
            tokens,
            mailer,
            base_url: base_url.into(),
        }
    }

    /// Invites an email address into a project
    ///
    /// When no account exists for the address, an implicit one is created
    /// with an unusable password hash and an unverified email; the invitee
    /// sets their real credentials during [`Self::verify_and_join`]. The
    /// mailed link routes new or unverified accounts through the onboarding
    /// path and established accounts straight to the join path.
    ///
    /// Any authenticated caller may invite; neither membership nor the
    /// stored permission flags of the inviter are consulted.
    ///
    /// # Errors
    ///
    /// - NotFound when the project is absent
    /// - Conflict when a membership row already exists for the invitee,
    ///   whatever its status
    /// - Internal when the invitation mail cannot be delivered; the
    ///   membership row created earlier stands and the invite must be
    ///   retried or the link re-sent out of band
    pub async fn invite_member(
        &self,
        email: &str,
        project_id: Uuid,
        role: MemberRole,
        inviter_id: Uuid,
    ) -> CoreResult<Invitation> {
        let project = self
            .projects
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| CoreError::NotFound("Project not found".to_string()))?;

        let invitee = match self.users.find_by_email(email).await? {
            Some(user) => user,
            None => {
                let user = self
                    .users
                    .create(CreateUser {
                        email: email.to_string(),
                        password_hash: unusable_password_hash()?,
                        name: None,
                        role: UserRole::User,
                        email_verified: false,
                    })
                    .await?;

                info!(user_id = %user.id, "Implicit account created for invitee");
                user
            }
        };

        self.membership.invite(project_id, invitee.id, role).await?;

        let token = self.tokens.issue(invitee.id, project_id)?;
        let invite_url = self.invite_url(&invitee, &token);

        let role_label = role.as_str();
        let message_id = self
            .mailer
            .send(
                email,
                &format!("You've been invited to join {}", project.name),
                &render_invitation_html(&project.name, role_label, &invite_url),
                &render_invitation_text(&project.name, role_label, &invite_url),
            )
            .await?;

        info!(
            %project_id,
            invitee = %invitee.id,
            inviter = %inviter_id,
            %message_id,
            "Invitation mail sent"
        );

        Ok(Invitation {
            user_id: invitee.id,
            email: invitee.email,
            project_id,
            project_name: project.name,
            invite_url,
        })
    }

    /// Redeems a token for a new or unverified account, setting its name and
    /// password before activating the membership
    ///
    /// An already-verified account keeps its existing credentials; the
    /// submitted name and password are ignored and only the membership is
    /// activated.
    ///
    /// # Errors
    ///
    /// - Unauthorized when the token fails verification
    /// - NotFound when the token's subject no longer exists
    pub async fn verify_and_join(
        &self,
        name: &str,
        password: &str,
        token: &str,
    ) -> CoreResult<ProjectMember> {
        let access = self.tokens.verify(token)?;

        let user = self
            .users
            .find_by_id(access.user_id)
            .await?
            .ok_or_else(|| CoreError::NotFound("User not found".to_string()))?;

        if !user.email_verified {
            let password_hash = hash_password(password)?;
            self.users
                .update(
                    user.id,
                    UpdateUser {
                        name: Some(name.to_string()),
                        password_hash: Some(password_hash),
                        email_verified: Some(true),
                    },
                )
                .await?
                .ok_or_else(|| CoreError::NotFound("User not found".to_string()))?;

            info!(user_id = %user.id, "Invitee account onboarded");
        }

        self.membership.activate(access.project_id, user.id).await
    }

    /// Redeems a token for an established account, activating the membership
    ///
    /// An unverified account redeeming through this path is marked verified
    /// without touching its credentials.
    ///
    /// # Errors
    ///
    /// - Unauthorized when the token fails verification
    /// - NotFound when the token's subject no longer exists
    pub async fn verify_join(&self, token: &str) -> CoreResult<ProjectMember> {
        let access = self.tokens.verify(token)?;

        let user = self
            .users
            .find_by_id(access.user_id)
            .await?
            .ok_or_else(|| CoreError::NotFound("User not found".to_string()))?;

        if !user.email_verified {
            self.users
                .update(
                    user.id,
                    UpdateUser {
                        name: None,
                        password_hash: None,
                        email_verified: Some(true),
                    },
                )
                .await?
                .ok_or_else(|| CoreError::NotFound("User not found".to_string()))?;
        }

        self.membership.activate(access.project_id, user.id).await
    }

    /// New or unverified accounts onboard through `verify-and-join`;
    /// established accounts go straight to `join-project`.
    fn invite_url(&self, invitee: &User, token: &str) -> String {
        if invitee.email_verified {
            format!("{}/join-project?token={}", self.base_url, token)
        } else {
            format!("{}/verify-and-join?token={}", self.base_url, token)
        }
    }
}
