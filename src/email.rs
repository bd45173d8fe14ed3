//! Outbound email for project invitations.
//!
//! The core only composes invitation content and delegates delivery through
//! the [`EmailSender`] seam; the SMTP implementation here is what production
//! wiring injects. Delivery mechanics beyond this module are out of scope.

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use uuid::Uuid;

use crate::config::MailSettings;

/// Error type for outbound mail
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP relay is not configured
    #[error("Mail transport is not configured")]
    NotConfigured,

    /// Recipient or sender address failed to parse
    #[error("Invalid mail address: {0}")]
    InvalidAddress(String),

    /// Message could not be built or handed to the relay
    #[error("Mail transport error: {0}")]
    Transport(String),
}

/// Delivery seam the invitation service sends through
///
/// Returns the message id of the sent mail.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(
        &self,
        to: &str,
        subject: &str,
        html_body: &str,
        text_body: &str,
    ) -> Result<String, EmailError>;
}

/// SMTP-backed [`EmailSender`]
pub struct SmtpMailer {
    settings: MailSettings,
}

impl SmtpMailer {
    pub fn new(settings: MailSettings) -> Self {
        Self { settings }
    }

    /// True when enough is configured to actually send
    pub fn is_enabled(&self) -> bool {
        self.settings.is_configured()
    }
}

#[async_trait]
impl EmailSender for SmtpMailer {
    async fn send(
        &self,
        to: &str,
        subject: &str,
        html_body: &str,
        text_body: &str,
    ) -> Result<String, EmailError> {
        let host = self
            .settings
            .host
            .as_ref()
            .ok_or(EmailError::NotConfigured)?;
        let from_address = self
            .settings
            .from_address
            .as_ref()
            .ok_or(EmailError::NotConfigured)?;

        let from: Mailbox = format!("{} <{}>", self.settings.from_name, from_address)
            .parse()
            .map_err(|e| EmailError::InvalidAddress(format!("from: {}", e)))?;
        let to_mailbox: Mailbox = to
            .parse()
            .map_err(|e| EmailError::InvalidAddress(format!("to: {}", e)))?;

        let message_id = format!("<{}@{}>", Uuid::new_v4(), host);

        let email = Message::builder()
            .from(from)
            .to(to_mailbox)
            .subject(subject)
            .message_id(Some(message_id.clone()))
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )
            .map_err(|e| EmailError::Transport(e.to_string()))?;

        let mailer = if self.settings.tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)
                .map_err(|e| EmailError::Transport(e.to_string()))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
        }
        .port(self.settings.port);

        let mailer = if let (Some(username), Some(password)) =
            (&self.settings.username, &self.settings.password)
        {
            mailer.credentials(Credentials::new(username.clone(), password.clone()))
        } else {
            mailer
        };

        mailer
            .build()
            .send(email)
            .await
            .map_err(|e| EmailError::Transport(e.to_string()))?;

        tracing::info!(to = %to, subject = %subject, message_id = %message_id, "Email sent");

        Ok(message_id)
    }
}

/// Renders the HTML version of a project invitation email
pub fn render_invitation_html(project_name: &str, role: &str, invite_url: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Project Invitation</title>
</head>
<body style="font-family: -apple-system, 'Segoe UI', Roboto, Arial, sans-serif; background-color: #f5f5f5; margin: 0; padding: 0;">
    <div style="max-width: 560px; margin: 0 auto; padding: 40px 20px;">
        <div style="background-color: #ffffff; border-radius: 8px; overflow: hidden;">
            <div style="background: #2563eb; color: white; padding: 32px 24px; text-align: center;">
                <h1 style="margin: 0; font-size: 24px;">Project Invitation</h1>
            </div>
            <div style="padding: 32px 24px; color: #374151; line-height: 1.6;">
                <p>Hi there,</p>
                <p>You have been invited to join <strong>{project_name}</strong> as a <strong>{role}</strong>.</p>
                <div style="text-align: center; margin: 32px 0;">
                    <a href="{invite_url}" style="display: inline-block; background: #2563eb; color: white !important; text-decoration: none; padding: 14px 32px; border-radius: 6px;">Join Project</a>
                </div>
                <p style="color: #6b7280; font-size: 13px; text-align: center;">If you didn't expect this invitation, you can safely ignore this email.</p>
            </div>
        </div>
    </div>
</body>
</html>"#,
        project_name = html_escape(project_name),
        role = html_escape(&capitalize(role)),
        invite_url = invite_url,
    )
}

/// Renders the plain text version of a project invitation email
pub fn render_invitation_text(project_name: &str, role: &str, invite_url: &str) -> String {
    format!(
        r#"Project Invitation

Hi there,

You have been invited to join {project_name} as a {role}.

To accept this invitation, visit:
{invite_url}

If you didn't expect this invitation, you can safely ignore this email."#,
        project_name = project_name,
        role = capitalize(role),
        invite_url = invite_url,
    )
}

/// Escape HTML special characters
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Capitalize a role name for display
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("Tom & Jerry"), "Tom &amp; Jerry");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("member"), "Member");
        assert_eq!(capitalize("admin"), "Admin");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_render_invitation_text() {
        let text = render_invitation_text(
            "Apollo",
            "member",
            "https://app.example.com/join-project?token=abc",
        );
        assert!(text.contains("Apollo"));
        assert!(text.contains("Member"));
        assert!(text.contains("join-project?token=abc"));
    }

    #[test]
    fn test_render_invitation_html() {
        let html = render_invitation_html(
            "Apollo & Co",
            "admin",
            "https://app.example.com/verify-and-join?token=abc",
        );
        assert!(html.contains("Apollo &amp; Co"));
        assert!(html.contains("Admin"));
        assert!(html.contains("verify-and-join?token=abc"));
        assert!(html.contains("<!DOCTYPE html>"));
    }
}
