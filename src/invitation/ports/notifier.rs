//! Notification port for invitation emails.

use super::OrganizationSummary;
use crate::access::domain::EmailAddress;
use async_trait::async_trait;
use thiserror::Error;

/// Error returned when an invitation email cannot be delivered.
///
/// Delivery failures are logged by callers and never roll back the
/// invitation that triggered them.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invitation email delivery failed: {0}")]
pub struct InvitationNotifierError(pub String);

/// Outbound email contract for invitations.
#[async_trait]
pub trait InvitationNotifier: Send + Sync {
    /// Sends the invitation email carrying the raw token.
    ///
    /// This is the only place the raw token ever travels; everything else
    /// sees the hash.
    ///
    /// # Errors
    ///
    /// Returns [`InvitationNotifierError`] when delivery fails; callers
    /// log and continue.
    async fn send_invitation_email(
        &self,
        email: &EmailAddress,
        raw_token: &str,
        organization: &OrganizationSummary,
    ) -> Result<(), InvitationNotifierError>;
}
