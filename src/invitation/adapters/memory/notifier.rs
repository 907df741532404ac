//! Recording in-memory invitation notifier.

use crate::access::domain::EmailAddress;
use crate::invitation::ports::{
    InvitationNotifier, InvitationNotifierError, OrganizationSummary,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// One recorded invitation email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentInvitationEmail {
    /// Where the email went.
    pub email: EmailAddress,
    /// The raw token the email carried.
    pub raw_token: String,
    /// Name of the inviting organization.
    pub organization_name: String,
}

/// Notifier double that records every send and can be told to fail.
#[derive(Debug, Clone, Default)]
pub struct RecordingInvitationNotifier {
    sent: Arc<Mutex<Vec<SentInvitationEmail>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingInvitationNotifier {
    /// Creates a notifier that accepts every send.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent sends fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Returns the recorded sends.
    #[must_use]
    pub fn sent(&self) -> Vec<SentInvitationEmail> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl InvitationNotifier for RecordingInvitationNotifier {
    async fn send_invitation_email(
        &self,
        email: &EmailAddress,
        raw_token: &str,
        organization: &OrganizationSummary,
    ) -> Result<(), InvitationNotifierError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(InvitationNotifierError("smtp unavailable".to_owned()));
        }
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(SentInvitationEmail {
                email: email.clone(),
                raw_token: raw_token.to_owned(),
                organization_name: organization.name.clone(),
            });
        Ok(())
    }
}
