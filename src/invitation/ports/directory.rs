//! Identity boundary: resolving users and email addresses.

use crate::access::domain::{EmailAddress, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Error returned when the identity boundary is unavailable.
#[derive(Debug, Clone, Error)]
#[error("identity directory error: {0}")]
pub struct DirectoryError(pub Arc<dyn std::error::Error + Send + Sync>);

impl DirectoryError {
    /// Wraps an identity-provider error.
    pub fn new(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self(Arc::new(err))
    }
}

/// Lookup contract against the platform's account store.
#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    /// Resolves an email address to an existing account, if one exists.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError`] when the account store is unavailable.
    async fn resolve_user_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserId>, DirectoryError>;

    /// Returns the account email for a user, if the account exists.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError`] when the account store is unavailable.
    async fn email_of(&self, user: UserId) -> Result<Option<EmailAddress>, DirectoryError>;
}
