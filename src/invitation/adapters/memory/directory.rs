//! In-memory identity directory.

use crate::access::domain::{EmailAddress, UserId};
use crate::invitation::ports::{DirectoryError, IdentityDirectory};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory account directory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    state: Arc<RwLock<DirectoryState>>,
}

#[derive(Debug, Default)]
struct DirectoryState {
    by_user: HashMap<UserId, EmailAddress>,
    by_email: HashMap<EmailAddress, UserId>,
}

impl InMemoryDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an account.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError`] when the directory lock is poisoned.
    pub fn register(&self, user: UserId, email: EmailAddress) -> Result<(), DirectoryError> {
        let mut state = self.state.write().map_err(|err| {
            DirectoryError::new(std::io::Error::other(err.to_string()))
        })?;
        state.by_email.insert(email.clone(), user);
        state.by_user.insert(user, email);
        Ok(())
    }
}

#[async_trait]
impl IdentityDirectory for InMemoryDirectory {
    async fn resolve_user_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserId>, DirectoryError> {
        let state = self.state.read().map_err(|err| {
            DirectoryError::new(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.by_email.get(email).copied())
    }

    async fn email_of(&self, user: UserId) -> Result<Option<EmailAddress>, DirectoryError> {
        let state = self.state.read().map_err(|err| {
            DirectoryError::new(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.by_user.get(&user).cloned())
    }
}
