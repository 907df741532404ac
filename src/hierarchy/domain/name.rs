//! Validated display name shared by the hierarchy aggregates.

use super::HierarchyDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for a display name, matching the persistence column.
const MAX_NAME_LENGTH: usize = 120;

/// Validated, trimmed display name for organizations, workspaces, projects,
/// and task titles.
///
/// Uniqueness (where an entity kind requires it) is enforced at the
/// persistence boundary; this type only guarantees a printable value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityName(String);

impl EntityName {
    /// Creates a validated name.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyDomainError::EmptyName`] when the value is empty
    /// after trimming and [`HierarchyDomainError::NameTooLong`] when it
    /// exceeds 120 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, HierarchyDomainError> {
        let raw = value.into();
        let normalized = raw.trim();

        if normalized.is_empty() {
            return Err(HierarchyDomainError::EmptyName);
        }
        if normalized.chars().count() > MAX_NAME_LENGTH {
            return Err(HierarchyDomainError::NameTooLong(raw));
        }

        Ok(Self(normalized.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the case-folded form used for uniqueness indexing.
    #[must_use]
    pub fn index_key(&self) -> String {
        self.0.to_lowercase()
    }
}

impl AsRef<str> for EntityName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EntityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
