//! Closed role sets per entity kind.
//!
//! Each level of the hierarchy recognises its own role enum; there is no
//! shared role lattice and no inheritance between levels. The `authority`
//! ranking exists only for read-side derivation of an account's display
//! role from its organization memberships.

use super::ParseRoleError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Common contract for the per-entity role enums.
pub trait Role: Copy + Eq + fmt::Debug + Send + Sync {
    /// Returns the canonical storage representation.
    fn as_str(self) -> &'static str;
}

/// Role held by a member of an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrganizationRole {
    /// The single account that owns the tenancy.
    Owner,
    /// May manage members, workspaces, and lifecycle.
    Admin,
    /// Regular member.
    Member,
}

impl OrganizationRole {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }

    /// Ranking used when deriving an account's display role; higher wins.
    #[must_use]
    pub const fn authority(self) -> u8 {
        match self {
            Self::Owner => 3,
            Self::Admin => 2,
            Self::Member => 1,
        }
    }
}

impl Role for OrganizationRole {
    fn as_str(self) -> &'static str {
        Self::as_str(self)
    }
}

impl fmt::Display for OrganizationRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for OrganizationRole {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "owner" => Ok(Self::Owner),
            "admin" => Ok(Self::Admin),
            "member" => Ok(Self::Member),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}

/// Role held by a member of a workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkspaceRole {
    /// Seeded from the organization owner at creation time.
    Owner,
    /// The designated workspace administrator.
    Admin,
    /// Regular member.
    Member,
}

impl WorkspaceRole {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }
}

impl Role for WorkspaceRole {
    fn as_str(self) -> &'static str {
        Self::as_str(self)
    }
}

impl fmt::Display for WorkspaceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for WorkspaceRole {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "owner" => Ok(Self::Owner),
            "admin" => Ok(Self::Admin),
            "member" => Ok(Self::Member),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}

/// Role held by a member of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectRole {
    /// The project creator.
    Owner,
    /// May manage members, the lock flag, and project settings.
    Admin,
    /// May manage tasks but not membership.
    Manager,
    /// May create and work on tasks.
    Member,
    /// Read-only access.
    Viewer,
}

impl ProjectRole {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Member => "member",
            Self::Viewer => "viewer",
        }
    }

    /// Roles permitted to create and edit tasks.
    #[must_use]
    pub const fn can_edit_tasks(self) -> bool {
        !matches!(self, Self::Viewer)
    }
}

impl Role for ProjectRole {
    fn as_str(self) -> &'static str {
        Self::as_str(self)
    }
}

impl fmt::Display for ProjectRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProjectRole {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "owner" => Ok(Self::Owner),
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "member" => Ok(Self::Member),
            "viewer" => Ok(Self::Viewer),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}
