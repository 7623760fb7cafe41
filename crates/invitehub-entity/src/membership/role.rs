//! Member role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles a user can hold on an invitation.
///
/// The set is closed: unknown role strings are rejected with a validation
/// error instead of being stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "member_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    /// Full control, including deleting the invitation.
    Owner,
    /// Can edit content, invite collaborators, and manage guests.
    Editor,
    /// Read-only access.
    Viewer,
}

impl MemberRole {
    /// Check if this role may edit content and invite other members.
    pub fn can_manage_members(&self) -> bool {
        matches!(self, Self::Owner | Self::Editor)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Editor => "editor",
            Self::Viewer => "viewer",
        }
    }
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MemberRole {
    type Err = invitehub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Self::Owner),
            "editor" => Ok(Self::Editor),
            "viewer" => Ok(Self::Viewer),
            _ => Err(invitehub_core::AppError::validation(format!(
                "Invalid role: '{s}'. Expected one of: owner, editor, viewer"
            ))),
        }
    }
}
