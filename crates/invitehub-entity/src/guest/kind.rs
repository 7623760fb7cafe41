//! Guest kind enumeration.

use serde::{Deserialize, Serialize};

use invitehub_core::AppError;

/// Whether a guest entry addresses one person or a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "guest_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GuestKind {
    #[default]
    Individual,
    Group,
}

impl GuestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Group => "group",
        }
    }
}

impl std::fmt::Display for GuestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for GuestKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "individual" => Ok(Self::Individual),
            "group" => Ok(Self::Group),
            _ => Err(AppError::validation(format!(
                "Invalid guest kind: '{s}'. Expected one of: individual, group"
            ))),
        }
    }
}
