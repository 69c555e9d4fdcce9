use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-board roles, totally ordered: viewer < reviewer < editor < owner.
/// Every authorization check is a rank comparison, never a string match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Viewer,
    Reviewer,
    Editor,
    Owner,
}

impl Role {
    pub fn rank(&self) -> u8 {
        match self {
            Role::Viewer => 1,
            Role::Reviewer => 2,
            Role::Editor => 3,
            Role::Owner => 4,
        }
    }

    pub fn satisfies(&self, required: Role) -> bool {
        self.rank() >= required.rank()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Viewer => write!(f, "viewer"),
            Role::Reviewer => write!(f, "reviewer"),
            Role::Editor => write!(f, "editor"),
            Role::Owner => write!(f, "owner"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "viewer" => Ok(Role::Viewer),
            "reviewer" => Ok(Role::Reviewer),
            // "contributor" is the legacy name for editor
            "editor" | "contributor" => Ok(Role::Editor),
            "owner" => Ok(Role::Owner),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// An explicit role grant, unique per (board, user).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permission {
    pub board_id: Uuid,
    pub user_id: Uuid,
    pub role: Role,
    pub granted_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Permission {
    pub fn new(board_id: Uuid, user_id: Uuid, role: Role, granted_by: Option<Uuid>) -> Self {
        Self {
            board_id,
            user_id,
            role,
            granted_by,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_order_matches_rank() {
        assert!(Role::Owner > Role::Editor);
        assert!(Role::Editor > Role::Reviewer);
        assert!(Role::Reviewer > Role::Viewer);
        assert!(Role::Owner.satisfies(Role::Viewer));
        assert!(!Role::Viewer.satisfies(Role::Editor));
    }

    #[test]
    fn test_role_from_str_accepts_contributor() {
        assert_eq!("contributor".parse::<Role>().unwrap(), Role::Editor);
        assert_eq!("EDITOR".parse::<Role>().unwrap(), Role::Editor);
        assert!("admin".parse::<Role>().is_err());
    }
}
