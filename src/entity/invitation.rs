use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Role;

/// A pending invitation to join a board. Accepting it before expiry
/// turns it into a `Permission` with the invited role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invitation {
    pub id: Uuid,
    pub board_id: Uuid,
    pub email: String,
    pub role: Role,
    /// Opaque token the invitee presents on acceptance.
    pub token: String,
    pub invited_by: Uuid,
    pub expires_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Invitation {
    pub fn new(
        board_id: Uuid,
        email: String,
        role: Role,
        token: String,
        invited_by: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            board_id,
            email,
            role,
            token,
            invited_by,
            expires_at,
            accepted_at: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    pub fn is_pending(&self) -> bool {
        self.accepted_at.is_none()
    }
}
