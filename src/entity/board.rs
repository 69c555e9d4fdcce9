use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A theory-of-change board. Owns its lists (and through them nodes,
/// edges, comments and assumptions); deleting a board cascades to all
/// of them. The owner is a weak reference to a user managed elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// User id of the board owner. The owner always resolves to the
    /// `owner` role without an explicit permission row.
    pub owner: Uuid,
    /// Public boards grant anonymous callers an implicit `viewer` role.
    pub is_public: bool,
    /// Free-form presentation settings, opaque to the core.
    #[serde(default)]
    pub settings: HashMap<String, serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Board {
    pub fn new(title: String, owner: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            description: None,
            owner,
            is_public: false,
            settings: HashMap::new(),
            created_at: now,
            updated_at: now,
        }
    }
}
