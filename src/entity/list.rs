use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    /// Structural stage seeded with the board; cannot be deleted.
    Fixed,
    /// User-created stage; deletable.
    #[default]
    Intermediate,
}

impl std::fmt::Display for ListKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListKind::Fixed => write!(f, "fixed"),
            ListKind::Intermediate => write!(f, "intermediate"),
        }
    }
}

impl std::str::FromStr for ListKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fixed" => Ok(ListKind::Fixed),
            "intermediate" => Ok(ListKind::Intermediate),
            _ => Err(format!("Unknown list kind: {}", s)),
        }
    }
}

/// A stage (column) on a board. Node membership and position live on the
/// nodes themselves (`list_id` + `order`); the list only carries its own
/// left-to-right `order` within the board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct List {
    pub id: Uuid,
    pub board_id: Uuid,
    pub name: String,
    pub color: Option<String>,
    pub kind: ListKind,
    /// Position within the board, kept contiguous from 0.
    pub order: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl List {
    pub fn new(board_id: Uuid, name: String, kind: ListKind, order: u32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            board_id,
            name,
            color: None,
            kind,
            order,
            created_at: now,
            updated_at: now,
        }
    }
}
