use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What a comment is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentAnchor {
    Node(Uuid),
    Edge(Uuid),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CommentStatus {
    #[default]
    Open,
    Solved,
}

impl std::fmt::Display for CommentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommentStatus::Open => write!(f, "open"),
            CommentStatus::Solved => write!(f, "solved"),
        }
    }
}

impl std::str::FromStr for CommentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(CommentStatus::Open),
            "solved" => Ok(CommentStatus::Solved),
            _ => Err(format!("Unknown comment status: {}", s)),
        }
    }
}

/// A discussion comment scoped to a node or an edge. Status toggles are
/// restricted to the comment's author or the board owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub anchor: CommentAnchor,
    pub author: Uuid,
    pub content: String,
    pub status: CommentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(anchor: CommentAnchor, author: Uuid, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            anchor,
            author,
            content,
            status: CommentStatus::default(),
            created_at: now,
            updated_at: now,
        }
    }
}
