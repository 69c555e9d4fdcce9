use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    #[default]
    Activity,
    Output,
    Outcome,
    Impact,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::Activity => write!(f, "activity"),
            NodeKind::Output => write!(f, "output"),
            NodeKind::Outcome => write!(f, "outcome"),
            NodeKind::Impact => write!(f, "impact"),
        }
    }
}

impl std::str::FromStr for NodeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "activity" => Ok(NodeKind::Activity),
            "output" => Ok(NodeKind::Output),
            "outcome" => Ok(NodeKind::Outcome),
            "impact" => Ok(NodeKind::Impact),
            _ => Err(format!("Unknown node kind: {}", s)),
        }
    }
}

/// An activity or outcome on a board. Belongs to exactly one list at a
/// time; edges reference node ids, so moving a node between lists does
/// not touch its edges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: Uuid,
    pub list_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub kind: NodeKind,
    /// Free-text tags; insertion order is irrelevant.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Position within the list, kept contiguous from 0.
    pub order: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Node {
    pub fn new(list_id: Uuid, title: String, kind: NodeKind, order: u32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            list_id,
            title,
            description: None,
            kind,
            tags: Vec::new(),
            order,
            created_at: now,
            updated_at: now,
        }
    }
}
