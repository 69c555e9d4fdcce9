use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    #[default]
    LeadsTo,
    Enables,
    Requires,
    ContributesTo,
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeKind::LeadsTo => write!(f, "leads_to"),
            EdgeKind::Enables => write!(f, "enables"),
            EdgeKind::Requires => write!(f, "requires"),
            EdgeKind::ContributesTo => write!(f, "contributes_to"),
        }
    }
}

impl std::str::FromStr for EdgeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "leads_to" | "leadsto" => Ok(EdgeKind::LeadsTo),
            "enables" => Ok(EdgeKind::Enables),
            "requires" => Ok(EdgeKind::Requires),
            "contributes_to" | "contributesto" => Ok(EdgeKind::ContributesTo),
            _ => Err(format!("Unknown edge kind: {}", s)),
        }
    }
}

/// A directed, typed connection between two nodes. Never a self-loop;
/// at most one edge per ordered (source, target) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub id: Uuid,
    pub source_id: Uuid,
    pub target_id: Uuid,
    pub kind: EdgeKind,
    pub label: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Edge {
    pub fn new(source_id: Uuid, target_id: Uuid, kind: EdgeKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            source_id,
            target_id,
            kind,
            label: None,
            created_at: Utc::now(),
        }
    }
}
