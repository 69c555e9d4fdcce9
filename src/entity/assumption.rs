use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AssumptionStrength {
    Weak,
    #[default]
    Medium,
    Strong,
    EvidenceBacked,
}

impl std::fmt::Display for AssumptionStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssumptionStrength::Weak => write!(f, "weak"),
            AssumptionStrength::Medium => write!(f, "medium"),
            AssumptionStrength::Strong => write!(f, "strong"),
            AssumptionStrength::EvidenceBacked => write!(f, "evidence_backed"),
        }
    }
}

impl std::str::FromStr for AssumptionStrength {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "weak" => Ok(AssumptionStrength::Weak),
            "medium" => Ok(AssumptionStrength::Medium),
            "strong" => Ok(AssumptionStrength::Strong),
            "evidence_backed" | "evidence-backed" => Ok(AssumptionStrength::EvidenceBacked),
            _ => Err(format!("Unknown assumption strength: {}", s)),
        }
    }
}

/// A stated assumption behind a causal edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assumption {
    pub id: Uuid,
    pub edge_id: Uuid,
    pub author: Uuid,
    pub content: String,
    pub strength: AssumptionStrength,
    pub created_at: DateTime<Utc>,
}

impl Assumption {
    pub fn new(edge_id: Uuid, author: Uuid, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            edge_id,
            author,
            content,
            strength: AssumptionStrength::default(),
            created_at: Utc::now(),
        }
    }
}
