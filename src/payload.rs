//! The materialized board shape exchanged with the external store.
//!
//! The surrounding persistence layer loads a full board into this shape
//! and writes it back verbatim after mutations; the core never sees row
//! ids, SQL, or transport details.

use serde::{Deserialize, Serialize};

use crate::entity::{Assumption, Board, Comment, Edge, List, Node};
use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardPayload {
    pub board: Board,
    #[serde(default)]
    pub lists: Vec<List>,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub assumptions: Vec<Assumption>,
}

impl BoardPayload {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_payload_round_trips_through_json() {
        let board = Board::new("Plan".to_string(), Uuid::new_v4());
        let payload = BoardPayload {
            board,
            lists: Vec::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
            comments: Vec::new(),
            assumptions: Vec::new(),
        };

        let json = payload.to_json().unwrap();
        let back = BoardPayload::from_json(&json).unwrap();

        assert_eq!(back.board.id, payload.board.id);
        assert_eq!(back.board.title, "Plan");
    }

    #[test]
    fn test_missing_collections_default_to_empty() {
        let board = Board::new("Plan".to_string(), Uuid::new_v4());
        let json = format!("{{\"board\":{}}}", serde_json::to_string(&board).unwrap());

        let payload = BoardPayload::from_json(&json).unwrap();
        assert!(payload.lists.is_empty());
        assert!(payload.edges.is_empty());
    }
}
