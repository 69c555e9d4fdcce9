use std::collections::HashMap;

use crate::entity::{EdgeKind, NodeKind};

/// Update payload for a board. Double-`Option` fields distinguish
/// "leave unchanged" (`None`) from "clear" (`Some(None)`).
#[derive(Default)]
pub struct BoardUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub is_public: Option<bool>,
    /// Merged into the existing settings map key by key.
    pub settings: HashMap<String, serde_json::Value>,
}

impl BoardUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.is_public.is_none()
            && self.settings.is_empty()
    }
}

/// Update payload for a list.
#[derive(Default)]
pub struct ListUpdate {
    pub name: Option<String>,
    pub color: Option<Option<String>>,
}

impl ListUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.color.is_none()
    }
}

/// Update payload for a node.
#[derive(Default)]
pub struct NodeUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub kind: Option<NodeKind>,
    pub add_tags: Vec<String>,
    pub remove_tags: Vec<String>,
}

impl NodeUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.kind.is_none()
            && self.add_tags.is_empty()
            && self.remove_tags.is_empty()
    }
}

/// Update payload for an edge.
#[derive(Default)]
pub struct EdgeUpdate {
    pub kind: Option<EdgeKind>,
    pub label: Option<Option<String>>,
}

impl EdgeUpdate {
    pub fn is_empty(&self) -> bool {
        self.kind.is_none() && self.label.is_none()
    }
}
