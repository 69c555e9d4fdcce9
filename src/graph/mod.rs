mod update;

pub use update::{BoardUpdate, EdgeUpdate, ListUpdate, NodeUpdate};

use std::collections::HashMap;

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::entity::{
    Assumption, AssumptionStrength, Board, Comment, CommentAnchor, CommentStatus, Edge, EdgeKind,
    List, ListKind, Node, NodeKind,
};
use crate::error::{CausewayError, Result};
use crate::payload::BoardPayload;

/// In-memory model of one board's lists, nodes, edges, comments and
/// assumptions. Entities live in arenas keyed by id; adjacency and
/// per-list sequences are derived on demand. Every mutation validates
/// before touching state, so a returned error means nothing changed.
///
/// The model is single-writer per board: callers serialize mutations
/// themselves and re-snapshot for traversal after each one.
pub struct BoardGraph {
    board: Board,
    lists: HashMap<Uuid, List>,
    nodes: HashMap<Uuid, Node>,
    edges: HashMap<Uuid, Edge>,
    comments: HashMap<Uuid, Comment>,
    assumptions: HashMap<Uuid, Assumption>,
}

impl BoardGraph {
    /// Create an empty graph for a freshly created board.
    pub fn new(board: Board) -> Self {
        Self {
            board,
            lists: HashMap::new(),
            nodes: HashMap::new(),
            edges: HashMap::new(),
            comments: HashMap::new(),
            assumptions: HashMap::new(),
        }
    }

    /// Rehydrate a graph from a materialized board payload, checking
    /// every cross-reference. A payload that violates the structural
    /// invariants (dangling list/node/edge references, self-loop edges,
    /// duplicated ids) is rejected as `Invalid`.
    pub fn hydrate(payload: BoardPayload) -> Result<Self> {
        let mut graph = Self::new(payload.board);

        for list in payload.lists {
            if list.board_id != graph.board.id {
                return Err(CausewayError::Invalid(format!(
                    "list {} belongs to another board",
                    list.id
                )));
            }
            if graph.lists.insert(list.id, list).is_some() {
                return Err(CausewayError::Invalid("duplicate list id".to_string()));
            }
        }

        for node in payload.nodes {
            if !graph.lists.contains_key(&node.list_id) {
                return Err(CausewayError::Invalid(format!(
                    "node {} references unknown list {}",
                    node.id, node.list_id
                )));
            }
            if graph.nodes.insert(node.id, node).is_some() {
                return Err(CausewayError::Invalid("duplicate node id".to_string()));
            }
        }

        for edge in payload.edges {
            if edge.source_id == edge.target_id {
                return Err(CausewayError::Invalid(format!(
                    "edge {} is a self-loop",
                    edge.id
                )));
            }
            if !graph.nodes.contains_key(&edge.source_id)
                || !graph.nodes.contains_key(&edge.target_id)
            {
                return Err(CausewayError::Invalid(format!(
                    "edge {} references an unknown node",
                    edge.id
                )));
            }
            if graph.edges.insert(edge.id, edge).is_some() {
                return Err(CausewayError::Invalid("duplicate edge id".to_string()));
            }
        }

        for comment in payload.comments {
            let anchored = match comment.anchor {
                CommentAnchor::Node(id) => graph.nodes.contains_key(&id),
                CommentAnchor::Edge(id) => graph.edges.contains_key(&id),
            };
            if !anchored {
                return Err(CausewayError::Invalid(format!(
                    "comment {} references an unknown anchor",
                    comment.id
                )));
            }
            graph.comments.insert(comment.id, comment);
        }

        for assumption in payload.assumptions {
            if !graph.edges.contains_key(&assumption.edge_id) {
                return Err(CausewayError::Invalid(format!(
                    "assumption {} references unknown edge {}",
                    assumption.id, assumption.edge_id
                )));
            }
            graph.assumptions.insert(assumption.id, assumption);
        }

        Ok(graph)
    }

    /// Materialize the graph back into the payload shape the external
    /// store persists. Output ordering is deterministic.
    pub fn to_payload(&self) -> BoardPayload {
        let mut lists: Vec<List> = self.lists.values().cloned().collect();
        lists.sort_by_key(|l| l.order);

        let list_order: HashMap<Uuid, u32> = lists.iter().map(|l| (l.id, l.order)).collect();
        let mut nodes: Vec<Node> = self.nodes.values().cloned().collect();
        nodes.sort_by_key(|n| (list_order.get(&n.list_id).copied().unwrap_or(0), n.order));

        let mut edges: Vec<Edge> = self.edges.values().cloned().collect();
        edges.sort_by_key(|e| (e.created_at, e.id));

        let mut comments: Vec<Comment> = self.comments.values().cloned().collect();
        comments.sort_by_key(|c| (c.created_at, c.id));

        let mut assumptions: Vec<Assumption> = self.assumptions.values().cloned().collect();
        assumptions.sort_by_key(|a| (a.created_at, a.id));

        BoardPayload {
            board: self.board.clone(),
            lists,
            nodes,
            edges,
            comments,
            assumptions,
        }
    }

    // ========== Accessors ==========

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn list(&self, id: &Uuid) -> Option<&List> {
        self.lists.get(id)
    }

    pub fn node(&self, id: &Uuid) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn edge(&self, id: &Uuid) -> Option<&Edge> {
        self.edges.get(id)
    }

    pub fn comment(&self, id: &Uuid) -> Option<&Comment> {
        self.comments.get(id)
    }

    pub fn assumption(&self, id: &Uuid) -> Option<&Assumption> {
        self.assumptions.get(id)
    }

    /// Lists in left-to-right board order.
    pub fn lists_ordered(&self) -> Vec<&List> {
        let mut lists: Vec<&List> = self.lists.values().collect();
        lists.sort_by_key(|l| l.order);
        lists
    }

    /// Nodes of one list in top-to-bottom order.
    pub fn nodes_in(&self, list_id: &Uuid) -> Vec<&Node> {
        let mut nodes: Vec<&Node> = self
            .nodes
            .values()
            .filter(|n| n.list_id == *list_id)
            .collect();
        nodes.sort_by_key(|n| n.order);
        nodes
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn comments_for(&self, anchor: CommentAnchor) -> Vec<&Comment> {
        let mut comments: Vec<&Comment> = self
            .comments
            .values()
            .filter(|c| c.anchor == anchor)
            .collect();
        comments.sort_by_key(|c| c.created_at);
        comments
    }

    pub fn assumptions_for(&self, edge_id: &Uuid) -> Vec<&Assumption> {
        let mut assumptions: Vec<&Assumption> = self
            .assumptions
            .values()
            .filter(|a| a.edge_id == *edge_id)
            .collect();
        assumptions.sort_by_key(|a| a.created_at);
        assumptions
    }

    // ========== Board ==========

    pub fn update_board(&mut self, updates: BoardUpdate) -> Result<()> {
        if updates.is_empty() {
            return Err(CausewayError::Invalid("empty update payload".to_string()));
        }
        if let Some(ref title) = updates.title {
            if title.trim().is_empty() {
                return Err(CausewayError::Invalid("title must not be empty".to_string()));
            }
        }

        if let Some(title) = updates.title {
            self.board.title = title;
        }
        if let Some(description) = updates.description {
            self.board.description = description;
        }
        if let Some(is_public) = updates.is_public {
            self.board.is_public = is_public;
        }
        for (key, value) in updates.settings {
            self.board.settings.insert(key, value);
        }
        self.board.updated_at = Utc::now();
        Ok(())
    }

    // ========== Lists ==========

    /// Insert a list at the given position (clamped to the end) and
    /// renumber all lists contiguously from 0.
    pub fn add_list(
        &mut self,
        name: String,
        color: Option<String>,
        kind: ListKind,
        insert_index: usize,
    ) -> Result<Uuid> {
        if name.trim().is_empty() {
            return Err(CausewayError::Invalid("list name must not be empty".to_string()));
        }

        let mut ordered: Vec<Uuid> = self.lists_ordered().iter().map(|l| l.id).collect();
        let index = insert_index.min(ordered.len());

        let mut list = List::new(self.board.id, name, kind, 0);
        list.color = color;
        let id = list.id;

        ordered.insert(index, id);
        self.lists.insert(id, list);
        self.apply_list_order(&ordered);

        debug!(board = %self.board.id, list = %id, index, "list added");
        Ok(id)
    }

    pub fn update_list(&mut self, id: &Uuid, updates: ListUpdate) -> Result<()> {
        if updates.is_empty() {
            return Err(CausewayError::Invalid("empty update payload".to_string()));
        }
        if let Some(ref name) = updates.name {
            if name.trim().is_empty() {
                return Err(CausewayError::Invalid("list name must not be empty".to_string()));
            }
        }
        let list = self
            .lists
            .get_mut(id)
            .ok_or_else(|| CausewayError::NotFound(format!("list {}", id)))?;

        if let Some(name) = updates.name {
            list.name = name;
        }
        if let Some(color) = updates.color {
            list.color = color;
        }
        list.updated_at = Utc::now();
        Ok(())
    }

    /// Delete a list and cascade to its nodes, every edge touching those
    /// nodes, and their comments and assumptions. Fixed lists are
    /// structural and cannot be deleted.
    pub fn delete_list(&mut self, id: &Uuid) -> Result<()> {
        let list = self
            .lists
            .get(id)
            .ok_or_else(|| CausewayError::NotFound(format!("list {}", id)))?;
        if list.kind == ListKind::Fixed {
            return Err(CausewayError::Invalid(
                "fixed lists cannot be deleted".to_string(),
            ));
        }

        let node_ids: Vec<Uuid> = self.nodes_in(id).iter().map(|n| n.id).collect();
        for node_id in &node_ids {
            self.remove_node_cascade(node_id);
        }
        self.lists.remove(id);
        self.renumber_lists();

        debug!(board = %self.board.id, list = %id, nodes = node_ids.len(), "list deleted");
        Ok(())
    }

    /// Splice the dragged list to the target list's position. Dragging a
    /// list onto itself is a successful no-op.
    pub fn reorder_lists(&mut self, dragged: &Uuid, target: &Uuid) -> Result<()> {
        if dragged == target {
            return Ok(());
        }
        let mut ordered: Vec<Uuid> = self.lists_ordered().iter().map(|l| l.id).collect();
        let from = ordered
            .iter()
            .position(|id| id == dragged)
            .ok_or_else(|| CausewayError::NotFound(format!("list {}", dragged)))?;
        let to = ordered
            .iter()
            .position(|id| id == target)
            .ok_or_else(|| CausewayError::NotFound(format!("list {}", target)))?;

        let id = ordered.remove(from);
        ordered.insert(to.min(ordered.len()), id);
        self.apply_list_order(&ordered);
        Ok(())
    }

    // ========== Nodes ==========

    /// Append a node to the end of a list.
    pub fn add_node(&mut self, list_id: &Uuid, title: String, kind: NodeKind) -> Result<Uuid> {
        if title.trim().is_empty() {
            return Err(CausewayError::Invalid("node title must not be empty".to_string()));
        }
        if !self.lists.contains_key(list_id) {
            return Err(CausewayError::NotFound(format!("list {}", list_id)));
        }

        let order = self
            .nodes_in(list_id)
            .last()
            .map(|n| n.order + 1)
            .unwrap_or(0);
        let node = Node::new(*list_id, title, kind, order);
        let id = node.id;
        self.nodes.insert(id, node);

        debug!(board = %self.board.id, node = %id, list = %list_id, "node added");
        Ok(id)
    }

    pub fn update_node(&mut self, id: &Uuid, updates: NodeUpdate) -> Result<()> {
        if updates.is_empty() {
            return Err(CausewayError::Invalid("empty update payload".to_string()));
        }
        if let Some(ref title) = updates.title {
            if title.trim().is_empty() {
                return Err(CausewayError::Invalid("node title must not be empty".to_string()));
            }
        }
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| CausewayError::NotFound(format!("node {}", id)))?;

        if let Some(title) = updates.title {
            node.title = title;
        }
        if let Some(description) = updates.description {
            node.description = description;
        }
        if let Some(kind) = updates.kind {
            node.kind = kind;
        }
        if !updates.add_tags.is_empty() || !updates.remove_tags.is_empty() {
            node.tags.retain(|t| !updates.remove_tags.contains(t));
            for tag in updates.add_tags {
                if !node.tags.contains(&tag) {
                    node.tags.push(tag);
                }
            }
        }
        node.updated_at = Utc::now();
        Ok(())
    }

    /// Move a node to the end of another list and renumber both the old
    /// and the new list contiguously. Edges reference node ids and are
    /// untouched by moves.
    pub fn move_node(&mut self, node_id: &Uuid, target_list_id: &Uuid) -> Result<()> {
        if !self.lists.contains_key(target_list_id) {
            return Err(CausewayError::NotFound(format!("list {}", target_list_id)));
        }
        let source_list_id = self
            .nodes
            .get(node_id)
            .map(|n| n.list_id)
            .ok_or_else(|| CausewayError::NotFound(format!("node {}", node_id)))?;
        if source_list_id == *target_list_id {
            return Ok(());
        }

        let order = self
            .nodes_in(target_list_id)
            .last()
            .map(|n| n.order + 1)
            .unwrap_or(0);
        if let Some(node) = self.nodes.get_mut(node_id) {
            node.list_id = *target_list_id;
            node.order = order;
            node.updated_at = Utc::now();
        }

        self.renumber_nodes_in(&source_list_id);
        self.renumber_nodes_in(target_list_id);
        Ok(())
    }

    /// Splice the dragged node to the target node's position within one
    /// list. Dragging a node onto itself is a successful no-op.
    pub fn reorder_nodes(&mut self, list_id: &Uuid, dragged: &Uuid, target: &Uuid) -> Result<()> {
        if dragged == target {
            return Ok(());
        }
        if !self.lists.contains_key(list_id) {
            return Err(CausewayError::NotFound(format!("list {}", list_id)));
        }
        let mut ordered: Vec<Uuid> = self.nodes_in(list_id).iter().map(|n| n.id).collect();
        let from = ordered
            .iter()
            .position(|id| id == dragged)
            .ok_or_else(|| CausewayError::NotFound(format!("node {} in list {}", dragged, list_id)))?;
        let to = ordered
            .iter()
            .position(|id| id == target)
            .ok_or_else(|| CausewayError::NotFound(format!("node {} in list {}", target, list_id)))?;

        let id = ordered.remove(from);
        ordered.insert(to.min(ordered.len()), id);
        for (index, node_id) in ordered.iter().enumerate() {
            if let Some(node) = self.nodes.get_mut(node_id) {
                node.order = index as u32;
            }
        }
        Ok(())
    }

    /// Delete a node, cascading to every edge where it is an endpoint
    /// (and their comments and assumptions) and every comment anchored
    /// to it. The node's list is renumbered.
    pub fn delete_node(&mut self, id: &Uuid) -> Result<()> {
        let list_id = self
            .nodes
            .get(id)
            .map(|n| n.list_id)
            .ok_or_else(|| CausewayError::NotFound(format!("node {}", id)))?;

        let removed_edges = self.remove_node_cascade(id);
        self.renumber_nodes_in(&list_id);

        debug!(board = %self.board.id, node = %id, edges = removed_edges, "node deleted");
        Ok(())
    }

    // ========== Edges ==========

    /// Create a directed edge. Self-loops are rejected. Creating an edge
    /// that already exists for the same (source, target) pair returns
    /// the existing edge id instead of failing, so client retries are
    /// idempotent.
    pub fn add_edge(&mut self, source_id: &Uuid, target_id: &Uuid, kind: EdgeKind) -> Result<Uuid> {
        if source_id == target_id {
            return Err(CausewayError::Invalid(
                "an edge cannot connect a node to itself".to_string(),
            ));
        }
        if !self.nodes.contains_key(source_id) {
            return Err(CausewayError::NotFound(format!("node {}", source_id)));
        }
        if !self.nodes.contains_key(target_id) {
            return Err(CausewayError::NotFound(format!("node {}", target_id)));
        }

        if let Some(existing) = self
            .edges
            .values()
            .find(|e| e.source_id == *source_id && e.target_id == *target_id)
        {
            debug!(edge = %existing.id, "duplicate edge creation returned existing edge");
            return Ok(existing.id);
        }

        let edge = Edge::new(*source_id, *target_id, kind);
        let id = edge.id;
        self.edges.insert(id, edge);
        Ok(id)
    }

    pub fn update_edge(&mut self, id: &Uuid, updates: EdgeUpdate) -> Result<()> {
        if updates.is_empty() {
            return Err(CausewayError::Invalid("empty update payload".to_string()));
        }
        let edge = self
            .edges
            .get_mut(id)
            .ok_or_else(|| CausewayError::NotFound(format!("edge {}", id)))?;

        if let Some(kind) = updates.kind {
            edge.kind = kind;
        }
        if let Some(label) = updates.label {
            edge.label = label;
        }
        Ok(())
    }

    /// Delete an edge, cascading to its comments and assumptions.
    pub fn delete_edge(&mut self, id: &Uuid) -> Result<()> {
        if !self.edges.contains_key(id) {
            return Err(CausewayError::NotFound(format!("edge {}", id)));
        }
        self.remove_edge_cascade(id);
        Ok(())
    }

    // ========== Comments & assumptions ==========

    pub fn add_comment(
        &mut self,
        anchor: CommentAnchor,
        author: Uuid,
        content: String,
    ) -> Result<Uuid> {
        if content.trim().is_empty() {
            return Err(CausewayError::Invalid(
                "comment content must not be empty".to_string(),
            ));
        }
        let anchored = match anchor {
            CommentAnchor::Node(id) => self.nodes.contains_key(&id),
            CommentAnchor::Edge(id) => self.edges.contains_key(&id),
        };
        if !anchored {
            return Err(CausewayError::NotFound("comment anchor".to_string()));
        }

        let comment = Comment::new(anchor, author, content);
        let id = comment.id;
        self.comments.insert(id, comment);
        Ok(id)
    }

    /// Flip a comment between open and solved. The authorship check
    /// belongs to the gate; the model only requires the comment to
    /// exist.
    pub fn set_comment_status(&mut self, id: &Uuid, status: CommentStatus) -> Result<()> {
        let comment = self
            .comments
            .get_mut(id)
            .ok_or_else(|| CausewayError::NotFound(format!("comment {}", id)))?;
        comment.status = status;
        comment.updated_at = Utc::now();
        Ok(())
    }

    pub fn add_assumption(
        &mut self,
        edge_id: &Uuid,
        author: Uuid,
        content: String,
        strength: AssumptionStrength,
    ) -> Result<Uuid> {
        if content.trim().is_empty() {
            return Err(CausewayError::Invalid(
                "assumption content must not be empty".to_string(),
            ));
        }
        if !self.edges.contains_key(edge_id) {
            return Err(CausewayError::NotFound(format!("edge {}", edge_id)));
        }

        let mut assumption = Assumption::new(*edge_id, author, content);
        assumption.strength = strength;
        let id = assumption.id;
        self.assumptions.insert(id, assumption);
        Ok(id)
    }

    // ========== Internal helpers ==========

    fn apply_list_order(&mut self, ordered: &[Uuid]) {
        for (index, id) in ordered.iter().enumerate() {
            if let Some(list) = self.lists.get_mut(id) {
                list.order = index as u32;
            }
        }
    }

    fn renumber_lists(&mut self) {
        let ordered: Vec<Uuid> = self.lists_ordered().iter().map(|l| l.id).collect();
        self.apply_list_order(&ordered);
    }

    fn renumber_nodes_in(&mut self, list_id: &Uuid) {
        let ordered: Vec<Uuid> = self.nodes_in(list_id).iter().map(|n| n.id).collect();
        for (index, id) in ordered.iter().enumerate() {
            if let Some(node) = self.nodes.get_mut(id) {
                node.order = index as u32;
            }
        }
    }

    /// Remove a node and everything hanging off it. Returns the number
    /// of edges that went with it. Does not renumber the node's list.
    fn remove_node_cascade(&mut self, node_id: &Uuid) -> usize {
        let edge_ids: Vec<Uuid> = self
            .edges
            .values()
            .filter(|e| e.source_id == *node_id || e.target_id == *node_id)
            .map(|e| e.id)
            .collect();
        for edge_id in &edge_ids {
            self.remove_edge_cascade(edge_id);
        }
        self.comments
            .retain(|_, c| c.anchor != CommentAnchor::Node(*node_id));
        self.nodes.remove(node_id);
        edge_ids.len()
    }

    fn remove_edge_cascade(&mut self, edge_id: &Uuid) {
        self.comments
            .retain(|_, c| c.anchor != CommentAnchor::Edge(*edge_id));
        self.assumptions.retain(|_, a| a.edge_id != *edge_id);
        self.edges.remove(edge_id);
    }
}
