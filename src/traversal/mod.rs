//! Reachability and view-mode computation over an immutable graph
//! snapshot.
//!
//! A `Traversal` is built from a `BoardGraph` after every mutation and
//! answers upstream/downstream/connected queries by worklist BFS over
//! prebuilt adjacency maps. Cycles are allowed; a visited guard keeps
//! every walk terminating. The two view modes (causal path and tag
//! filter) are independent primitives; when both are active the caller
//! intersects their visible sets for display.

use std::collections::{HashMap, HashSet, VecDeque};

use uuid::Uuid;

use crate::entity::Edge;
use crate::graph::BoardGraph;

/// Adjacency snapshot of one board graph. Cheap to rebuild; callers
/// rebuild after any mutation rather than mutating in place.
pub struct Traversal<'a> {
    graph: &'a BoardGraph,
    forward: HashMap<Uuid, Vec<Uuid>>,
    reverse: HashMap<Uuid, Vec<Uuid>>,
}

impl<'a> Traversal<'a> {
    pub fn new(graph: &'a BoardGraph) -> Self {
        let mut forward: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        let mut reverse: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for edge in graph.edges() {
            forward.entry(edge.source_id).or_default().push(edge.target_id);
            reverse.entry(edge.target_id).or_default().push(edge.source_id);
        }
        Self {
            graph,
            forward,
            reverse,
        }
    }

    /// All nodes reachable by following edges backward from `node`.
    /// Includes `node` itself only when a cycle leads back to it. An
    /// unknown id yields an empty set; the node may have been deleted
    /// under the caller.
    pub fn upstream(&self, node: &Uuid) -> HashSet<Uuid> {
        self.walk(node, &self.reverse)
    }

    /// All nodes reachable by following edges forward from `node`.
    /// Same contract as `upstream`.
    pub fn downstream(&self, node: &Uuid) -> HashSet<Uuid> {
        self.walk(node, &self.forward)
    }

    /// `upstream(node) ∪ {node} ∪ downstream(node)`; empty for an
    /// unknown id.
    pub fn connected(&self, node: &Uuid) -> HashSet<Uuid> {
        if self.graph.node(node).is_none() {
            return HashSet::new();
        }
        let mut set = self.upstream(node);
        set.insert(*node);
        set.extend(self.downstream(node));
        set
    }

    fn walk(&self, start: &Uuid, index: &HashMap<Uuid, Vec<Uuid>>) -> HashSet<Uuid> {
        if self.graph.node(start).is_none() {
            return HashSet::new();
        }

        let mut result = HashSet::new();
        let mut enqueued = HashSet::new();
        let mut queue = VecDeque::new();

        // The start node is not seeded as visited: it belongs in the
        // result exactly when a cycle leads back to it.
        for neighbor in index.get(start).into_iter().flatten() {
            if enqueued.insert(*neighbor) {
                queue.push_back(*neighbor);
            }
        }

        while let Some(current) = queue.pop_front() {
            result.insert(current);
            for neighbor in index.get(&current).into_iter().flatten() {
                if enqueued.insert(*neighbor) {
                    queue.push_back(*neighbor);
                }
            }
        }

        result
    }

    /// Permanent rendering rule: an edge points forward iff its source
    /// list does not come after its target list. Backward edges stay in
    /// the model but are never displayed.
    pub fn is_forward(&self, edge: &Edge) -> bool {
        let order_of = |node_id: &Uuid| {
            self.graph
                .node(node_id)
                .and_then(|n| self.graph.list(&n.list_id))
                .map(|l| l.order)
        };
        match (order_of(&edge.source_id), order_of(&edge.target_id)) {
            (Some(source), Some(target)) => source <= target,
            _ => false,
        }
    }

    /// Ids of the edges to display: forward edges whose endpoints are
    /// both in the active mode's visible set (all forward edges when no
    /// mode is active).
    pub fn visible_edges(&self, visible_nodes: Option<&HashSet<Uuid>>) -> Vec<Uuid> {
        self.graph
            .edges()
            .filter(|e| self.is_forward(e))
            .filter(|e| match visible_nodes {
                Some(set) => set.contains(&e.source_id) && set.contains(&e.target_id),
                None => true,
            })
            .map(|e| e.id)
            .collect()
    }
}

/// Multi-focal causal-path mode. The visible set is the intersection of
/// `connected(f)` over all focal nodes, with the focal ids themselves
/// unioned back in so a focal never disappears from its own view. The
/// set is recomputed from the current focal set on every query, which
/// makes visibility depend only on membership, never on the order focals
/// were added or removed.
#[derive(Debug, Clone, Default)]
pub struct CausalPath {
    focals: Vec<Uuid>,
}

impl CausalPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty focal set means the mode is off.
    pub fn is_active(&self) -> bool {
        !self.focals.is_empty()
    }

    pub fn focals(&self) -> &[Uuid] {
        &self.focals
    }

    pub fn add_focal(&mut self, node: Uuid) {
        if !self.focals.contains(&node) {
            self.focals.push(node);
        }
    }

    /// Removing the last focal clears the mode entirely.
    pub fn remove_focal(&mut self, node: &Uuid) {
        self.focals.retain(|f| f != node);
    }

    /// The visible node set, or `None` when the mode is off.
    pub fn visible(&self, traversal: &Traversal<'_>) -> Option<HashSet<Uuid>> {
        let (first, rest) = self.focals.split_first()?;

        let mut visible = traversal.connected(first);
        for focal in rest {
            let connected = traversal.connected(focal);
            visible.retain(|id| connected.contains(id));
        }
        visible.extend(self.focals.iter().copied());
        Some(visible)
    }
}

/// Tag-filter mode. The visible set is the union of `connected(n)` over
/// every node whose tag set intersects the selection, so a matching
/// node pulls its whole causal neighborhood into view.
#[derive(Debug, Clone, Default)]
pub struct TagFilter {
    tags: HashSet<String>,
}

impl TagFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty selection means the mode is off.
    pub fn is_active(&self) -> bool {
        !self.tags.is_empty()
    }

    pub fn tags(&self) -> &HashSet<String> {
        &self.tags
    }

    pub fn select(&mut self, tag: String) {
        self.tags.insert(tag);
    }

    pub fn deselect(&mut self, tag: &str) {
        self.tags.remove(tag);
    }

    pub fn clear(&mut self) {
        self.tags.clear();
    }

    /// The visible node set, or `None` when the mode is off.
    pub fn visible(&self, traversal: &Traversal<'_>) -> Option<HashSet<Uuid>> {
        if !self.is_active() {
            return None;
        }

        let mut visible = HashSet::new();
        for node in traversal.graph.nodes() {
            if node.tags.iter().any(|t| self.tags.contains(t)) {
                visible.extend(traversal.connected(&node.id));
            }
        }
        Some(visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Board, EdgeKind, ListKind, NodeKind};
    use crate::graph::NodeUpdate;

    fn chain_graph() -> (BoardGraph, Vec<Uuid>) {
        let board = Board::new("Plan".to_string(), Uuid::new_v4());
        let mut graph = BoardGraph::new(board);
        let list = graph
            .add_list("Stage".to_string(), None, ListKind::Fixed, 0)
            .unwrap();
        let ids: Vec<Uuid> = ["A", "B", "C", "D"]
            .iter()
            .map(|t| graph.add_node(&list, t.to_string(), NodeKind::Activity).unwrap())
            .collect();
        (graph, ids)
    }

    #[test]
    fn test_upstream_downstream_on_chain() {
        let (mut graph, ids) = chain_graph();
        graph.add_edge(&ids[0], &ids[1], EdgeKind::LeadsTo).unwrap();
        graph.add_edge(&ids[1], &ids[2], EdgeKind::LeadsTo).unwrap();

        let t = Traversal::new(&graph);
        assert_eq!(t.downstream(&ids[0]), HashSet::from([ids[1], ids[2]]));
        assert_eq!(t.upstream(&ids[2]), HashSet::from([ids[0], ids[1]]));
        assert_eq!(t.connected(&ids[1]), HashSet::from([ids[0], ids[1], ids[2]]));
        assert!(t.downstream(&ids[2]).is_empty());
    }

    #[test]
    fn test_cycle_terminates_and_includes_start() {
        let (mut graph, ids) = chain_graph();
        graph.add_edge(&ids[0], &ids[1], EdgeKind::LeadsTo).unwrap();
        graph.add_edge(&ids[1], &ids[2], EdgeKind::LeadsTo).unwrap();
        graph.add_edge(&ids[2], &ids[0], EdgeKind::LeadsTo).unwrap();

        let t = Traversal::new(&graph);
        let expected = HashSet::from([ids[0], ids[1], ids[2]]);
        assert_eq!(t.upstream(&ids[0]), expected);
        assert_eq!(t.downstream(&ids[0]), expected);
        assert_eq!(t.connected(&ids[0]), expected);
    }

    #[test]
    fn test_unknown_node_yields_empty_sets() {
        let (graph, _) = chain_graph();
        let t = Traversal::new(&graph);
        let ghost = Uuid::new_v4();

        assert!(t.upstream(&ghost).is_empty());
        assert!(t.downstream(&ghost).is_empty());
        assert!(t.connected(&ghost).is_empty());
    }

    #[test]
    fn test_acyclic_start_not_in_own_upstream() {
        let (mut graph, ids) = chain_graph();
        graph.add_edge(&ids[0], &ids[1], EdgeKind::LeadsTo).unwrap();

        let t = Traversal::new(&graph);
        assert!(!t.upstream(&ids[1]).contains(&ids[1]));
        assert!(!t.downstream(&ids[0]).contains(&ids[0]));
    }

    #[test]
    fn test_causal_path_single_focal_shows_connected() {
        let (mut graph, ids) = chain_graph();
        graph.add_edge(&ids[0], &ids[1], EdgeKind::LeadsTo).unwrap();
        graph.add_edge(&ids[1], &ids[2], EdgeKind::LeadsTo).unwrap();

        let t = Traversal::new(&graph);
        let mut mode = CausalPath::new();
        assert!(mode.visible(&t).is_none());

        mode.add_focal(ids[0]);
        assert_eq!(
            mode.visible(&t).unwrap(),
            HashSet::from([ids[0], ids[1], ids[2]])
        );
    }

    #[test]
    fn test_causal_path_intersection_keeps_focals_visible() {
        // A -> B, C -> D: two disjoint chains. Focusing A and C has an
        // empty intersection, but both focals stay visible.
        let (mut graph, ids) = chain_graph();
        graph.add_edge(&ids[0], &ids[1], EdgeKind::LeadsTo).unwrap();
        graph.add_edge(&ids[2], &ids[3], EdgeKind::LeadsTo).unwrap();

        let t = Traversal::new(&graph);
        let mut mode = CausalPath::new();
        mode.add_focal(ids[0]);
        mode.add_focal(ids[2]);

        assert_eq!(mode.visible(&t).unwrap(), HashSet::from([ids[0], ids[2]]));
    }

    #[test]
    fn test_causal_path_removal_recomputes_and_clears() {
        let (mut graph, ids) = chain_graph();
        graph.add_edge(&ids[0], &ids[1], EdgeKind::LeadsTo).unwrap();

        let t = Traversal::new(&graph);
        let mut mode = CausalPath::new();
        mode.add_focal(ids[0]);
        mode.add_focal(ids[3]);

        mode.remove_focal(&ids[3]);
        assert_eq!(mode.visible(&t).unwrap(), HashSet::from([ids[0], ids[1]]));

        mode.remove_focal(&ids[0]);
        assert!(!mode.is_active());
        assert!(mode.visible(&t).is_none());
    }

    #[test]
    fn test_causal_path_order_independent() {
        let (mut graph, ids) = chain_graph();
        graph.add_edge(&ids[0], &ids[1], EdgeKind::LeadsTo).unwrap();
        graph.add_edge(&ids[1], &ids[2], EdgeKind::LeadsTo).unwrap();
        graph.add_edge(&ids[3], &ids[1], EdgeKind::Enables).unwrap();

        let t = Traversal::new(&graph);
        let mut xy = CausalPath::new();
        xy.add_focal(ids[0]);
        xy.add_focal(ids[3]);
        let mut yx = CausalPath::new();
        yx.add_focal(ids[3]);
        yx.add_focal(ids[0]);

        assert_eq!(xy.visible(&t), yx.visible(&t));
    }

    #[test]
    fn test_tag_filter_pulls_in_connected_nodes() {
        // N3 -> N4 -> N5 with only N3 tagged.
        let (mut graph, ids) = chain_graph();
        graph.add_edge(&ids[0], &ids[1], EdgeKind::LeadsTo).unwrap();
        graph.add_edge(&ids[1], &ids[2], EdgeKind::LeadsTo).unwrap();
        graph
            .update_node(
                &ids[0],
                NodeUpdate {
                    add_tags: vec!["Health".to_string()],
                    ..Default::default()
                },
            )
            .unwrap();

        let t = Traversal::new(&graph);
        let mut filter = TagFilter::new();
        assert!(filter.visible(&t).is_none());

        filter.select("Health".to_string());
        assert_eq!(
            filter.visible(&t).unwrap(),
            HashSet::from([ids[0], ids[1], ids[2]])
        );

        filter.deselect("Health");
        assert!(!filter.is_active());
    }

    #[test]
    fn test_forward_edge_visible_backward_edge_hidden() {
        let board = Board::new("Plan".to_string(), Uuid::new_v4());
        let mut graph = BoardGraph::new(board);
        let l1 = graph.add_list("L1".to_string(), None, ListKind::Fixed, 0).unwrap();
        let l2 = graph.add_list("L2".to_string(), None, ListKind::Fixed, 1).unwrap();
        let n1 = graph.add_node(&l1, "N1".to_string(), NodeKind::Activity).unwrap();
        let n2 = graph.add_node(&l2, "N2".to_string(), NodeKind::Outcome).unwrap();

        let forward = graph.add_edge(&n1, &n2, EdgeKind::LeadsTo).unwrap();
        let backward = graph.add_edge(&n2, &n1, EdgeKind::LeadsTo).unwrap();

        let t = Traversal::new(&graph);
        let visible = t.visible_edges(None);
        assert!(visible.contains(&forward));
        assert!(!visible.contains(&backward));
        // Hidden, not deleted.
        assert!(graph.edge(&backward).is_some());
    }

    #[test]
    fn test_same_list_edge_counts_as_forward() {
        let (mut graph, ids) = chain_graph();
        let edge = graph.add_edge(&ids[0], &ids[1], EdgeKind::LeadsTo).unwrap();

        let t = Traversal::new(&graph);
        assert!(t.visible_edges(None).contains(&edge));
    }

    #[test]
    fn test_visible_edges_respects_mode_set() {
        let (mut graph, ids) = chain_graph();
        let ab = graph.add_edge(&ids[0], &ids[1], EdgeKind::LeadsTo).unwrap();
        let cd = graph.add_edge(&ids[2], &ids[3], EdgeKind::LeadsTo).unwrap();

        let t = Traversal::new(&graph);
        let visible_nodes = HashSet::from([ids[0], ids[1]]);
        let visible = t.visible_edges(Some(&visible_nodes));

        assert!(visible.contains(&ab));
        assert!(!visible.contains(&cd));
    }
}
