use crate::{Edge, EventType, GraphEvent, Node, NodeUpdate, Point};
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// In-memory owner of all nodes and edges.
///
/// Nodes are kept in paint order: the last node is drawn on top and wins
/// hit tests.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    nodes: Vec<Node>,

    edges: Vec<Edge>,

    /// Event log for history tracking
    events: Vec<GraphEvent>,
}

/// Serializable copy of the store contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl GraphStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Node Operations ==========

    /// Append a fully-formed node. Reusing an id is a caller bug.
    pub fn add_node(&mut self, node: Node) -> Result<()> {
        if self.contains_node(node.id) {
            return Err(anyhow!("Node already exists: {}", node.id));
        }

        self.log_event(EventType::NodeAdded {
            id: node.id,
            role: node.role,
            position: node.position,
        });

        self.nodes.push(node);
        Ok(())
    }

    /// Get a node by ID
    pub fn get_node(&self, id: Ulid) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// All nodes in paint order (back to front)
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn contains_node(&self, id: Ulid) -> bool {
        self.get_node(id).is_some()
    }

    /// Merge fields into an existing node
    pub fn update_node(&mut self, id: Ulid, update: NodeUpdate) -> Result<()> {
        let node = self
            .nodes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| anyhow!("Node not found: {}", id))?;

        node.apply(&update);

        self.log_event(EventType::NodeUpdated { id, update });

        Ok(())
    }

    /// Delete a node and every edge touching it
    pub fn remove_node(&mut self, id: Ulid) -> Result<Node> {
        let index = self
            .nodes
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| anyhow!("Node not found: {}", id))?;

        self.remove_edges_for_node(id);

        let node = self.nodes.remove(index);
        self.log_event(EventType::NodeRemoved { id });

        Ok(node)
    }

    /// Topmost node containing `point`, skipping `exclude`
    pub fn node_at(&self, point: Point, exclude: Option<Ulid>) -> Option<&Node> {
        self.nodes
            .iter()
            .rev()
            .filter(|n| Some(n.id) != exclude)
            .find(|n| n.bounds().contains_point(point))
    }

    // ========== Edge Operations ==========

    /// Append an edge. Invariant checks are the caller's job.
    pub fn add_edge(&mut self, edge: Edge) {
        self.log_event(EventType::EdgeAdded {
            id: edge.id,
            source_id: edge.source_id,
            target_id: edge.target_id,
        });

        self.edges.push(edge);
    }

    /// Get all edges
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Delete an edge
    pub fn remove_edge(&mut self, id: Ulid) -> Result<Edge> {
        let index = self
            .edges
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| anyhow!("Edge not found: {}", id))?;

        let edge = self.edges.remove(index);
        self.log_event(EventType::EdgeRemoved {
            id: edge.id,
            source_id: edge.source_id,
            target_id: edge.target_id,
        });

        Ok(edge)
    }

    /// Delete every edge touching a node, returning how many went
    pub fn remove_edges_for_node(&mut self, node_id: Ulid) -> usize {
        let (removed, kept): (Vec<Edge>, Vec<Edge>) = std::mem::take(&mut self.edges)
            .into_iter()
            .partition(|e| e.involves(node_id));
        self.edges = kept;

        for edge in &removed {
            self.log_event(EventType::EdgeRemoved {
                id: edge.id,
                source_id: edge.source_id,
                target_id: edge.target_id,
            });
        }

        removed.len()
    }

    /// Get all edges starting from a node
    pub fn outgoing_edges(&self, source_id: Ulid) -> Vec<&Edge> {
        self.edges.iter().filter(|e| e.starts_from(source_id)).collect()
    }

    /// Get all edges ending at a node
    pub fn incoming_edges(&self, target_id: Ulid) -> Vec<&Edge> {
        self.edges.iter().filter(|e| e.ends_at(target_id)).collect()
    }

    /// Existing nodes feeding `target_id`, one entry per incoming edge
    pub fn source_nodes(&self, target_id: Ulid) -> Vec<&Node> {
        self.incoming_edges(target_id)
            .into_iter()
            .filter_map(|e| self.get_node(e.source_id))
            .collect()
    }

    // ========== Misc ==========

    fn log_event(&mut self, event: EventType) {
        self.events.push(GraphEvent::new(event));
    }

    /// Get all events
    pub fn events(&self) -> &[GraphEvent] {
        &self.events
    }

    /// Clear event history
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ContentType, NodeRole};

    fn add(store: &mut GraphStore, x: f32, y: f32) -> Ulid {
        let node = Node::new(NodeRole::Source, Point::new(x, y));
        let id = node.id;
        store.add_node(node).unwrap();
        id
    }

    #[test]
    fn test_store_creation() {
        let store = GraphStore::new();
        assert_eq!(store.node_count(), 0);
        assert_eq!(store.edge_count(), 0);
        assert!(store.events().is_empty());
    }

    #[test]
    fn test_node_crud() {
        let mut store = GraphStore::new();
        let id = add(&mut store, 0.0, 0.0);

        assert!(store.contains_node(id));

        store
            .update_node(id, NodeUpdate::content("Updated"))
            .unwrap();
        assert_eq!(store.get_node(id).unwrap().content, "Updated");

        let removed = store.remove_node(id).unwrap();
        assert_eq!(removed.id, id);
        assert!(store.get_node(id).is_none());
    }

    #[test]
    fn test_duplicate_node_id_rejected() {
        let mut store = GraphStore::new();
        let node = Node::new(NodeRole::Source, Point::default());
        store.add_node(node.clone()).unwrap();

        assert!(store.add_node(node).is_err());
        assert_eq!(store.node_count(), 1);
    }

    #[test]
    fn test_missing_ids_report_not_found() {
        let mut store = GraphStore::new();
        let ghost = Ulid::new();

        assert!(store.update_node(ghost, NodeUpdate::editing(true)).is_err());
        assert!(store.remove_node(ghost).is_err());
        assert!(store.remove_edge(ghost).is_err());
        assert!(store.events().is_empty());
    }

    #[test]
    fn test_remove_node_cascades_edges() {
        let mut store = GraphStore::new();
        let a = add(&mut store, 0.0, 0.0);
        let b = add(&mut store, 300.0, 0.0);
        let c = add(&mut store, 600.0, 0.0);

        store.add_edge(Edge::new(a, b));
        store.add_edge(Edge::new(b, c));
        store.add_edge(Edge::new(a, c));

        store.remove_node(b).unwrap();

        assert_eq!(store.edge_count(), 1);
        assert!(store.edges().iter().all(|e| !e.involves(b)));
        assert_eq!(store.edges()[0].source_id, a);
        assert_eq!(store.edges()[0].target_id, c);
    }

    #[test]
    fn test_remove_edge() {
        let mut store = GraphStore::new();
        let a = add(&mut store, 0.0, 0.0);
        let b = add(&mut store, 300.0, 0.0);
        let edge = Edge::new(a, b);
        let edge_id = edge.id;
        store.add_edge(edge);

        let removed = store.remove_edge(edge_id).unwrap();
        assert_eq!(removed.id, edge_id);
        assert_eq!(store.edge_count(), 0);
        // Nodes are untouched
        assert_eq!(store.node_count(), 2);
    }

    #[test]
    fn test_node_at_prefers_topmost() {
        let mut store = GraphStore::new();
        let bottom = add(&mut store, 0.0, 0.0);
        let top = add(&mut store, 100.0, 50.0);
        let overlap = Point::new(150.0, 80.0);

        assert_eq!(store.node_at(overlap, None).unwrap().id, top);
        assert_eq!(store.node_at(overlap, Some(top)).unwrap().id, bottom);
        assert!(store.node_at(Point::new(1000.0, 1000.0), None).is_none());
    }

    #[test]
    fn test_source_nodes_skip_missing() {
        let mut store = GraphStore::new();
        let a = add(&mut store, 0.0, 0.0);
        let b = add(&mut store, 300.0, 0.0);
        store.add_edge(Edge::new(a, b));
        // Store does not validate; a dangling source is simply skipped
        store.add_edge(Edge::new(Ulid::new(), b));

        let sources = store.source_nodes(b);
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].id, a);
        assert_eq!(store.incoming_edges(b).len(), 2);
        assert_eq!(store.outgoing_edges(a).len(), 1);
    }

    #[test]
    fn test_event_logging() {
        let mut store = GraphStore::new();
        let a = add(&mut store, 0.0, 0.0);
        let b = add(&mut store, 300.0, 0.0);
        store.add_edge(Edge::new(a, b));
        store.remove_node(a).unwrap();

        let kinds: Vec<_> = store
            .events()
            .iter()
            .map(|e| match &e.event {
                EventType::NodeAdded { .. } => "node+",
                EventType::NodeUpdated { .. } => "node~",
                EventType::NodeRemoved { .. } => "node-",
                EventType::EdgeAdded { .. } => "edge+",
                EventType::EdgeRemoved { .. } => "edge-",
            })
            .collect();
        assert_eq!(kinds, vec!["node+", "node+", "edge+", "edge-", "node-"]);

        store.clear_events();
        assert!(store.events().is_empty());
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut store = GraphStore::new();
        let a = add(&mut store, 0.0, 0.0);
        let b = add(&mut store, 300.0, 0.0);
        store
            .update_node(a, NodeUpdate {
                content_type: Some(ContentType::Link),
                content: Some("https://example.com".into()),
                ..Default::default()
            })
            .unwrap();
        store.add_edge(Edge::new(a, b));

        let json = serde_json::to_string(&store.snapshot()).unwrap();
        let restored: GraphSnapshot = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, store.snapshot());
        assert_eq!(restored.nodes[0].content_type, ContentType::Link);
    }
}
