use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Directed connection between two nodes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Edge {
    pub id: Ulid,

    /// Node the connection was dragged FROM
    pub source_id: Ulid,

    /// Node the connection was dropped ON
    pub target_id: Ulid,
}

impl Edge {
    /// Create a new edge with a fresh id
    pub fn new(source_id: Ulid, target_id: Ulid) -> Self {
        Self {
            id: Ulid::new(),
            source_id,
            target_id,
        }
    }

    /// Check if this edge involves a given node
    pub fn involves(&self, node_id: Ulid) -> bool {
        self.source_id == node_id || self.target_id == node_id
    }

    /// Check if this edge starts from a given node
    pub fn starts_from(&self, node_id: Ulid) -> bool {
        self.source_id == node_id
    }

    /// Check if this edge ends at a given node
    pub fn ends_at(&self, node_id: Ulid) -> bool {
        self.target_id == node_id
    }
}
