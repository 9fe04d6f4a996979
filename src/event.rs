use crate::{NodeRole, NodeUpdate, Point};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// A graph mutation with timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEvent {
    pub timestamp: DateTime<Utc>,
    pub event: EventType,
}

impl GraphEvent {
    /// Create a new event with the current timestamp
    pub fn new(event: EventType) -> Self {
        Self {
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Mutations recorded by the graph store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum EventType {
    NodeAdded {
        id: Ulid,
        role: NodeRole,
        position: Point,
    },

    NodeUpdated {
        id: Ulid,
        update: NodeUpdate,
    },

    /// Edges removed by the cascade are logged separately, before this event
    NodeRemoved {
        id: Ulid,
    },

    EdgeAdded {
        id: Ulid,
        source_id: Ulid,
        target_id: Ulid,
    },

    EdgeRemoved {
        id: Ulid,
        source_id: Ulid,
        target_id: Ulid,
    },
}
