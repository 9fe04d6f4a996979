// Helper functions to build graphs and drive gestures in integration tests

#![allow(dead_code)]

use node_canvas::{
    CanvasController, ContentType, EditorConfig, Edge, GraphStore, InputEvent, Node, NodeRole,
    Outcome, Point, RecordingHooks,
};
use std::time::{Duration, Instant};
use ulid::Ulid;

/// Two empty nodes, A at (100,100) and B at (400,100)
pub fn side_by_side() -> (GraphStore, Ulid, Ulid) {
    let mut store = GraphStore::new();
    let a = Node::new(NodeRole::Source, Point::new(100.0, 100.0));
    let b = Node::new(NodeRole::Output, Point::new(400.0, 100.0));
    let (a_id, b_id) = (a.id, b.id);
    store.add_node(a).unwrap();
    store.add_node(b).unwrap();
    (store, a_id, b_id)
}

/// `count` sources stacked vertically, all feeding one target on the right
pub fn fan_in(count: usize) -> (GraphStore, Vec<Ulid>, Ulid) {
    let mut store = GraphStore::new();
    let target = Node::new(NodeRole::Output, Point::new(500.0, 100.0));
    let target_id = target.id;
    store.add_node(target).unwrap();

    let sources = (0..count)
        .map(|i| {
            let node = Node::new(NodeRole::Source, Point::new(100.0, 100.0 + i as f32 * 150.0))
                .with_content(ContentType::Text, format!("source {}", i));
            let id = node.id;
            store.add_node(node).unwrap();
            store.add_edge(Edge::new(id, target_id));
            id
        })
        .collect();

    (store, sources, target_id)
}

/// Controller plus a fixed time origin, so events can be sent at
/// millisecond offsets
pub struct Session {
    pub canvas: CanvasController<RecordingHooks>,
    pub t0: Instant,
}

impl Session {
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            canvas: CanvasController::new(config, RecordingHooks::new()),
            t0: Instant::now(),
        }
    }

    pub fn at(&self, ms: u64) -> Instant {
        self.t0 + Duration::from_millis(ms)
    }

    pub fn send(&mut self, event: InputEvent, ms: u64) -> Outcome {
        let now = self.at(ms);
        self.canvas.handle_input(event, now)
    }

    /// Create a node by double-clicking where its centre should be
    pub fn create_node(&mut self, x: f32, y: f32, ms: u64) -> Ulid {
        match self.send(InputEvent::double_click(x + 120.0, y + 50.0), ms) {
            Outcome::NodeCreated(id) => id,
            other => panic!("Expected NodeCreated, got {:?}", other),
        }
    }

    /// Press, move and release in three events 5ms apart
    pub fn drag(&mut self, from: Point, to: Point, ms: u64) -> Outcome {
        self.send(InputEvent::PointerDown { point: from }, ms);
        self.send(InputEvent::PointerMove { point: to }, ms + 5);
        self.send(InputEvent::PointerUp { point: to }, ms + 10)
    }

    pub fn node(&self, id: Ulid) -> &Node {
        self.canvas.store().get_node(id).unwrap()
    }
}
