//! Gesture state machine.
//!
//! Turns pointer, double-click and editor events into `GraphStore`
//! mutations. The machine holds only transient gesture state; node and edge
//! data always live in the store.

use crate::validation::{check_connection, ConnectionRefusal};
use crate::{
    Edge, EditKey, EditorConfig, GraphStore, InputEvent, Node, NodeRole, NodeUpdate, Point,
    PresentationHooks, NODE_HEIGHT, NODE_WIDTH,
};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use ulid::Ulid;

/// Identifies one connection gesture and its suppression window
pub type GestureId = u64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionState {
    Idle,

    DraggingNode {
        node_id: Ulid,
        /// Pointer position relative to the node's top-left corner
        offset: Point,
    },

    DraggingConnection {
        gesture: GestureId,
        source_id: Ulid,
        pointer: Point,
        /// False until the first pointer move after the press
        moved: bool,
    },

    /// Cooldown after a connection gesture; canvas double-clicks are ignored
    SuppressClick { gesture: GestureId },
}

/// What a single event did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    Ignored,
    DragStarted(Ulid),
    NodeMoved(Ulid),
    DragEnded(Ulid),
    ConnectionStarted(Ulid),
    PointerTracked,
    EdgeCreated { edge_id: Ulid, target_id: Ulid },
    ConnectionRefused(ConnectionRefusal),
    ConnectionCancelled,
    NodeCreated(Ulid),
    /// Canvas double-click swallowed by an active gesture or cooldown
    Suppressed,
    EditingStarted(Ulid),
    EditingCommitted(Ulid),
    EditingCancelled(Ulid),
    TextChanged(Ulid),
}

/// One-shot return to `Idle`, ignored if another gesture took over
#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingReset {
    gesture: GestureId,
    due: Instant,
}

#[derive(Debug, Clone)]
pub struct InteractionMachine {
    state: InteractionState,
    border_hit_width: f32,
    suppress_window: Duration,
    last_gesture: GestureId,
    pending_reset: Option<PendingReset>,
    /// Buffer value at the start of each edit, restored on Escape
    edit_origins: HashMap<Ulid, String>,
}

impl Default for InteractionMachine {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl InteractionMachine {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            state: InteractionState::Idle,
            border_hit_width: config.border_hit_width,
            suppress_window: config.suppress_window(),
            last_gesture: 0,
            pending_reset: None,
            edit_origins: HashMap::new(),
        }
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    /// True while a drag owns pointer-move events
    pub fn is_pointer_captured(&self) -> bool {
        matches!(
            self.state,
            InteractionState::DraggingNode { .. } | InteractionState::DraggingConnection { .. }
        )
    }

    /// Source and live pointer of the connection being dragged
    pub fn drag_connection(&self) -> Option<(Ulid, Point, bool)> {
        match self.state {
            InteractionState::DraggingConnection {
                source_id,
                pointer,
                moved,
                ..
            } => Some((source_id, pointer, moved)),
            _ => None,
        }
    }

    /// Deadline of the pending suppression reset, if any
    pub fn reset_due(&self) -> Option<Instant> {
        self.pending_reset.map(|p| p.due)
    }

    /// Run the deferred `SuppressClick -> Idle` transition if it is due.
    /// Returns true when the state changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(pending) = self.pending_reset else {
            return false;
        };
        if now < pending.due {
            return false;
        }

        self.pending_reset = None;
        if self.state == (InteractionState::SuppressClick { gesture: pending.gesture }) {
            log::debug!("suppression window for gesture {} expired", pending.gesture);
            self.state = InteractionState::Idle;
            true
        } else {
            false
        }
    }

    pub fn handle(
        &mut self,
        store: &mut GraphStore,
        hooks: &mut dyn PresentationHooks,
        event: InputEvent,
        now: Instant,
    ) -> Outcome {
        self.tick(now);

        match event {
            InputEvent::PointerDown { point } => self.pointer_down(store, hooks, point),
            InputEvent::PointerMove { point } => self.pointer_move(store, hooks, point),
            InputEvent::PointerUp { point } => self.pointer_up(store, hooks, point, now),
            InputEvent::DoubleClick { point } => self.double_click(store, hooks, point),
            InputEvent::Key {
                node_id,
                key: EditKey::Enter,
                shift: false,
            } => self.commit_editing(store, hooks, node_id),
            InputEvent::Key {
                node_id,
                key: EditKey::Escape,
                ..
            } => self.cancel_editing(store, hooks, node_id),
            InputEvent::Key { .. } => Outcome::Ignored,
            InputEvent::TextInput { node_id, text } => {
                self.text_input(store, hooks, node_id, text)
            }
            InputEvent::Blur { node_id } => self.commit_editing(store, hooks, node_id),
        }
    }

    /// Abort the current drag. A connection drag resolves like a release over
    /// empty canvas.
    pub fn cancel_gesture(
        &mut self,
        store: &mut GraphStore,
        hooks: &mut dyn PresentationHooks,
        now: Instant,
    ) -> Outcome {
        match self.state {
            InteractionState::DraggingConnection {
                gesture, source_id, ..
            } => self.finish_connection(store, hooks, gesture, source_id, None, now),
            InteractionState::DraggingNode { node_id, .. } => {
                self.state = InteractionState::Idle;
                Outcome::DragEnded(node_id)
            }
            _ => Outcome::Ignored,
        }
    }

    fn pointer_down(
        &mut self,
        store: &GraphStore,
        hooks: &mut dyn PresentationHooks,
        point: Point,
    ) -> Outcome {
        if self.is_pointer_captured() {
            return Outcome::Ignored;
        }
        let Some(node) = store.node_at(point, None) else {
            return Outcome::Ignored;
        };
        let node_id = node.id;
        let on_border = node.bounds().on_border(point, self.border_hit_width);
        let offset = Point::new(point.x - node.position.x, point.y - node.position.y);

        // A new gesture invalidates any pending reset from the previous one
        self.pending_reset = None;
        self.last_gesture += 1;

        if on_border {
            self.state = InteractionState::DraggingConnection {
                gesture: self.last_gesture,
                source_id: node_id,
                pointer: point,
                moved: false,
            };
            log::debug!("connection gesture {} from {}", self.last_gesture, node_id);
            hooks.on_connection_start(node_id, point);
            Outcome::ConnectionStarted(node_id)
        } else {
            self.state = InteractionState::DraggingNode { node_id, offset };
            log::debug!("dragging node {}", node_id);
            Outcome::DragStarted(node_id)
        }
    }

    fn pointer_move(
        &mut self,
        store: &mut GraphStore,
        hooks: &mut dyn PresentationHooks,
        point: Point,
    ) -> Outcome {
        match &mut self.state {
            InteractionState::DraggingNode { node_id, offset } => {
                let node_id = *node_id;
                let update =
                    NodeUpdate::position(Point::new(point.x - offset.x, point.y - offset.y));
                match store.update_node(node_id, update.clone()) {
                    Ok(()) => {
                        log::trace!("node {} moved to {:?}", node_id, update.position);
                        hooks.on_node_update(node_id, &update);
                        Outcome::NodeMoved(node_id)
                    }
                    Err(e) => {
                        // Node deleted mid-drag
                        log::debug!("dropping drag: {}", e);
                        self.state = InteractionState::Idle;
                        Outcome::Ignored
                    }
                }
            }
            InteractionState::DraggingConnection { pointer, moved, .. } => {
                *pointer = point;
                *moved = true;
                Outcome::PointerTracked
            }
            _ => Outcome::Ignored,
        }
    }

    fn pointer_up(
        &mut self,
        store: &mut GraphStore,
        hooks: &mut dyn PresentationHooks,
        point: Point,
        now: Instant,
    ) -> Outcome {
        match self.state {
            InteractionState::DraggingNode { node_id, .. } => {
                self.state = InteractionState::Idle;
                log::debug!("released node {}", node_id);
                Outcome::DragEnded(node_id)
            }
            InteractionState::DraggingConnection {
                gesture, source_id, ..
            } => self.finish_connection(store, hooks, gesture, source_id, Some(point), now),
            _ => Outcome::Ignored,
        }
    }

    fn finish_connection(
        &mut self,
        store: &mut GraphStore,
        hooks: &mut dyn PresentationHooks,
        gesture: GestureId,
        source_id: Ulid,
        drop_point: Option<Point>,
        now: Instant,
    ) -> Outcome {
        let target_id = drop_point
            .and_then(|p| store.node_at(p, Some(source_id)))
            .map(|n| n.id);

        let outcome = match target_id {
            Some(target_id) => {
                let outcome = match check_connection(store, source_id, target_id) {
                    Ok(()) => {
                        let edge = Edge::new(source_id, target_id);
                        let edge_id = edge.id;
                        store.add_edge(edge);

                        let update = NodeUpdate::prompt_mode(true);
                        if store.update_node(target_id, update.clone()).is_ok() {
                            hooks.on_node_update(target_id, &update);
                        }
                        log::info!("connected {} -> {}", source_id, target_id);
                        Outcome::EdgeCreated { edge_id, target_id }
                    }
                    Err(refusal) => {
                        log::debug!("connection {} -> {} refused: {}", source_id, target_id, refusal);
                        Outcome::ConnectionRefused(refusal)
                    }
                };
                hooks.on_connection_end(Some(target_id));
                outcome
            }
            None => {
                log::debug!("connection gesture {} cancelled", gesture);
                hooks.on_connection_cancel();
                Outcome::ConnectionCancelled
            }
        };

        self.state = InteractionState::SuppressClick { gesture };
        self.pending_reset = Some(PendingReset {
            gesture,
            due: now + self.suppress_window,
        });

        outcome
    }

    fn double_click(
        &mut self,
        store: &mut GraphStore,
        hooks: &mut dyn PresentationHooks,
        point: Point,
    ) -> Outcome {
        if let Some(node_id) = store.node_at(point, None).map(|n| n.id) {
            return self.begin_editing(store, hooks, node_id);
        }

        if self.state != InteractionState::Idle {
            log::debug!("double-click suppressed in {:?}", self.state);
            return Outcome::Suppressed;
        }

        // Put the click at the node's visual center
        let position = Point::new(point.x - NODE_WIDTH / 2.0, point.y - NODE_HEIGHT / 2.0);
        let node = Node::new(NodeRole::Source, position);
        let node_id = node.id;
        match store.add_node(node) {
            Ok(()) => {
                log::info!("created node {} at {:?}", node_id, position);
                Outcome::NodeCreated(node_id)
            }
            Err(e) => {
                log::debug!("node creation skipped: {}", e);
                Outcome::Ignored
            }
        }
    }

    /// Open the inline editor of a node. Does not touch the gesture state.
    pub fn begin_editing(
        &mut self,
        store: &mut GraphStore,
        hooks: &mut dyn PresentationHooks,
        node_id: Ulid,
    ) -> Outcome {
        let Some(node) = store.get_node(node_id) else {
            return Outcome::Ignored;
        };
        let origin = if node.is_prompt_mode {
            node.prompt_text.clone()
        } else {
            node.content.clone()
        };

        let update = NodeUpdate::editing(true);
        if store.update_node(node_id, update.clone()).is_err() {
            return Outcome::Ignored;
        }
        self.edit_origins.entry(node_id).or_insert(origin);
        hooks.on_node_update(node_id, &update);
        Outcome::EditingStarted(node_id)
    }

    fn commit_editing(
        &mut self,
        store: &mut GraphStore,
        hooks: &mut dyn PresentationHooks,
        node_id: Ulid,
    ) -> Outcome {
        if !store.get_node(node_id).is_some_and(|n| n.is_editing) {
            return Outcome::Ignored;
        }
        self.edit_origins.remove(&node_id);

        let update = NodeUpdate::editing(false);
        if store.update_node(node_id, update.clone()).is_err() {
            return Outcome::Ignored;
        }
        hooks.on_node_update(node_id, &update);
        Outcome::EditingCommitted(node_id)
    }

    fn cancel_editing(
        &mut self,
        store: &mut GraphStore,
        hooks: &mut dyn PresentationHooks,
        node_id: Ulid,
    ) -> Outcome {
        let Some(node) = store.get_node(node_id).filter(|n| n.is_editing) else {
            return Outcome::Ignored;
        };
        let is_prompt_mode = node.is_prompt_mode;

        let mut update = NodeUpdate::editing(false);
        if let Some(origin) = self.edit_origins.remove(&node_id) {
            if is_prompt_mode {
                update.prompt_text = Some(origin);
            } else {
                update.content = Some(origin);
            }
        }

        if store.update_node(node_id, update.clone()).is_err() {
            return Outcome::Ignored;
        }
        hooks.on_node_update(node_id, &update);
        Outcome::EditingCancelled(node_id)
    }

    fn text_input(
        &mut self,
        store: &mut GraphStore,
        hooks: &mut dyn PresentationHooks,
        node_id: Ulid,
        text: String,
    ) -> Outcome {
        let Some(node) = store.get_node(node_id).filter(|n| n.is_editing) else {
            return Outcome::Ignored;
        };

        let update = if node.is_prompt_mode {
            NodeUpdate::prompt_text(text)
        } else {
            NodeUpdate::content(text)
        };

        if store.update_node(node_id, update.clone()).is_err() {
            return Outcome::Ignored;
        }
        hooks.on_node_update(node_id, &update);
        Outcome::TextChanged(node_id)
    }

    /// Forget edit state for a node that no longer exists
    pub(crate) fn forget_node(&mut self, node_id: Ulid) {
        self.edit_origins.remove(&node_id);
    }
}
