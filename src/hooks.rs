//! Outbound notifications to the presentation layer.

use crate::{NodeUpdate, Point};
use ulid::Ulid;

/// Callbacks fired after the core has applied a change.
///
/// All methods default to no-ops so renderers only implement what they use.
pub trait PresentationHooks {
    fn on_node_update(&mut self, _id: Ulid, _update: &NodeUpdate) {}

    fn on_node_delete(&mut self, _id: Ulid) {}

    fn on_connection_start(&mut self, _id: Ulid, _point: Point) {}

    /// `target` is the node under the release point, whether or not an edge
    /// was created
    fn on_connection_end(&mut self, _target: Option<Ulid>) {}

    fn on_connection_cancel(&mut self) {}
}

/// Hooks that ignore everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHooks;

impl PresentationHooks for NoopHooks {}

/// One recorded hook invocation
#[derive(Debug, Clone, PartialEq)]
pub enum HookCall {
    NodeUpdate(Ulid, NodeUpdate),
    NodeDelete(Ulid),
    ConnectionStart(Ulid, Point),
    ConnectionEnd(Option<Ulid>),
    ConnectionCancel,
}

/// Hooks that keep every call, in order
#[derive(Debug, Default, Clone)]
pub struct RecordingHooks {
    pub calls: Vec<HookCall>,
}

impl RecordingHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&mut self) -> Vec<HookCall> {
        std::mem::take(&mut self.calls)
    }
}

impl PresentationHooks for RecordingHooks {
    fn on_node_update(&mut self, id: Ulid, update: &NodeUpdate) {
        self.calls.push(HookCall::NodeUpdate(id, update.clone()));
    }

    fn on_node_delete(&mut self, id: Ulid) {
        self.calls.push(HookCall::NodeDelete(id));
    }

    fn on_connection_start(&mut self, id: Ulid, point: Point) {
        self.calls.push(HookCall::ConnectionStart(id, point));
    }

    fn on_connection_end(&mut self, target: Option<Ulid>) {
        self.calls.push(HookCall::ConnectionEnd(target));
    }

    fn on_connection_cancel(&mut self) {
        self.calls.push(HookCall::ConnectionCancel);
    }
}
