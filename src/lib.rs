// Node Canvas - Core Library

pub mod config;
pub mod controller;
pub mod edge;
pub mod event;
pub mod generate;
pub mod geometry;
pub mod hooks;
pub mod input;
pub mod interaction;
pub mod node;
pub mod store;
pub mod ui;
pub mod validation;
pub mod view;

// Re-export main types for convenience
pub use config::EditorConfig;
pub use controller::CanvasController;
pub use edge::Edge;
pub use event::{EventType, GraphEvent};
pub use generate::{EchoGenerator, GenerateRequest, PromptGenerator, SourceContent};
pub use geometry::{CubicCurve, CurvePath};
pub use hooks::{HookCall, NoopHooks, PresentationHooks, RecordingHooks};
pub use input::{EditKey, InputEvent};
pub use interaction::{InteractionMachine, InteractionState, Outcome};
pub use node::{ContentType, Node, NodeRole, NodeUpdate, Point, Rectangle, NODE_HEIGHT, NODE_WIDTH};
pub use store::{GraphSnapshot, GraphStore};
pub use ui::NodeCanvasApp;
pub use validation::{
    ConnectionRefusal, ValidationIssue, ValidationIssueType, ValidationResult, ValidationSeverity,
};
pub use view::{ContentRenderer, ContentView, EdgeView, Frame, NodeView, SourceOption};
