#[path = "fixtures/sample_graphs.rs"]
mod sample_graphs;

use assert_matches::assert_matches;
use node_canvas::validation::{validate, ValidationIssueType};
use node_canvas::{
    ConnectionRefusal, ContentView, EditKey, EditorConfig, EventType, HookCall, InputEvent,
    InteractionState, NodeUpdate, Outcome, Point,
};
use pretty_assertions::assert_eq;
use sample_graphs::Session;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_connect_then_connect_again_keeps_both_edges() {
    let mut s = Session::new();
    let a = s.create_node(100.0, 100.0, 0);
    let b = s.create_node(400.0, 100.0, 10);

    let first = s.drag(Point::new(338.0, 150.0), Point::new(500.0, 150.0), 100);
    assert_matches!(first, Outcome::EdgeCreated { target_id, .. } if target_id == b);
    assert!(s.node(b).is_prompt_mode);

    // B is in prompt mode but its content is still empty
    let second = s.drag(Point::new(338.0, 150.0), Point::new(500.0, 150.0), 400);
    assert_matches!(second, Outcome::EdgeCreated { target_id, .. } if target_id == b);

    let store = s.canvas.store();
    assert_eq!(store.edge_count(), 2);
    assert!(store.edges().iter().all(|e| e.source_id == a && e.target_id == b));

    let report = validate(store);
    assert!(report.is_valid());
    assert_eq!(report.info().len(), 1);
    assert_eq!(report.info()[0].issue_type, ValidationIssueType::ParallelEdge);

    // One feeder entry per incoming edge
    let frame = s.canvas.frame();
    let b_view = frame.nodes.iter().find(|n| n.id == b).unwrap();
    assert_eq!(b_view.feeders.len(), 2);
}

#[test]
fn test_filled_target_is_left_alone() {
    let mut s = Session::new();
    s.create_node(100.0, 100.0, 0);
    let b = s.create_node(400.0, 100.0, 10);

    // Type into B and commit
    s.send(InputEvent::double_click(500.0, 150.0), 20);
    s.send(
        InputEvent::TextInput {
            node_id: b,
            text: "hello".into(),
        },
        25,
    );
    s.send(
        InputEvent::Key {
            node_id: b,
            key: EditKey::Enter,
            shift: false,
        },
        30,
    );
    let before = s.node(b).clone();
    s.canvas.hooks_mut().take();

    let outcome = s.drag(Point::new(338.0, 150.0), Point::new(500.0, 150.0), 100);

    assert_eq!(
        outcome,
        Outcome::ConnectionRefused(ConnectionRefusal::TargetNotEmpty)
    );
    assert_eq!(s.canvas.store().edge_count(), 0);
    assert_eq!(s.node(b), &before);
    // The machine still reports where the drop landed
    assert_eq!(
        s.canvas.hooks().calls.last(),
        Some(&HookCall::ConnectionEnd(Some(b)))
    );
}

#[test]
fn test_double_click_suppressed_only_inside_window() {
    let mut s = Session::new();
    s.create_node(100.0, 100.0, 0);

    // Released over empty canvas at t=110
    assert_eq!(
        s.drag(Point::new(338.0, 150.0), Point::new(700.0, 500.0), 100),
        Outcome::ConnectionCancelled
    );

    assert_eq!(
        s.send(InputEvent::double_click(700.0, 500.0), 150),
        Outcome::Suppressed
    );
    assert_eq!(s.canvas.store().node_count(), 1);

    assert_matches!(
        s.send(InputEvent::double_click(700.0, 500.0), 210),
        Outcome::NodeCreated(_)
    );
    assert_eq!(s.canvas.store().node_count(), 2);
}

#[test]
fn test_suppression_window_comes_from_config() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{ "suppress_click_ms": 500 }}"#).unwrap();
    let config = EditorConfig::load(file.path()).unwrap();

    let mut s = Session::with_config(config);
    s.create_node(100.0, 100.0, 0);
    s.drag(Point::new(338.0, 150.0), Point::new(700.0, 500.0), 100);

    assert_eq!(
        s.send(InputEvent::double_click(700.0, 500.0), 400),
        Outcome::Suppressed
    );
    assert_matches!(
        s.send(InputEvent::double_click(700.0, 500.0), 610),
        Outcome::NodeCreated(_)
    );
}

#[test]
fn test_moving_a_node_moves_its_edges() {
    let mut s = Session::new();
    let a = s.create_node(100.0, 100.0, 0);
    let b = s.create_node(400.0, 100.0, 10);
    s.drag(Point::new(338.0, 150.0), Point::new(500.0, 150.0), 100);

    // Drag B below A by its interior
    let outcome = s.drag(Point::new(520.0, 150.0), Point::new(220.0, 450.0), 400);
    assert_eq!(outcome, Outcome::DragEnded(b));
    assert_eq!(s.node(b).position, Point::new(100.0, 400.0));
    assert_eq!(s.canvas.machine().state(), InteractionState::Idle);

    // Now vertically dominant: bottom of A to top of B
    let frame = s.canvas.frame();
    let curve = frame.edges[0].path.curve;
    assert_eq!(curve.start, Point::new(220.0, 198.0));
    assert_eq!(curve.end, Point::new(220.0, 402.0));
    assert_eq!(curve.control1.x, curve.start.x);
    assert_eq!(curve.control2.x, curve.end.x);
    assert_eq!(s.node(a).position, Point::new(100.0, 100.0));
}

#[test]
fn test_deleting_a_feeder_closes_the_prompt_view() {
    let mut s = Session::new();
    let a = s.create_node(100.0, 100.0, 0);
    let b = s.create_node(400.0, 100.0, 10);
    s.drag(Point::new(338.0, 150.0), Point::new(500.0, 150.0), 100);

    let view = |s: &Session| {
        s.canvas
            .frame()
            .nodes
            .into_iter()
            .find(|n| n.id == b)
            .unwrap()
            .content
    };
    assert_matches!(view(&s), ContentView::Prompt { .. });

    s.canvas.delete_node(a).unwrap();

    // Prompt mode stays set but there is nothing feeding it
    assert!(s.node(b).is_prompt_mode);
    assert_eq!(view(&s), ContentView::Placeholder);
    assert!(s.canvas.frame().edges.is_empty());
}

#[test]
fn test_escape_in_prompt_restores_prompt() {
    let mut s = Session::new();
    let a = s.create_node(100.0, 100.0, 0);
    let b = s.create_node(400.0, 100.0, 10);
    s.drag(Point::new(338.0, 150.0), Point::new(500.0, 150.0), 100);

    assert!(s.canvas.insert_source_reference(b, a).unwrap());
    assert_eq!(s.node(b).prompt_text, "{{source}}");

    s.send(InputEvent::double_click(500.0, 150.0), 400);
    s.send(
        InputEvent::TextInput {
            node_id: b,
            text: "{{source}} as a haiku".into(),
        },
        405,
    );
    s.send(
        InputEvent::Key {
            node_id: b,
            key: EditKey::Escape,
            shift: false,
        },
        410,
    );

    let node = s.node(b);
    assert_eq!(node.prompt_text, "{{source}}");
    assert!(!node.is_editing);
}

#[test]
fn test_event_log_records_the_session() {
    let mut s = Session::new();
    let a = s.create_node(100.0, 100.0, 0);
    let b = s.create_node(400.0, 100.0, 10);
    s.drag(Point::new(338.0, 150.0), Point::new(500.0, 150.0), 100);
    s.canvas.delete_node(a).unwrap();

    let kinds: Vec<&str> = s
        .canvas
        .store()
        .events()
        .iter()
        .map(|e| match &e.event {
            EventType::NodeAdded { .. } => "node_added",
            EventType::NodeUpdated { .. } => "node_updated",
            EventType::NodeRemoved { .. } => "node_removed",
            EventType::EdgeAdded { .. } => "edge_added",
            EventType::EdgeRemoved { .. } => "edge_removed",
        })
        .collect();

    assert_eq!(
        kinds,
        vec![
            "node_added",
            "node_added",
            "edge_added",
            "node_updated",
            "edge_removed",
            "node_removed",
        ]
    );

    let prompt_update = s.canvas.store().events().iter().find_map(|e| match &e.event {
        EventType::NodeUpdated { id, update } if *id == b => Some(update.clone()),
        _ => None,
    });
    assert_eq!(prompt_update, Some(NodeUpdate::prompt_mode(true)));
}
