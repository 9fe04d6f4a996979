use node_canvas::{CanvasController, EditorConfig, InputEvent, NodeRole, RecordingHooks};
use std::path::PathBuf;
use std::time::{Duration, Instant};

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = EditorConfig::load_or_default(config_path.as_deref())?;
    config.init_logging();

    println!("Node Canvas - scripted session");
    println!("==============================\n");

    let mut canvas = CanvasController::new(config, RecordingHooks::new());
    let t0 = Instant::now();
    let at = |ms: u64| t0 + Duration::from_millis(ms);

    // Two nodes side by side, created by double-clicking their centres
    canvas.handle_input(InputEvent::double_click(220.0, 150.0), at(0));
    canvas.handle_input(InputEvent::double_click(520.0, 150.0), at(10));
    let output = canvas.add_node_at_center(NodeRole::Output)?;
    println!("✓ Created {} nodes", canvas.store().node_count());

    // Drag from the right border of the first node onto the second
    canvas.handle_input(InputEvent::pointer_down(338.0, 150.0), at(100));
    canvas.handle_input(InputEvent::pointer_move(450.0, 160.0), at(120));
    let outcome = canvas.handle_input(InputEvent::pointer_up(500.0, 150.0), at(140));
    println!("✓ Connection gesture: {:?}", outcome);

    // Inside the cooldown the canvas double-click is swallowed
    let outcome = canvas.handle_input(InputEvent::double_click(900.0, 700.0), at(180));
    println!("✓ Double-click during cooldown: {:?}", outcome);

    let frame = canvas.frame();
    println!("\n📊 Frame:");
    for edge in &frame.edges {
        println!("  └─ edge {}", edge.path.curve.to_svg_path());
    }
    for node in &frame.nodes {
        println!(
            "  └─ {} {} at ({}, {}) feeders={}",
            node.label,
            node.id,
            node.bounds.x,
            node.bounds.y,
            node.feeders.len()
        );
    }

    canvas.delete_node(output)?;
    let validation = node_canvas::validation::validate(canvas.store());
    println!("\n✓ Graph valid: {}", validation.is_valid());
    println!("  Events logged: {}", canvas.store().events().len());
    println!("  Hook calls: {}", canvas.hooks().calls.len());

    println!(
        "\n{}",
        serde_json::to_string_pretty(&canvas.store().snapshot())?
    );

    Ok(())
}
