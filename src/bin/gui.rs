use eframe::egui;
use node_canvas::{EditorConfig, NodeCanvasApp};
use std::path::PathBuf;

fn main() -> eframe::Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = match EditorConfig::load_or_default(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{:#}, using defaults", e);
            EditorConfig::default()
        }
    };
    config.init_logging();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.viewport_width, config.viewport_height])
            .with_title("Node Canvas"),
        ..Default::default()
    };

    eframe::run_native(
        "Node Canvas",
        options,
        Box::new(|_cc| Ok(Box::new(NodeCanvasApp::new(config)))),
    )
}
