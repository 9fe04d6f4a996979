use crate::{
    CanvasController, ContentRenderer, ContentType, EditKey, EditorConfig, EdgeView,
    InputEvent, NodeRole, NodeView, NoopHooks, Outcome, Point, Rectangle,
};
use egui::{epaint::CubicBezierShape, pos2, vec2, Color32, FontId, Pos2, Rect, Sense, Stroke};
use std::collections::HashMap;
use std::time::Instant;
use ulid::Ulid;

/// Height of the node header strip holding the label and controls
const HEADER_HEIGHT: f32 = 22.0;

/// Main application state
pub struct NodeCanvasApp {
    /// Graph and gesture state
    controller: CanvasController<NoopHooks>,

    /// Text buffers of open inline editors, seeded from the node
    edit_buffers: HashMap<Ulid, String>,

    /// Show grid
    show_grid: bool,

    /// Status message
    status_message: String,
}

/// Something a widget asked for while the frame was being drawn.
/// Applied once drawing is done so the controller is not borrowed twice.
#[derive(Debug, Clone, PartialEq)]
enum UiAction {
    Input(InputEvent),
    SetContentType(Ulid, ContentType),
    InsertSource { target: Ulid, source: Ulid },
    Generate(Ulid),
    Delete(Ulid),
}

impl Default for NodeCanvasApp {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl NodeCanvasApp {
    pub fn new(config: EditorConfig) -> Self {
        let show_grid = config.show_grid;
        Self {
            controller: CanvasController::new(config, NoopHooks),
            edit_buffers: HashMap::new(),
            show_grid,
            status_message: "Double-click the canvas to add a node".to_string(),
        }
    }

    fn render_ui(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        if self.controller.tick(now) {
            ctx.request_repaint();
        }

        // Toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("➕ Add Source").clicked() {
                    self.add_node(NodeRole::Source);
                }
                if ui.button("➕ Add Output").clicked() {
                    self.add_node(NodeRole::Output);
                }
                ui.separator();
                ui.checkbox(&mut self.show_grid, "Show Grid");
                ui.separator();
                ui.label(
                    egui::RichText::new(&self.status_message)
                        .small()
                        .color(Color32::GRAY),
                );
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_canvas(ui, now);
        });

        // Wake up when the suppression window closes
        if let Some(due) = self.controller.machine().reset_due() {
            ctx.request_repaint_after(due.saturating_duration_since(now));
        }
    }

    fn add_node(&mut self, role: NodeRole) {
        match self.controller.add_node_at_center(role) {
            Ok(id) => self.status_message = format!("Added {} node {}", role.label(), short_id(id)),
            Err(e) => self.status_message = format!("Add failed: {}", e),
        }
    }

    fn render_canvas(&mut self, ui: &mut egui::Ui, now: Instant) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        let canvas_rect = response.rect;
        let mut actions = Vec::new();

        // Pointer input, in canvas coordinates
        if response.drag_started() {
            if let Some(origin) = ui.input(|i| i.pointer.press_origin()) {
                let p = screen_to_canvas(origin, canvas_rect);
                actions.push(UiAction::Input(InputEvent::PointerDown { point: p }));
            }
        }
        if response.dragged() && response.drag_delta() != vec2(0.0, 0.0) {
            if let Some(pos) = response.interact_pointer_pos() {
                let p = screen_to_canvas(pos, canvas_rect);
                actions.push(UiAction::Input(InputEvent::PointerMove { point: p }));
            }
        }
        if response.drag_stopped() {
            let pos = response
                .interact_pointer_pos()
                .or_else(|| ui.input(|i| i.pointer.latest_pos()));
            if let Some(pos) = pos {
                let p = screen_to_canvas(pos, canvas_rect);
                actions.push(UiAction::Input(InputEvent::PointerUp { point: p }));
            }
        }
        if response.double_clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let p = screen_to_canvas(pos, canvas_rect);
                actions.push(UiAction::Input(InputEvent::DoubleClick { point: p }));
            }
        }
        let drag_lost = !response.dragged() && !response.drag_stopped();

        let frame = self.controller.frame();

        // Editors that closed since the last frame drop their buffers
        self.edit_buffers
            .retain(|id, _| frame.nodes.iter().any(|n| n.id == *id && n.is_editing));

        if self.show_grid {
            draw_grid(&painter, canvas_rect);
        }

        let time = ui.input(|i| i.time);
        for edge in &frame.edges {
            draw_edge(&painter, canvas_rect, edge, time);
        }
        if frame.edges.iter().any(|e| e.edge_id.is_some()) {
            ui.ctx().request_repaint();
        }

        for node in &frame.nodes {
            self.draw_node(ui, &painter, canvas_rect, node, &mut actions);
        }

        self.apply_actions(actions, now);

        // Capture lost without a release, e.g. pointer left the window
        if drag_lost && self.controller.machine().is_pointer_captured() {
            self.controller.cancel_gesture(now);
        }
    }

    fn draw_node(
        &mut self,
        ui: &mut egui::Ui,
        painter: &egui::Painter,
        canvas_rect: Rect,
        node: &NodeView,
        actions: &mut Vec<UiAction>,
    ) {
        let rect = canvas_to_screen_rect(&node.bounds, canvas_rect);

        let fill = match node.role {
            NodeRole::Source => Color32::from_rgb(245, 248, 255),
            NodeRole::Output => Color32::from_rgb(245, 255, 245),
        };
        let stroke = if node.is_connection_target {
            Stroke::new(2.0, Color32::from_rgb(0, 160, 90))
        } else if node.is_editing {
            Stroke::new(2.0, Color32::from_rgb(0, 100, 200))
        } else {
            Stroke::new(1.0, Color32::from_gray(150))
        };
        painter.rect(rect, 6.0, fill, stroke);

        // Header: role label, content type switch, delete
        let header = Rect::from_min_size(rect.min, vec2(rect.width(), HEADER_HEIGHT)).shrink(2.0);
        ui.allocate_new_ui(egui::UiBuilder::new().max_rect(header), |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(node.label).strong().size(11.0));
                for content_type in ContentType::ALL {
                    let selected = node.content_type == content_type;
                    if ui
                        .selectable_label(selected, egui::RichText::new(content_type.label()).size(10.0))
                        .clicked()
                        && !selected
                    {
                        actions.push(UiAction::SetContentType(node.id, content_type));
                    }
                }
                if ui.small_button("✕").on_hover_text("Delete node").clicked() {
                    actions.push(UiAction::Delete(node.id));
                }
            });
        });

        let body = Rect::from_min_max(pos2(rect.left(), rect.top() + HEADER_HEIGHT), rect.max)
            .shrink(4.0);
        ui.allocate_new_ui(egui::UiBuilder::new().max_rect(body), |ui| {
            let mut renderer = NodeBodyRenderer {
                ui,
                buffers: &mut self.edit_buffers,
                actions,
            };
            node.render_content(&mut renderer);
        });
    }

    fn apply_actions(&mut self, actions: Vec<UiAction>, now: Instant) {
        for action in actions {
            match action {
                UiAction::Input(event) => {
                    let outcome = self.controller.handle_input(event, now);
                    self.report(outcome);
                }
                UiAction::SetContentType(id, content_type) => {
                    // The editor reopens on the cleared content
                    self.edit_buffers.remove(&id);
                    if let Err(e) = self.controller.set_content_type(id, content_type) {
                        self.status_message = format!("Type change failed: {}", e);
                    }
                }
                UiAction::InsertSource { target, source } => {
                    if let Err(e) = self.controller.insert_source_reference(target, source) {
                        self.status_message = format!("Insert failed: {}", e);
                    }
                }
                UiAction::Generate(id) => match self.controller.generate(id) {
                    Ok(true) => self.status_message = "✓ Content generated".to_string(),
                    Ok(false) => self.status_message = "Nothing generated".to_string(),
                    Err(e) => self.status_message = format!("Generate failed: {}", e),
                },
                UiAction::Delete(id) => {
                    self.edit_buffers.remove(&id);
                    match self.controller.delete_node(id) {
                        Ok(()) => self.status_message = format!("Deleted node {}", short_id(id)),
                        Err(e) => self.status_message = format!("Delete failed: {}", e),
                    }
                }
            }
        }
    }

    /// Status line for outcomes the user should hear about
    fn report(&mut self, outcome: Outcome) {
        let message = match outcome {
            Outcome::NodeCreated(id) => format!("Created node {}", short_id(id)),
            Outcome::EdgeCreated { target_id, .. } => {
                format!("Connected to {}", short_id(target_id))
            }
            Outcome::ConnectionRefused(refusal) => format!("Connection refused: {}", refusal),
            Outcome::EditingCommitted(_) => "✓ Content saved".to_string(),
            Outcome::EditingCancelled(_) => "Editing cancelled".to_string(),
            _ => return,
        };
        self.status_message = message;
    }
}

/// Paints node bodies with egui widgets and queues what they trigger
struct NodeBodyRenderer<'a> {
    ui: &'a mut egui::Ui,
    buffers: &'a mut HashMap<Ulid, String>,
    actions: &'a mut Vec<UiAction>,
}

impl ContentRenderer for NodeBodyRenderer<'_> {
    fn placeholder(&mut self, _node: &NodeView) {
        self.ui.centered_and_justified(|ui| {
            ui.label(egui::RichText::new("Double-click to edit").color(Color32::GRAY));
        });
    }

    fn ready_to_connect(&mut self, _node: &NodeView) {
        self.ui.centered_and_justified(|ui| {
            ui.label(egui::RichText::new("Drop to connect").color(Color32::from_rgb(0, 160, 90)));
        });
    }

    fn editor(&mut self, node: &NodeView, buffer: &str, prompt: bool) {
        let fresh = !self.buffers.contains_key(&node.id);
        let text = self
            .buffers
            .entry(node.id)
            .or_insert_with(|| buffer.to_string());

        // Taken before the TextEdit sees it; Shift+Enter still inserts a newline
        let enter = self.ui.input_mut(|i| {
            !i.modifiers.shift && i.consume_key(egui::Modifiers::NONE, egui::Key::Enter)
        });
        let escape = self.ui.input(|i| i.key_pressed(egui::Key::Escape));

        let hint = if prompt { "Describe what to generate" } else { "Content" };
        let response = self.ui.add(
            egui::TextEdit::multiline(text)
                .hint_text(hint)
                .desired_width(f32::INFINITY)
                .font(FontId::proportional(13.0)),
        );
        if fresh {
            response.request_focus();
        }

        if response.changed() {
            self.actions.push(UiAction::Input(InputEvent::TextInput {
                node_id: node.id,
                text: text.clone(),
            }));
        }

        let key = if escape {
            Some(EditKey::Escape)
        } else if enter && (response.has_focus() || response.lost_focus()) {
            Some(EditKey::Enter)
        } else {
            None
        };
        if let Some(key) = key {
            self.actions.push(UiAction::Input(InputEvent::Key {
                node_id: node.id,
                key,
                shift: false,
            }));
        } else if response.lost_focus() {
            self.actions
                .push(UiAction::Input(InputEvent::Blur { node_id: node.id }));
        }
    }

    fn prompt(&mut self, node: &NodeView, prompt_text: &str) {
        let ui = &mut *self.ui;
        if prompt_text.is_empty() {
            ui.label(egui::RichText::new("Double-click to write a prompt").color(Color32::GRAY));
        } else {
            ui.label(egui::RichText::new(prompt_text).italics());
        }
        ui.horizontal(|ui| {
            ui.menu_button("Insert source", |ui| {
                for feeder in &node.feeders {
                    if ui.button(&feeder.label).clicked() {
                        self.actions.push(UiAction::InsertSource {
                            target: node.id,
                            source: feeder.id,
                        });
                        ui.close_menu();
                    }
                }
            });
            if ui.button("✨ Generate").clicked() {
                self.actions.push(UiAction::Generate(node.id));
            }
        });
    }

    fn text(&mut self, _node: &NodeView, text: &str) {
        self.ui.label(text);
    }

    fn image(&mut self, _node: &NodeView, data_uri: &str) {
        let kind = data_uri
            .strip_prefix("data:")
            .and_then(|rest| rest.split(';').next())
            .unwrap_or("image");
        self.ui.label(format!("🖼 {} ({} bytes)", kind, data_uri.len()));
    }

    fn link(&mut self, _node: &NodeView, url: &str) {
        self.ui.hyperlink(url);
    }

    fn doc(&mut self, _node: &NodeView, text: &str) {
        self.ui.label(egui::RichText::new(text).font(FontId::monospace(11.0)));
    }
}

fn draw_edge(painter: &egui::Painter, canvas_rect: Rect, edge: &EdgeView, time: f64) {
    let curve = edge.path.curve;
    let points = [curve.start, curve.control1, curve.control2, curve.end]
        .map(|p| canvas_to_screen(p, canvas_rect));

    let color = if edge.path.dragging {
        Color32::from_rgb(0, 160, 90)
    } else {
        Color32::from_rgb(0, 100, 200)
    };
    painter.add(CubicBezierShape::from_points_stroke(
        points,
        false,
        Color32::TRANSPARENT,
        Stroke::new(2.0, color),
    ));

    // Flow dot moving from source to target
    if edge.edge_id.is_some() {
        let t = (time * 0.5).fract() as f32;
        let dot = canvas_to_screen(curve.eval(t), canvas_rect);
        painter.circle_filled(dot, 3.0, color);
    }
}

fn draw_grid(painter: &egui::Painter, canvas_rect: Rect) {
    let grid_spacing = 50.0;
    let stroke = Stroke::new(1.0, Color32::from_gray(230));

    let mut x = canvas_rect.left();
    while x < canvas_rect.right() {
        painter.line_segment(
            [pos2(x, canvas_rect.top()), pos2(x, canvas_rect.bottom())],
            stroke,
        );
        x += grid_spacing;
    }

    let mut y = canvas_rect.top();
    while y < canvas_rect.bottom() {
        painter.line_segment(
            [pos2(canvas_rect.left(), y), pos2(canvas_rect.right(), y)],
            stroke,
        );
        y += grid_spacing;
    }
}

/// Convert canvas coordinates to screen coordinates
fn canvas_to_screen(point: Point, canvas_rect: Rect) -> Pos2 {
    canvas_rect.left_top() + vec2(point.x, point.y)
}

/// Convert screen coordinates to canvas coordinates
fn screen_to_canvas(pos: Pos2, canvas_rect: Rect) -> Point {
    let relative = pos - canvas_rect.left_top();
    Point::new(relative.x, relative.y)
}

fn canvas_to_screen_rect(rect: &Rectangle, canvas_rect: Rect) -> Rect {
    let top_left = canvas_to_screen(Point::new(rect.x, rect.y), canvas_rect);
    Rect::from_min_size(top_left, vec2(rect.width, rect.height))
}

fn short_id(id: Ulid) -> String {
    id.to_string().chars().take(8).collect()
}

impl eframe::App for NodeCanvasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.render_ui(ctx);
    }
}
