use crate::generate::{EchoGenerator, GenerateRequest, PromptGenerator, SourceContent};
use crate::geometry::{drag_curve, edge_curve};
use crate::{
    ContentType, ContentView, EdgeView, EditorConfig, Frame, GraphStore, InputEvent,
    InteractionMachine, Node, NodeRole, NodeUpdate, NodeView, NoopHooks, Outcome, Point,
    PresentationHooks, SourceOption, NODE_HEIGHT, NODE_WIDTH,
};
use anyhow::{anyhow, Result};
use std::time::Instant;
use ulid::Ulid;

/// Owns the graph store and the gesture state and answers the render loop.
pub struct CanvasController<H: PresentationHooks = NoopHooks> {
    store: GraphStore,
    machine: InteractionMachine,
    config: EditorConfig,
    hooks: H,
    generator: Box<dyn PromptGenerator>,
}

impl Default for CanvasController<NoopHooks> {
    fn default() -> Self {
        Self::new(EditorConfig::default(), NoopHooks)
    }
}

impl<H: PresentationHooks> CanvasController<H> {
    pub fn new(config: EditorConfig, hooks: H) -> Self {
        Self {
            store: GraphStore::new(),
            machine: InteractionMachine::new(&config),
            config,
            hooks,
            generator: Box::new(EchoGenerator),
        }
    }

    /// Replace the generator behind the prompt "generate" action
    pub fn with_generator(mut self, generator: impl PromptGenerator + 'static) -> Self {
        self.generator = Box::new(generator);
        self
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn machine(&self) -> &InteractionMachine {
        &self.machine
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    // ========== Input ==========

    pub fn handle_input(&mut self, event: InputEvent, now: Instant) -> Outcome {
        self.machine
            .handle(&mut self.store, &mut self.hooks, event, now)
    }

    /// Run deferred transitions; returns true when a repaint is needed
    pub fn tick(&mut self, now: Instant) -> bool {
        self.machine.tick(now)
    }

    /// Abort the current drag, e.g. when the window loses the pointer
    pub fn cancel_gesture(&mut self, now: Instant) -> Outcome {
        self.machine
            .cancel_gesture(&mut self.store, &mut self.hooks, now)
    }

    // ========== Toolbar and node actions ==========

    /// Add an empty node centered in the viewport
    pub fn add_node_at_center(&mut self, role: NodeRole) -> Result<Ulid> {
        let position = Point::new(
            self.config.viewport_width / 2.0 - NODE_WIDTH / 2.0,
            self.config.viewport_height / 2.0 - NODE_HEIGHT / 2.0,
        );
        let node = Node::new(role, position);
        let id = node.id;
        self.store.add_node(node)?;
        log::info!("added {} node {}", role.label(), id);
        Ok(id)
    }

    /// Delete a node together with its edges
    pub fn delete_node(&mut self, id: Ulid) -> Result<()> {
        self.store.remove_node(id)?;
        self.machine.forget_node(id);
        self.hooks.on_node_delete(id);
        log::info!("deleted node {}", id);
        Ok(())
    }

    /// Switch the content type. A real change clears the content and opens
    /// the editor; returns whether anything changed.
    pub fn set_content_type(&mut self, id: Ulid, content_type: ContentType) -> Result<bool> {
        let node = self
            .store
            .get_node(id)
            .ok_or_else(|| anyhow!("Node not found: {}", id))?;
        if node.content_type == content_type {
            return Ok(false);
        }

        let update = NodeUpdate {
            content_type: Some(content_type),
            ..Default::default()
        };
        self.store.update_node(id, update.clone())?;
        self.hooks.on_node_update(id, &update);
        // Escape must restore the cleared value, not text of the old type
        self.machine.forget_node(id);
        self.machine
            .begin_editing(&mut self.store, &mut self.hooks, id);
        Ok(true)
    }

    /// Append `{{<source content>}}` to the target's prompt. Returns false
    /// when `source_id` does not feed `target_id`.
    pub fn insert_source_reference(&mut self, target_id: Ulid, source_id: Ulid) -> Result<bool> {
        let target = self
            .store
            .get_node(target_id)
            .ok_or_else(|| anyhow!("Node not found: {}", target_id))?;
        let Some(source) = self
            .store
            .source_nodes(target_id)
            .into_iter()
            .find(|n| n.id == source_id)
        else {
            return Ok(false);
        };

        let reference = if source.content.is_empty() {
            "{{source}}".to_string()
        } else {
            format!("{{{{{}}}}}", source.content)
        };
        let update = NodeUpdate::prompt_text(format!("{}{}", target.prompt_text, reference));

        self.store.update_node(target_id, update.clone())?;
        self.hooks.on_node_update(target_id, &update);
        Ok(true)
    }

    /// Hand the node's prompt to the generator. Generated content replaces
    /// the node content and leaves prompt mode. Returns whether the node
    /// changed.
    pub fn generate(&mut self, id: Ulid) -> Result<bool> {
        let node = self
            .store
            .get_node(id)
            .ok_or_else(|| anyhow!("Node not found: {}", id))?;
        if !node.is_prompt_mode {
            return Ok(false);
        }

        let request = GenerateRequest {
            node_id: id,
            prompt: node.prompt_text.clone(),
            sources: self
                .store
                .source_nodes(id)
                .into_iter()
                .map(|n| SourceContent {
                    id: n.id,
                    content_type: n.content_type,
                    content: n.content.clone(),
                })
                .collect(),
        };

        log::info!("generate requested for {} with {} sources", id, request.sources.len());
        let Some(content) = self.generator.generate(&request)? else {
            return Ok(false);
        };

        let update = NodeUpdate {
            content: Some(content),
            is_prompt_mode: Some(false),
            ..Default::default()
        };
        self.store.update_node(id, update.clone())?;
        self.hooks.on_node_update(id, &update);
        Ok(true)
    }

    // ========== Rendering ==========

    /// Describe everything to paint, edges first
    pub fn frame(&self) -> Frame {
        let drag = self.machine.drag_connection();

        let mut edges: Vec<EdgeView> = self
            .store
            .edges()
            .iter()
            .filter_map(|edge| {
                let source = self.store.get_node(edge.source_id)?;
                let target = self.store.get_node(edge.target_id)?;
                Some(EdgeView {
                    edge_id: Some(edge.id),
                    path: edge_curve(source, target),
                })
            })
            .collect();

        // Nothing to draw until the pointer leaves the press position
        if let Some((source_id, pointer, true)) = drag {
            if let Some(source) = self.store.get_node(source_id) {
                edges.push(EdgeView {
                    edge_id: None,
                    path: drag_curve(source, pointer),
                });
            }
        }

        let drag_source = drag.map(|(source_id, _, _)| source_id);
        let nodes = self
            .store
            .nodes()
            .iter()
            .map(|node| self.node_view(node, drag_source))
            .collect();

        Frame { edges, nodes }
    }

    fn node_view(&self, node: &Node, drag_source: Option<Ulid>) -> NodeView {
        let feeders: Vec<SourceOption> = self
            .store
            .source_nodes(node.id)
            .into_iter()
            .map(|n| SourceOption {
                id: n.id,
                label: source_label(n),
            })
            .collect();

        let is_connection_target =
            drag_source.is_some_and(|source| source != node.id) && node.is_empty();

        let content = if node.is_editing {
            ContentView::Editor {
                buffer: if node.is_prompt_mode {
                    node.prompt_text.clone()
                } else {
                    node.content.clone()
                },
                prompt: node.is_prompt_mode,
            }
        } else if node.is_prompt_mode && !feeders.is_empty() {
            ContentView::Prompt {
                prompt_text: node.prompt_text.clone(),
            }
        } else if node.is_empty() {
            if is_connection_target {
                ContentView::ReadyToConnect
            } else {
                ContentView::Placeholder
            }
        } else {
            match node.content_type {
                ContentType::Text => ContentView::Text(node.content.clone()),
                ContentType::Image => ContentView::Image(node.content.clone()),
                ContentType::Link => ContentView::Link(node.content.clone()),
                ContentType::Doc => ContentView::Doc(node.content.clone()),
            }
        };

        NodeView {
            id: node.id,
            bounds: node.bounds(),
            role: node.role,
            label: node.role.label(),
            content_type: node.content_type,
            content,
            feeders,
            is_editing: node.is_editing,
            is_connection_target,
        }
    }
}

/// Menu label for a feeding node: its content, or a short id
fn source_label(node: &Node) -> String {
    if node.content.is_empty() {
        let id = node.id.to_string();
        format!("Source {}", &id[..8])
    } else {
        node.content.clone()
    }
}
