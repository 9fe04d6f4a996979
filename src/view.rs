//! Paintable description of one frame.
//!
//! The controller produces these; renderers outside the core consume them.

use crate::geometry::CurvePath;
use crate::{ContentType, NodeRole, Rectangle};
use ulid::Ulid;

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub edges: Vec<EdgeView>,
    pub nodes: Vec<NodeView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeView {
    /// `None` for the live connection being dragged
    pub edge_id: Option<Ulid>,
    pub path: CurvePath,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeView {
    pub id: Ulid,
    pub bounds: Rectangle,
    pub role: NodeRole,
    pub label: &'static str,
    pub content_type: ContentType,
    pub content: ContentView,
    /// Nodes feeding this one, one entry per incoming edge
    pub feeders: Vec<SourceOption>,
    pub is_editing: bool,
    /// Empty node that would accept the connection being dragged
    pub is_connection_target: bool,
}

/// Entry of the "insert source" menu in the prompt view
#[derive(Debug, Clone, PartialEq)]
pub struct SourceOption {
    pub id: Ulid,
    pub label: String,
}

/// What the body of a node shows
#[derive(Debug, Clone, PartialEq)]
pub enum ContentView {
    /// Empty node, not a drop candidate
    Placeholder,
    /// Empty node while a connection is being dragged elsewhere
    ReadyToConnect,
    /// Inline editor; writes to the prompt when `prompt` is set
    Editor { buffer: String, prompt: bool },
    /// Prompt editor with a generate action
    Prompt { prompt_text: String },
    Text(String),
    Image(String),
    Link(String),
    Doc(String),
}

/// Capability implemented by the presentation layer, one method per view
pub trait ContentRenderer {
    fn placeholder(&mut self, node: &NodeView);

    fn ready_to_connect(&mut self, node: &NodeView);

    fn editor(&mut self, node: &NodeView, buffer: &str, prompt: bool);

    fn prompt(&mut self, node: &NodeView, prompt_text: &str);

    fn text(&mut self, node: &NodeView, text: &str);

    /// `data_uri` is a `data:image/...` URL produced by the file loader
    fn image(&mut self, node: &NodeView, data_uri: &str);

    fn link(&mut self, node: &NodeView, url: &str);

    fn doc(&mut self, node: &NodeView, text: &str);
}

impl NodeView {
    /// Dispatch this node's content to the matching renderer method
    pub fn render_content<R: ContentRenderer + ?Sized>(&self, renderer: &mut R) {
        match &self.content {
            ContentView::Placeholder => renderer.placeholder(self),
            ContentView::ReadyToConnect => renderer.ready_to_connect(self),
            ContentView::Editor { buffer, prompt } => renderer.editor(self, buffer, *prompt),
            ContentView::Prompt { prompt_text } => renderer.prompt(self, prompt_text),
            ContentView::Text(text) => renderer.text(self, text),
            ContentView::Image(uri) => renderer.image(self, uri),
            ContentView::Link(url) => renderer.link(self, url),
            ContentView::Doc(text) => renderer.doc(self, text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Trace(Vec<String>);

    impl ContentRenderer for Trace {
        fn placeholder(&mut self, _node: &NodeView) {
            self.0.push("placeholder".into());
        }
        fn ready_to_connect(&mut self, _node: &NodeView) {
            self.0.push("ready".into());
        }
        fn editor(&mut self, _node: &NodeView, buffer: &str, prompt: bool) {
            self.0.push(format!("editor:{}:{}", prompt, buffer));
        }
        fn prompt(&mut self, _node: &NodeView, prompt_text: &str) {
            self.0.push(format!("prompt:{}", prompt_text));
        }
        fn text(&mut self, _node: &NodeView, text: &str) {
            self.0.push(format!("text:{}", text));
        }
        fn image(&mut self, _node: &NodeView, data_uri: &str) {
            self.0.push(format!("image:{}", data_uri));
        }
        fn link(&mut self, _node: &NodeView, url: &str) {
            self.0.push(format!("link:{}", url));
        }
        fn doc(&mut self, _node: &NodeView, text: &str) {
            self.0.push(format!("doc:{}", text));
        }
    }

    fn view(content: ContentView) -> NodeView {
        NodeView {
            id: Ulid::new(),
            bounds: Rectangle::new(0.0, 0.0, 240.0, 100.0),
            role: NodeRole::Source,
            label: NodeRole::Source.label(),
            content_type: ContentType::Text,
            content,
            feeders: Vec::new(),
            is_editing: false,
            is_connection_target: false,
        }
    }

    #[test]
    fn test_dispatch_reaches_matching_method() {
        let mut trace = Trace::default();
        for content in [
            ContentView::Placeholder,
            ContentView::ReadyToConnect,
            ContentView::Editor {
                buffer: "b".into(),
                prompt: true,
            },
            ContentView::Prompt {
                prompt_text: "p".into(),
            },
            ContentView::Text("t".into()),
            ContentView::Image("data:image/png;base64,".into()),
            ContentView::Link("https://x".into()),
            ContentView::Doc("d".into()),
        ] {
            view(content).render_content(&mut trace);
        }

        assert_eq!(
            trace.0,
            vec![
                "placeholder",
                "ready",
                "editor:true:b",
                "prompt:p",
                "text:t",
                "image:data:image/png;base64,",
                "link:https://x",
                "doc:d",
            ]
        );
    }
}
