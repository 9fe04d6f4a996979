use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Logical width shared by every node on the canvas
pub const NODE_WIDTH: f32 = 240.0;

/// Logical height shared by every node on the canvas
pub const NODE_HEIGHT: f32 = 100.0;

/// A node on the canvas, holding one piece of content
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    /// Unique identifier (sortable, timestamp-based)
    pub id: Ulid,

    /// Top-left corner in canvas coordinates
    pub position: Point,

    /// Content type determines which editor renders the content
    pub content_type: ContentType,

    /// Raw text, image data URI, URL or document text
    pub content: String,

    /// Cosmetic tag fixed at creation
    pub role: NodeRole,

    /// Prompt buffer, only used in prompt mode
    pub prompt_text: String,

    /// Inline editor is focused
    pub is_editing: bool,

    /// Set once the node received an incoming edge while empty
    pub is_prompt_mode: bool,
}

impl Node {
    /// Create a new empty text node at the given position
    pub fn new(role: NodeRole, position: Point) -> Self {
        Self::with_id(Ulid::new(), role, position)
    }

    /// Create a new node with a specific ID (useful for testing)
    pub fn with_id(id: Ulid, role: NodeRole, position: Point) -> Self {
        Self {
            id,
            position,
            content_type: ContentType::Text,
            content: String::new(),
            role,
            prompt_text: String::new(),
            is_editing: false,
            is_prompt_mode: false,
        }
    }

    /// Builder-style content setter
    pub fn with_content(mut self, content_type: ContentType, content: impl Into<String>) -> Self {
        self.content_type = content_type;
        self.content = content.into();
        self
    }

    /// Bounding rectangle using the shared node size
    pub fn bounds(&self) -> Rectangle {
        Rectangle::new(self.position.x, self.position.y, NODE_WIDTH, NODE_HEIGHT)
    }

    /// Empty or whitespace-only content counts as empty
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Merge a partial update into this node.
    ///
    /// A content type change clears the content unless the same update also
    /// carries new content.
    pub fn apply(&mut self, update: &NodeUpdate) {
        if let Some(position) = update.position {
            self.position = position;
        }
        if let Some(content_type) = update.content_type {
            if content_type != self.content_type {
                self.content_type = content_type;
                self.content.clear();
            }
        }
        if let Some(content) = &update.content {
            self.content = content.clone();
        }
        if let Some(prompt_text) = &update.prompt_text {
            self.prompt_text = prompt_text.clone();
        }
        if let Some(is_editing) = update.is_editing {
            self.is_editing = is_editing;
        }
        if let Some(is_prompt_mode) = update.is_prompt_mode {
            self.is_prompt_mode = is_prompt_mode;
        }
    }
}

/// Partial set of node fields for `GraphStore::update_node`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NodeUpdate {
    pub position: Option<Point>,
    pub content_type: Option<ContentType>,
    pub content: Option<String>,
    pub prompt_text: Option<String>,
    pub is_editing: Option<bool>,
    pub is_prompt_mode: Option<bool>,
}

impl NodeUpdate {
    pub fn position(position: Point) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn prompt_text(prompt_text: impl Into<String>) -> Self {
        Self {
            prompt_text: Some(prompt_text.into()),
            ..Default::default()
        }
    }

    pub fn editing(is_editing: bool) -> Self {
        Self {
            is_editing: Some(is_editing),
            ..Default::default()
        }
    }

    pub fn prompt_mode(is_prompt_mode: bool) -> Self {
        Self {
            is_prompt_mode: Some(is_prompt_mode),
            ..Default::default()
        }
    }

    /// True when the update carries no fields
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A point in canvas coordinates
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Rectangle representing position and size on canvas
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Rectangle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rectangle {
    /// Create a new rectangle
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Get the right edge of the rectangle
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Get the bottom edge of the rectangle
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check if this rectangle contains a point (edges inclusive)
    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Check if a contained point lies within `band` of any side
    pub fn on_border(&self, point: Point, band: f32) -> bool {
        self.contains_point(point)
            && (point.x - self.x < band
                || self.right() - point.x < band
                || point.y - self.y < band
                || self.bottom() - point.y < band)
    }
}

/// Content type determines how content is rendered and edited
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    #[default]
    Text,
    Image,
    Link,
    Doc,
}

impl ContentType {
    pub const ALL: [ContentType; 4] = [
        ContentType::Text,
        ContentType::Image,
        ContentType::Link,
        ContentType::Doc,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ContentType::Text => "Text",
            ContentType::Image => "Image",
            ContentType::Link => "Link",
            ContentType::Doc => "Doc",
        }
    }
}

/// Cosmetic role of a node, fixed at creation
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    #[default]
    Source,
    Output,
}

impl NodeRole {
    /// Default label shown in the node header
    pub fn label(&self) -> &'static str {
        match self {
            NodeRole::Source => "Source",
            NodeRole::Output => "Output",
        }
    }
}
