//! Trigger contract for the prompt "generate" action.
//!
//! The core only assembles the request and applies the answer; producing
//! content is up to an external `PromptGenerator`.

use crate::ContentType;
use anyhow::Result;
use ulid::Ulid;

#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub node_id: Ulid,
    pub prompt: String,
    pub sources: Vec<SourceContent>,
}

/// Content of one node feeding the prompt
#[derive(Debug, Clone, PartialEq)]
pub struct SourceContent {
    pub id: Ulid,
    pub content_type: ContentType,
    pub content: String,
}

pub trait PromptGenerator {
    /// `Ok(None)` leaves the node untouched
    fn generate(&mut self, request: &GenerateRequest) -> Result<Option<String>>;
}

/// Placeholder generator that echoes the prompt back
#[derive(Debug, Default, Clone, Copy)]
pub struct EchoGenerator;

impl PromptGenerator for EchoGenerator {
    fn generate(&mut self, request: &GenerateRequest) -> Result<Option<String>> {
        Ok(Some(format!("Generated from: {}", request.prompt)))
    }
}
