//! Common types for LLM interactions

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

/// LLM request
#[derive(Debug, Clone, Default)]
pub struct LlmRequest {
    /// System instruction, if any
    pub system: Option<String>,
    pub messages: Vec<LlmMessage>,
    pub max_tokens: Option<u32>,
}

impl LlmRequest {
    /// Single user turn with the given content
    pub fn user(content: Vec<ContentBlock>) -> Self {
        Self {
            system: None,
            messages: vec![LlmMessage {
                role: MessageRole::User,
                content,
            }],
            max_tokens: None,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn has_image(&self) -> bool {
        self.messages
            .iter()
            .flat_map(|m| &m.content)
            .any(|block| matches!(block, ContentBlock::Image { .. }))
    }
}

/// Message in conversation
#[derive(Debug, Clone)]
pub struct LlmMessage {
    pub role: MessageRole,
    pub content: Vec<ContentBlock>,
}

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    User,
    #[allow(dead_code)] // Single-turn requests only so far
    Assistant,
}

/// Content block in a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentBlock {
    Text { text: String },
    /// Inline image, base64 encoded
    Image { media_type: String, data: String },
}

impl ContentBlock {
    pub fn text(s: impl Into<String>) -> Self {
        ContentBlock::Text { text: s.into() }
    }

    pub fn jpeg(bytes: &[u8]) -> Self {
        ContentBlock::Image {
            media_type: "image/jpeg".to_string(),
            data: BASE64.encode(bytes),
        }
    }
}

/// LLM response
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

impl LlmResponse {
    /// Convenience constructor for a text-only response
    #[allow(dead_code)] // Used by mocks
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::text(text)],
            usage: Usage::default(),
        }
    }

    /// Get text content from the response
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                ContentBlock::Image { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }
}

/// Usage statistics
#[derive(Debug, Clone, Default)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}
