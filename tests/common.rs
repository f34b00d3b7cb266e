//! Test helper utilities for emotibot-analysis integration tests
//!
//! Builds provider configurations pointed at a wiremock server and canned
//! replies in each vendor's wire format.
//!
//! IMPORTANT: These helpers are test-only and should NEVER be used in production code.

// Allow dead code in test utilities - functions are used across different test files
#![allow(dead_code)]

use emotibot_analysis::config::{AnthropicConfig, EdgeFunctionConfig, OpenAIConfig};
use emotibot_analysis::TemplateRegistry;
use serde_json::{json, Value};
use std::sync::Arc;

/// Model output for a style analysis that only scored clarity
pub const PARTIAL_STYLE_REPLY: &str =
    r#"{"metrics":{"clarity":90},"summary":"Clear and friendly."}"#;

/// Model output that is not JSON at all
pub const PROSE_REPLY: &str = "I'd rate it highly!";

/// Text used across scenarios
pub const GREETING: &str = "Hello, how are you?";

pub fn openai_config(base_url: String) -> OpenAIConfig {
    OpenAIConfig {
        api_key: Some("test-openai-key".to_string()),
        base_url,
        default_model: "gpt-4.1-mini".to_string(),
    }
}

pub fn anthropic_config(base_url: String) -> AnthropicConfig {
    AnthropicConfig {
        api_key: Some("test-anthropic-key".to_string()),
        base_url,
        default_model: "claude-3-5-sonnet-20241022".to_string(),
        max_tokens: 1024,
    }
}

pub fn edge_function_config(base_url: String) -> EdgeFunctionConfig {
    EdgeFunctionConfig {
        base_url,
        anon_key: Some("test-anon-key".to_string()),
        function_name: "analyze-text".to_string(),
        default_model: "gpt-4.1-mini".to_string(),
    }
}

pub fn templates() -> Arc<TemplateRegistry> {
    Arc::new(TemplateRegistry::new())
}

/// Chat Completions response whose first choice carries `content`
pub fn openai_completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": content
            },
            "finish_reason": "stop"
        }],
        "usage": {
            "prompt_tokens": 120,
            "completion_tokens": 40,
            "total_tokens": 160
        }
    })
}

/// Messages API response with a single text block
pub fn anthropic_message(text: &str) -> Value {
    json!({
        "id": "msg_test",
        "type": "message",
        "role": "assistant",
        "model": "claude-3-5-sonnet-20241022",
        "content": [{"type": "text", "text": text}],
        "stop_reason": "end_turn",
        "usage": {"input_tokens": 120, "output_tokens": 40}
    })
}

/// Error body in the shape both vendors use
pub fn vendor_error(message: &str) -> Value {
    json!({
        "error": {
            "message": message,
            "type": "invalid_request_error"
        }
    })
}
