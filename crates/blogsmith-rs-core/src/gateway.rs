//! Validate-then-forward gateway to the generation model.

use crate::error::GenerationError;
use autoagents_llm::LLMProvider;
use autoagents_llm::chat::{ChatMessage, ChatRole, MessageType};
use blogsmith_rs_protocol::GenerationRequest;
use log::{debug, info, warn};
use std::sync::Arc;

/// Minimum prompt length, in characters.
pub const MIN_PROMPT_CHARS: usize = 10;

/// Message surfaced to users for every generation failure.
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate content. Please try again.";

/// Forwards validated generation requests to an LLM provider.
///
/// Each call to [`GenerationGateway::generate`] issues at most one model
/// request. Failures are reported once and never retried.
#[derive(Clone)]
pub struct GenerationGateway {
    llm: Arc<dyn LLMProvider>,
    instructions: Option<String>,
}

impl GenerationGateway {
    pub fn new(llm: Arc<dyn LLMProvider>) -> Self {
        Self {
            llm,
            instructions: None,
        }
    }

    /// Prefix every rendered prompt with standing instructions.
    pub fn with_instructions(mut self, instructions: Option<String>) -> Self {
        self.instructions = instructions.filter(|value| !value.trim().is_empty());
        self
    }

    /// Check a request without contacting the model.
    pub fn validate(request: &GenerationRequest) -> Result<(), GenerationError> {
        if request.length.is_empty() {
            return Err(GenerationError::InvalidInput(
                "length is required".to_string(),
            ));
        }
        if request.tone.is_empty() {
            return Err(GenerationError::InvalidInput("tone is required".to_string()));
        }
        if request.prompt.chars().count() < MIN_PROMPT_CHARS {
            return Err(GenerationError::InvalidInput(format!(
                "prompt must be at least {MIN_PROMPT_CHARS} characters"
            )));
        }
        Ok(())
    }

    /// Render the single user message sent to the model.
    pub fn render_prompt(&self, request: &GenerationRequest) -> String {
        let mut prompt = String::new();
        if let Some(instructions) = &self.instructions {
            prompt.push_str(instructions.trim());
            prompt.push_str("\n\n");
        }
        prompt.push_str(&format!(
            "Write a {length} {label} in a {tone} tone.\n\nTopic:\n{topic}",
            length = request.length.to_lowercase(),
            label = request.content_type.label().to_lowercase(),
            tone = request.tone.to_lowercase(),
            topic = request.prompt,
        ));
        prompt
    }

    /// Validate `request`, forward it once, and return the text verbatim.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        if let Err(err) = Self::validate(request) {
            debug!("generation request rejected ({err})");
            return Err(err);
        }

        let messages = [ChatMessage {
            role: ChatRole::User,
            message_type: MessageType::Text,
            content: self.render_prompt(request),
        }];
        info!(
            "requesting generation (content_type={}, prompt_len={})",
            request.content_type,
            request.prompt.len()
        );
        let response = match self.llm.chat_with_tools(&messages, None, None).await {
            Ok(response) => response,
            Err(err) => {
                warn!("generation collaborator failed: {err}");
                return Err(generation_failed());
            }
        };
        match response.text() {
            Some(text) if !text.is_empty() => {
                debug!("generation succeeded (text_len={})", text.len());
                Ok(text)
            }
            _ => {
                warn!("generation collaborator returned no text");
                Err(generation_failed())
            }
        }
    }
}

fn generation_failed() -> GenerationError {
    GenerationError::GenerationFailed {
        message: GENERATION_FAILED_MESSAGE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blogsmith_rs_protocol::ContentType;
    use blogsmith_rs_test_utils::{FixedLLM, RecordingChatLLM};
    use pretty_assertions::assert_eq;

    fn request(prompt: &str) -> GenerationRequest {
        GenerationRequest::new(ContentType::Blog, "Medium", "Friendly", prompt)
    }

    #[test]
    fn validate_rejects_missing_length_and_tone() {
        let mut missing_length = request("Write about cats please");
        missing_length.length.clear();
        assert_eq!(
            GenerationGateway::validate(&missing_length),
            Err(GenerationError::InvalidInput(
                "length is required".to_string()
            ))
        );

        let mut missing_tone = request("Write about cats please");
        missing_tone.tone.clear();
        assert!(GenerationGateway::validate(&missing_tone).is_err());
    }

    #[test]
    fn validate_counts_characters_not_bytes() {
        assert!(GenerationGateway::validate(&request("ééééééééé")).is_err());
        assert!(GenerationGateway::validate(&request("éééééééééé")).is_ok());
    }

    #[test]
    fn render_prompt_includes_parameters_and_instructions() {
        let gateway = GenerationGateway::new(Arc::new(FixedLLM::new("ok")))
            .with_instructions(Some("You are a copywriter.".to_string()));
        let rendered = gateway.render_prompt(&GenerationRequest::new(
            ContentType::AdCopy,
            "Short",
            "Bold",
            "Running shoes for trail runners",
        ));
        assert_eq!(
            rendered,
            "You are a copywriter.\n\nWrite a short ad copy in a bold tone.\n\nTopic:\nRunning shoes for trail runners"
        );
    }

    #[tokio::test]
    async fn generate_sends_one_user_message() {
        let llm = Arc::new(RecordingChatLLM::new("ok"));
        let gateway = GenerationGateway::new(llm.clone());
        gateway
            .generate(&request("Write about cats please"))
            .await
            .expect("generate");

        let captured = llm.last_messages.lock().clone();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].role, ChatRole::User);
        assert!(captured[0].content.contains("Write about cats please"));
    }

    #[test]
    fn blank_instructions_are_ignored() {
        let gateway = GenerationGateway::new(Arc::new(FixedLLM::new("ok")))
            .with_instructions(Some("   ".to_string()));
        assert!(gateway.render_prompt(&request("Write about cats")).starts_with("Write a"));
    }
}
