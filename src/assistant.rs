//! Assistant text-generation collaborator.
//!
//! This module defines the [`AssistantClient`] trait for turning a user
//! message into assistant text, with three implementations: a production
//! client for the Gemini API, a scripted keyword responder that needs no
//! network, and a mock for tests. The request lifecycle treats all of them
//! as opaque: a prompt goes in, text or an error comes out.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::json;

use crate::error::{HelplineError, Result};

/// Opening line every conversation starts with.
pub const GREETING: &str = "Hello! I'm your accessibility assistant. How can I help you today?";

/// Trait for generating assistant responses.
///
/// `context` describes the assistance platform; `category` optionally names
/// the kind of assistance the user is asking about.
#[async_trait]
pub trait AssistantClient: Send + Sync {
    /// Generate a response to a user message.
    ///
    /// # Errors
    /// Returns `MissingApiKey` if the client needs a key that was never
    /// set, or an `Http`/`Upstream` error when the backing service fails.
    async fn generate_response(
        &self,
        message: &str,
        context: &str,
        category: Option<&str>,
    ) -> Result<String>;
}

// ============================================================================
// Conversation transcript
// ============================================================================

/// Who said a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One message in an assistant conversation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// An assistant conversation transcript.
///
/// Always starts (and resets to) the canned greeting.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage {
                role: ChatRole::Assistant,
                content: GREETING.to_string(),
            }],
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage {
            role: ChatRole::User,
            content: content.into(),
        });
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage {
            role: ChatRole::Assistant,
            content: content.into(),
        });
    }

    /// Drop everything and start over from the greeting.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.messages.push(ChatMessage {
            role: ChatRole::Assistant,
            content: GREETING.to_string(),
        });
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Production implementation backed by the Gemini API
// ============================================================================

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
const GEMINI_PATH: &str = "/v1beta/models/gemini-pro:generateContent";

/// Assistant client backed by the Gemini `generateContent` API.
///
/// The API key is held in memory only and can be set or replaced after
/// construction; calls without a key fail with `MissingApiKey`.
pub struct GeminiClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: Mutex<Option<String>>,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: GEMINI_ENDPOINT.to_string(),
            api_key: Mutex::new(api_key),
        }
    }

    /// Point the client at a different base URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn set_api_key(&self, key: impl Into<String>) {
        *self.api_key.lock() = Some(key.into());
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.lock().is_some()
    }

    /// Assemble the full prompt sent to the model.
    fn build_prompt(message: &str, context: &str, category: Option<&str>) -> String {
        let category_context = category
            .map(|c| format!("The user is asking about {}-related assistance. ", c))
            .unwrap_or_default();

        format!(
            "{}You are a helpful AI assistant specializing in accessibility and disability support.\n\
             Provide clear, concise, and respectful guidance for the following query related to accessibility assistance.\n\
             Context about the assistance platform: {}\n\n\
             User query: {}",
            category_context, context, message
        )
    }
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

impl GeminiResponse {
    /// Pull the first candidate's first text part, if the body carries one.
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
    }
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    error: Option<GeminiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: Option<String>,
}

#[async_trait]
impl AssistantClient for GeminiClient {
    #[tracing::instrument(skip(self, message, context), fields(category = category.unwrap_or("none")))]
    async fn generate_response(
        &self,
        message: &str,
        context: &str,
        category: Option<&str>,
    ) -> Result<String> {
        let api_key = self
            .api_key
            .lock()
            .clone()
            .ok_or(HelplineError::MissingApiKey)?;

        let prompt = Self::build_prompt(message, context, category);
        let url = format!("{}{}?key={}", self.endpoint, GEMINI_PATH, api_key);

        tracing::debug!(prompt_len = prompt.len(), "Calling assistant API");

        let response = self
            .client
            .post(&url)
            .json(&json!({
                "contents": [{ "parts": [{ "text": prompt }] }],
                "generationConfig": {
                    "temperature": 0.7,
                    "topK": 40,
                    "topP": 0.95,
                    "maxOutputTokens": 1024,
                }
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let detail = response
                .json::<GeminiErrorBody>()
                .await
                .ok()
                .and_then(|b| b.error)
                .and_then(|e| e.message)
                .unwrap_or_else(|| "Failed to generate response".to_string());
            tracing::error!(status, error = %detail, "Assistant API returned an error");
            return Err(HelplineError::Upstream(anyhow::anyhow!(detail)));
        }

        let body: GeminiResponse = response.json().await?;
        match body.into_text() {
            Some(text) => {
                tracing::info!(response_len = text.len(), "Assistant response generated");
                Ok(text)
            }
            None => Err(HelplineError::Upstream(anyhow::anyhow!(
                "Invalid response format from Gemini API"
            ))),
        }
    }
}

// ============================================================================
// Scripted implementation (no network)
// ============================================================================

/// Keyword-matched assistant used when no API key is available.
///
/// Always succeeds; messages that match none of the known topics get a
/// generic prompt for more detail.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptedAssistant;

impl ScriptedAssistant {
    pub fn new() -> Self {
        Self
    }

    fn respond(message: &str) -> &'static str {
        let lowered = message.to_lowercase();
        if lowered.contains("wheelchair") {
            "I can help you find wheelchair accessible locations nearby. Would you like me to show places with ramp access?"
        } else if lowered.contains("blind") || lowered.contains("vision") {
            "I can activate screen reading features or provide audio descriptions. Would you like me to enable these accessibility features?"
        } else if lowered.contains("deaf") || lowered.contains("hearing") {
            "I can provide text captions or visual alerts. Would you like me to enable these features?"
        } else if lowered.contains("medicine") || lowered.contains("medication") {
            "I can set up medication reminders or connect you with pharmacy services. What specific help do you need with your medication?"
        } else {
            "I'm here to assist with accessibility needs. Could you tell me more about what specific help you require?"
        }
    }
}

#[async_trait]
impl AssistantClient for ScriptedAssistant {
    async fn generate_response(
        &self,
        message: &str,
        _context: &str,
        _category: Option<&str>,
    ) -> Result<String> {
        Ok(Self::respond(message).to_string())
    }
}

// ============================================================================
// Test/Mock implementation
// ============================================================================

/// Record of a call made to the mock assistant.
#[derive(Debug, Clone)]
pub struct MockAssistantCall {
    pub message: String,
    pub context: String,
    pub category: Option<String>,
}

/// Mock assistant for testing.
///
/// Queued responses are returned in FIFO order; every call is recorded.
#[derive(Default)]
pub struct MockAssistant {
    responses: Mutex<Vec<Result<String>>>,
    calls: Mutex<Vec<MockAssistantCall>>,
}

impl MockAssistant {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response to be returned by the next call.
    pub fn add_response(&self, response: Result<String>) {
        self.responses.lock().push(response);
    }

    /// Get all calls that have been made to this mock.
    pub fn get_calls(&self) -> Vec<MockAssistantCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl AssistantClient for MockAssistant {
    async fn generate_response(
        &self,
        message: &str,
        context: &str,
        category: Option<&str>,
    ) -> Result<String> {
        self.calls.lock().push(MockAssistantCall {
            message: message.to_string(),
            context: context.to_string(),
            category: category.map(|c| c.to_string()),
        });

        let mut responses = self.responses.lock();
        if responses.is_empty() {
            Err(HelplineError::Upstream(anyhow::anyhow!(
                "No mock response configured for message: {}",
                message
            )))
        } else {
            responses.remove(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversation_starts_and_resets_to_greeting() {
        let mut conversation = Conversation::new();
        assert_eq!(conversation.messages().len(), 1);
        assert_eq!(conversation.messages()[0].content, GREETING);

        conversation.push_user("Can you help with medication?");
        conversation.push_assistant("Of course.");
        assert_eq!(conversation.messages().len(), 3);

        conversation.reset();
        assert_eq!(conversation.messages().len(), 1);
        assert_eq!(conversation.messages()[0].role, ChatRole::Assistant);
    }

    #[tokio::test]
    async fn scripted_assistant_matches_keywords() {
        let assistant = ScriptedAssistant::new();

        let response = assistant
            .generate_response("Where can I go with my Wheelchair?", "", None)
            .await
            .unwrap();
        assert!(response.contains("wheelchair accessible"));

        let response = assistant
            .generate_response("I need help with my medication schedule", "", None)
            .await
            .unwrap();
        assert!(response.contains("medication reminders"));

        let response = assistant
            .generate_response("My vision is getting worse", "", None)
            .await
            .unwrap();
        assert!(response.contains("screen reading"));

        let response = assistant
            .generate_response("I'm deaf and need alerts", "", None)
            .await
            .unwrap();
        assert!(response.contains("text captions"));

        let response = assistant
            .generate_response("hello there", "", None)
            .await
            .unwrap();
        assert!(response.contains("tell me more"));
    }

    #[tokio::test]
    async fn mock_assistant_returns_queued_responses_in_order() {
        let mock = MockAssistant::new();
        mock.add_response(Ok("first".to_string()));
        mock.add_response(Ok("second".to_string()));

        let first = mock
            .generate_response("q1", "platform", Some("medical"))
            .await
            .unwrap();
        let second = mock.generate_response("q2", "platform", None).await.unwrap();
        assert_eq!(first, "first");
        assert_eq!(second, "second");

        let calls = mock.get_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].message, "q1");
        assert_eq!(calls[0].category.as_deref(), Some("medical"));
        assert_eq!(calls[1].category, None);
    }

    #[tokio::test]
    async fn mock_assistant_errors_when_queue_is_empty() {
        let mock = MockAssistant::new();
        let result = mock.generate_response("q", "", None).await;
        assert!(matches!(result, Err(HelplineError::Upstream(_))));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn gemini_without_key_fails_fast() {
        let client = GeminiClient::new(None);
        let result = client.generate_response("hi", "platform", None).await;
        assert!(matches!(result, Err(HelplineError::MissingApiKey)));

        client.set_api_key("k");
        assert!(client.has_api_key());
    }

    #[test]
    fn gemini_body_with_candidate_text_extracts_it() {
        let raw = r#"{
            "candidates": [{
                "content": { "parts": [{ "text": "Here is some guidance." }] },
                "finishReason": "STOP"
            }]
        }"#;
        let body: GeminiResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(body.into_text().as_deref(), Some("Here is some guidance."));
    }

    #[test]
    fn gemini_malformed_bodies_yield_no_text() {
        // Each shape parses but is missing the candidate/content/parts/text
        // chain somewhere; all must surface as the invalid-format error path.
        for raw in [
            r#"{}"#,
            r#"{"candidates": []}"#,
            r#"{"candidates": [{}]}"#,
            r#"{"candidates": [{"content": {"parts": []}}]}"#,
            r#"{"candidates": [{"content": {"parts": [{}]}}]}"#,
        ] {
            let body: GeminiResponse = serde_json::from_str(raw).unwrap();
            assert!(body.into_text().is_none(), "expected no text for {}", raw);
        }
    }

    #[test]
    fn prompt_includes_category_context_when_present() {
        let with_category = GeminiClient::build_prompt("query", "ctx", Some("mobility"));
        assert!(with_category.starts_with("The user is asking about mobility-related assistance."));
        assert!(with_category.contains("Context about the assistance platform: ctx"));
        assert!(with_category.ends_with("User query: query"));

        let without = GeminiClient::build_prompt("query", "ctx", None);
        assert!(without.starts_with("You are a helpful AI assistant"));
    }
}
