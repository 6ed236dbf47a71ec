use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;

use crate::models::{ChatError, CohereChatResponse};

const CHAT_MODEL: &str = "command-a-03-2025";

const SYSTEM_PREAMBLE: &str = "You are \"MindCare AI\", a compassionate and supportive \
assistant for a mental wellness service. Listen carefully, respond with warmth and without \
judgement, and keep answers short and practical. You are not a medical professional: for \
anything that sounds like a crisis or needs diagnosis, gently encourage the person to book a \
consultation with one of our specialists or contact local emergency services.";

/// Client for the Cohere v2 chat API. Every request carries the same
/// supportive-counselor preamble; conversation state lives entirely on the
/// frontend.
pub struct CohereClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl CohereClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.cohere_base_url.clone(),
            api_key: config.cohere_api_key.clone(),
        }
    }

    pub async fn chat(&self, user_message: &str) -> Result<String, ChatError> {
        let url = format!("{}/v2/chat", self.base_url);
        debug!("Forwarding chat message ({} chars)", user_message.len());

        let body = json!({
            "model": CHAT_MODEL,
            "messages": [
                { "role": "system", "content": SYSTEM_PREAMBLE },
                { "role": "user", "content": user_message },
            ],
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatError::Provider(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("provider rejected the request")
                .to_string();
            return Err(ChatError::Provider(format!("{} ({})", message, status)));
        }

        let parsed: CohereChatResponse = response
            .json()
            .await
            .map_err(|e| ChatError::Provider(format!("unreadable response: {}", e)))?;

        parsed
            .message
            .content
            .into_iter()
            .next()
            .map(|block| block.text)
            .ok_or_else(|| ChatError::Provider("empty response".to_string()))
    }
}
