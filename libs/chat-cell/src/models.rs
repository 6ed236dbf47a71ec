use serde::Deserialize;

use shared_models::error::AppError;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
}

/// Cohere v2 chat response, reduced to the single text block we read.
#[derive(Debug, Deserialize)]
pub struct CohereChatResponse {
    pub message: CohereMessage,
}

#[derive(Debug, Deserialize)]
pub struct CohereMessage {
    pub content: Vec<CohereContent>,
}

#[derive(Debug, Deserialize)]
pub struct CohereContent {
    pub text: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Message is required")]
    MessageRequired,

    #[error("Failed to get response from AI: {0}")]
    Provider(String),
}

impl From<ChatError> for AppError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::MessageRequired => AppError::BadRequest("Message is required".to_string()),
            ChatError::Provider(msg) => {
                AppError::ExternalService(format!("Failed to get response from AI: {}", msg))
            }
        }
    }
}
