//! Chat completion client
//!
//! Talks to any OpenAI-compatible `/chat/completions` endpoint with a single
//! user message and returns the reply text trimmed of surrounding whitespace.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{EngineError, Result};

/// The default OpenAI API root
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// The default chat model
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// A text-generation backend
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Send `prompt` as a single user message and return the reply
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Model identifier, recorded alongside answers
    fn model(&self) -> &str;
}

/// A [`LanguageModel`] backed by the OpenAI chat completions API
pub struct OpenAiChat {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiChat {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Read `OPENAI_API_KEY`, and optionally `OPENAI_BASE_URL` and `OPENAI_MODEL`
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| EngineError::Llm {
            status: 0,
            message: "OPENAI_API_KEY environment variable not set".to_string(),
        })?;

        let mut chat = Self::new(api_key);
        if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
            chat = chat.with_base_url(base_url);
        }
        if let Ok(model) = std::env::var("OPENAI_MODEL") {
            chat = chat.with_model(model);
        }
        Ok(chat)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

// ── API request/response types ─────────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

#[async_trait]
impl LanguageModel for OpenAiChat {
    async fn complete(&self, prompt: &str) -> Result<String> {
        debug!(model = %self.model, prompt_len = prompt.len(), "chat completion");

        let request = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .inspect_err(|e| error!(error = %e, "chat request failed"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            error!(%status, "chat API error");
            return Err(EngineError::Llm {
                status: status.as_u16(),
                message,
            });
        }

        let reply: ChatResponse = response.json().await?;
        let content = reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| EngineError::Llm {
                status: status.as_u16(),
                message: "response contained no message content".to_string(),
            })?;

        Ok(content.trim().to_string())
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    async fn spawn_api(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/v1", addr)
    }

    #[tokio::test]
    async fn test_complete_returns_trimmed_content() {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["model"], "gpt-4o-mini");
                assert_eq!(body["messages"][0]["role"], "user");
                assert_eq!(body["messages"][0]["content"], "hello");
                Json(json!({
                    "choices": [{"message": {"role": "assistant", "content": "  Try the stew.\n"}}]
                }))
            }),
        );
        let base_url = spawn_api(app).await;

        let chat = OpenAiChat::new("sk-test").with_base_url(base_url);
        assert_eq!(chat.complete("hello").await.unwrap(), "Try the stew.");
    }

    #[tokio::test]
    async fn test_complete_surfaces_api_error() {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"error": {"message": "Incorrect API key"}})),
                )
            }),
        );
        let base_url = spawn_api(app).await;

        let chat = OpenAiChat::new("bad").with_base_url(base_url);
        match chat.complete("hello").await.unwrap_err() {
            EngineError::Llm { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Incorrect API key");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_builder_overrides() {
        let chat = OpenAiChat::new("sk")
            .with_model("gpt-3.5-turbo")
            .with_base_url("http://localhost:9000/v1/");
        assert_eq!(chat.model(), "gpt-3.5-turbo");
        assert_eq!(chat.base_url, "http://localhost:9000/v1");
    }
}
