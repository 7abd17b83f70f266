use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Deserialize)]
pub struct Answer {
    pub conversation_id: String,
    #[serde(default = "no_answer")]
    pub answer: String,
}

fn no_answer() -> String {
    "No answer provided".to_string()
}

pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn health_check(&self) -> bool {
        match self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    /// Ask the backend a question, timing the round trip
    pub async fn ask(&self, question: &str) -> Result<(Answer, Duration)> {
        let started = Instant::now();
        let body = serde_json::json!({ "question": question });

        let resp = self
            .client
            .post(format!("{}/question", self.base_url))
            .json(&body)
            .send()
            .await
            .context("Failed to reach backend")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let detail = resp.text().await.unwrap_or_default();
            anyhow::bail!("Question failed: {} {}", status, detail);
        }

        let answer: Answer = resp.json().await?;
        Ok((answer, started.elapsed()))
    }

    /// Send +1 / -1 for a conversation, returning the HTTP status code
    pub async fn send_feedback(&self, conversation_id: &str, feedback: i8) -> Result<u16> {
        let body = serde_json::json!({
            "conversation_id": conversation_id,
            "feedback": feedback
        });

        let resp = self
            .client
            .post(format!("{}/feedback", self.base_url))
            .json(&body)
            .send()
            .await
            .context("Failed to reach backend")?;

        Ok(resp.status().as_u16())
    }
}
