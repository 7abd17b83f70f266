//! Append-only JSON-lines logs for answered questions and user feedback

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::error::Result;

const CONVERSATIONS_FILE: &str = "conversations.jsonl";
const FEEDBACK_FILE: &str = "feedback.jsonl";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ConversationRecord {
    pub conversation_id: String,
    pub question: String,
    pub answer: String,
    pub model: String,
    pub response_time_secs: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FeedbackRecord {
    pub conversation_id: String,
    /// +1 relevant, -1 not relevant
    pub feedback: i8,
    pub timestamp: DateTime<Utc>,
}

/// Thumbs up / down
pub fn is_valid_feedback(value: i64) -> bool {
    value == 1 || value == -1
}

/// Flat-file store for the backend
pub struct FeedbackLog {
    conversations_path: PathBuf,
    feedback_path: PathBuf,
    known: Mutex<HashSet<String>>,
}

impl FeedbackLog {
    /// Use (and create if needed) `dir` for the log files
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir).await?;

        Ok(Self {
            conversations_path: dir.join(CONVERSATIONS_FILE),
            feedback_path: dir.join(FEEDBACK_FILE),
            known: Mutex::new(HashSet::new()),
        })
    }

    pub async fn record_conversation(&self, record: &ConversationRecord) -> Result<()> {
        let mut known = self.known.lock().await;
        append_line(&self.conversations_path, record).await?;
        known.insert(record.conversation_id.clone());
        Ok(())
    }

    /// Whether this process has recorded the conversation
    pub async fn is_known(&self, conversation_id: &str) -> bool {
        self.known.lock().await.contains(conversation_id)
    }

    pub async fn record_feedback(&self, conversation_id: &str, feedback: i8) -> Result<()> {
        let _guard = self.known.lock().await;
        let record = FeedbackRecord {
            conversation_id: conversation_id.to_string(),
            feedback,
            timestamp: Utc::now(),
        };
        append_line(&self.feedback_path, &record).await
    }

    pub fn conversations_path(&self) -> &Path {
        &self.conversations_path
    }

    pub fn feedback_path(&self) -> &Path {
        &self.feedback_path
    }
}

async fn append_line<T: Serialize>(path: &Path, record: &T) -> Result<()> {
    let mut line = serde_json::to_vec(record)?;
    line.push(b'\n');

    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(&line).await?;
    file.flush().await?;
    Ok(())
}
