//! Conversation state and running stats for one client session

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Positive,
    Negative,
    Skip,
}

impl Feedback {
    /// Value sent to the backend; skips are never sent
    pub fn value(self) -> Option<i8> {
        match self {
            Feedback::Positive => Some(1),
            Feedback::Negative => Some(-1),
            Feedback::Skip => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStats {
    pub questions: usize,
    pub relevant: usize,
    pub non_relevant: usize,
    pub skipped: usize,
    pub times: Vec<f64>,
}

impl SessionStats {
    pub fn avg_response_time(&self) -> Option<f64> {
        if self.times.is_empty() {
            None
        } else {
            Some(self.times.iter().sum::<f64>() / self.times.len() as f64)
        }
    }
}

#[derive(Debug, Default)]
pub struct Session {
    pub conversation: Vec<(String, String)>,
    pub conversation_id: Option<String>,
    pub stats: SessionStats,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_answer(
        &mut self,
        question: String,
        answer: String,
        conversation_id: String,
        elapsed: Duration,
    ) {
        self.conversation_id = Some(conversation_id);
        self.conversation.push((question, answer));
        self.stats.questions += 1;
        self.stats.times.push(elapsed.as_secs_f64());
    }

    pub fn record_feedback(&mut self, feedback: Feedback) {
        match feedback {
            Feedback::Positive => self.stats.relevant += 1,
            Feedback::Negative => self.stats.non_relevant += 1,
            Feedback::Skip => self.stats.skipped += 1,
        }
    }

    /// Forget the conversation and start the stats over
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
