//! LLM-as-judge grading of generated answers

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::evaluate::GroundTruth;
use crate::llm::LanguageModel;
use crate::prompt::build_judge_prompt;
use crate::rag::FridgeChef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Relevance {
    NonRelevant,
    PartlyRelevant,
    Relevant,
}

impl fmt::Display for Relevance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Relevance::NonRelevant => "NON_RELEVANT",
            Relevance::PartlyRelevant => "PARTLY_RELEVANT",
            Relevance::Relevant => "RELEVANT",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Verdict {
    #[serde(rename = "Relevance")]
    pub relevance: Relevance,
    #[serde(rename = "Explanation", default)]
    pub explanation: String,
}

/// Parse the judge's reply. Tolerates a surrounding code fence.
pub fn parse_verdict(reply: &str) -> Result<Verdict> {
    let body = reply.trim();
    let body = body
        .strip_prefix("```json")
        .or_else(|| body.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(body);

    serde_json::from_str(body.trim()).map_err(|e| EngineError::Verdict(format!("{e}: {reply}")))
}

/// One graded question
#[derive(Debug, Clone, Serialize)]
pub struct JudgedAnswer {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub relevance: Relevance,
    pub explanation: String,
}

/// Verdict counts and their share of all graded answers
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JudgeSummary {
    pub total: usize,
    pub counts: BTreeMap<Relevance, usize>,
    pub fractions: BTreeMap<Relevance, f64>,
}

impl JudgeSummary {
    pub fn from_judged(judged: &[JudgedAnswer]) -> Self {
        let mut counts = BTreeMap::new();
        for item in judged {
            *counts.entry(item.relevance).or_insert(0) += 1;
        }
        let total = judged.len();
        let fractions = counts
            .iter()
            .map(|(relevance, count)| (*relevance, *count as f64 / total as f64))
            .collect();

        Self {
            total,
            counts,
            fractions,
        }
    }
}

/// Answer `record` with the RAG pipeline and have `judge` grade the answer
pub async fn judge_one(
    chef: &FridgeChef,
    judge: &dyn LanguageModel,
    record: &GroundTruth,
) -> Result<JudgedAnswer> {
    let answer = chef.answer(&record.question).await?.answer;
    let reply = judge
        .complete(&build_judge_prompt(&record.question, &answer))
        .await?;
    let verdict = parse_verdict(&reply)?;

    Ok(JudgedAnswer {
        id: record.id.clone(),
        question: record.question.clone(),
        answer,
        relevance: verdict.relevance,
        explanation: verdict.explanation,
    })
}

/// Grade every record in order. Stops at the first error.
pub async fn judge_all(
    chef: &FridgeChef,
    judge: &dyn LanguageModel,
    records: &[GroundTruth],
) -> Result<Vec<JudgedAnswer>> {
    let mut judged = Vec::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        let item = judge_one(chef, judge, record).await?;
        tracing::info!(
            "[{}/{}] {} -> {}",
            i + 1,
            records.len(),
            record.id,
            item.relevance
        );
        judged.push(item);
    }
    Ok(judged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rag::tests::{sample_index, StubModel};
    use std::sync::Arc;

    #[test]
    fn test_parse_verdict() {
        let verdict = parse_verdict(
            r#"{"Relevance": "PARTLY_RELEVANT", "Explanation": "Mentions tofu only."}"#,
        )
        .unwrap();
        assert_eq!(verdict.relevance, Relevance::PartlyRelevant);
        assert_eq!(verdict.explanation, "Mentions tofu only.");

        let fenced = "```json\n{\"Relevance\": \"RELEVANT\", \"Explanation\": \"ok\"}\n```";
        assert_eq!(parse_verdict(fenced).unwrap().relevance, Relevance::Relevant);
    }

    #[test]
    fn test_parse_verdict_rejects_garbage() {
        assert!(matches!(
            parse_verdict("The answer is relevant."),
            Err(EngineError::Verdict(_))
        ));
        assert!(parse_verdict(r#"{"Relevance": "MAYBE"}"#).is_err());
    }

    #[test]
    fn test_summary_fractions() {
        let item = |relevance| JudgedAnswer {
            id: String::new(),
            question: String::new(),
            answer: String::new(),
            relevance,
            explanation: String::new(),
        };
        let judged = vec![
            item(Relevance::Relevant),
            item(Relevance::Relevant),
            item(Relevance::Relevant),
            item(Relevance::NonRelevant),
        ];

        let summary = JudgeSummary::from_judged(&judged);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.counts[&Relevance::Relevant], 3);
        assert_eq!(summary.fractions[&Relevance::NonRelevant], 0.25);
        assert!(!summary.counts.contains_key(&Relevance::PartlyRelevant));
    }

    #[tokio::test]
    async fn test_judge_all_grades_each_answer() {
        let chef = FridgeChef::new(sample_index(), Arc::new(StubModel::new("Cook the dal.")));
        let judge = StubModel::new(r#"{"Relevance": "RELEVANT", "Explanation": "Uses spinach."}"#);
        let records = vec![GroundTruth {
            id: "Spinach Dal".into(),
            question: "What can I make with spinach?".into(),
        }];

        let judged = judge_all(&chef, &judge, &records).await.unwrap();

        assert_eq!(judged.len(), 1);
        assert_eq!(judged[0].answer, "Cook the dal.");
        assert_eq!(judged[0].relevance, Relevance::Relevant);
        let prompts = judge.prompts.lock().unwrap();
        assert!(prompts[0].contains("Generated Answer: Cook the dal."));
    }
}
