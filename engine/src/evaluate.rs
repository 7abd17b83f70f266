//! Retrieval evaluation: hit-rate and mean reciprocal rank

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::recipe::Recipe;

/// A question whose answer is the recipe with dish name `id`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GroundTruth {
    pub id: String,
    pub question: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RetrievalMetrics {
    pub hit_rate: f64,
    pub mrr: f64,
    pub questions: usize,
}

/// Read a ground-truth CSV with `id` and `question` columns
pub fn load_ground_truth(path: impl AsRef<Path>) -> Result<Vec<GroundTruth>> {
    let mut reader = csv::Reader::from_path(path)?;
    let records = reader
        .deserialize()
        .collect::<std::result::Result<Vec<GroundTruth>, _>>()?;
    Ok(records)
}

/// Split into the first `n` questions (validation) and the rest (test)
pub fn split_validation(records: &[GroundTruth], n: usize) -> (&[GroundTruth], &[GroundTruth]) {
    records.split_at(n.min(records.len()))
}

/// One row per question: whether each returned result is the expected recipe
pub fn relevance(expected: &str, results: &[&Recipe]) -> Vec<bool> {
    results
        .iter()
        .map(|recipe| recipe.dish_name == expected)
        .collect()
}

pub fn hit_rate(relevance_total: &[Vec<bool>]) -> f64 {
    if relevance_total.is_empty() {
        return 0.0;
    }
    let hits = relevance_total
        .iter()
        .filter(|row| row.contains(&true))
        .count();
    hits as f64 / relevance_total.len() as f64
}

/// Mean of 1/rank of the first relevant result, 0 for rows without one
pub fn mrr(relevance_total: &[Vec<bool>]) -> f64 {
    if relevance_total.is_empty() {
        return 0.0;
    }
    let total: f64 = relevance_total
        .iter()
        .filter_map(|row| row.iter().position(|relevant| *relevant))
        .map(|rank| 1.0 / (rank as f64 + 1.0))
        .sum();
    total / relevance_total.len() as f64
}

/// Run `search` for every question and score the results
pub fn evaluate<'r, F>(ground_truth: &[GroundTruth], mut search: F) -> RetrievalMetrics
where
    F: FnMut(&GroundTruth) -> Vec<&'r Recipe>,
{
    let relevance_total: Vec<Vec<bool>> = ground_truth
        .iter()
        .map(|q| relevance(&q.id, &search(q)))
        .collect();

    RetrievalMetrics {
        hit_rate: hit_rate(&relevance_total),
        mrr: mrr(&relevance_total),
        questions: ground_truth.len(),
    }
}
