use anyhow::{Context, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct Row {
    question: String,
}

/// Pick one question at random from the ground-truth CSV
pub fn random_question<R: Rng + ?Sized>(path: &Path, rng: &mut R) -> Result<String> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let questions = reader
        .deserialize::<Row>()
        .map(|row| row.map(|r| r.question))
        .collect::<Result<Vec<_>, _>>()
        .context("Failed to parse questions")?;

    questions
        .choose(rng)
        .cloned()
        .with_context(|| format!("No questions in {}", path.display()))
}

/// What the user typed at the chat prompt, as a question
pub fn ingredients_question(ingredients: &str) -> Option<String> {
    let ingredients = ingredients.trim();
    if ingredients.is_empty() {
        None
    } else {
        Some(format!("What can I cook with {}?", ingredients))
    }
}
