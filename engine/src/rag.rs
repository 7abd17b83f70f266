//! Retrieval-augmented answering: search, build prompt, complete

use std::sync::Arc;

use serde::Serialize;

use crate::error::Result;
use crate::index::RecipeIndex;
use crate::llm::LanguageModel;
use crate::prompt::build_prompt;
use crate::search::{SearchConfig, SearchHit};

/// An answer together with the dishes it was grounded on
#[derive(Debug, Clone, Serialize)]
pub struct RagAnswer {
    pub answer: String,
    pub dishes: Vec<String>,
}

/// Recipe index plus language model
#[derive(Clone)]
pub struct FridgeChef {
    index: Arc<RecipeIndex>,
    llm: Arc<dyn LanguageModel>,
    search: SearchConfig,
}

impl FridgeChef {
    pub fn new(index: Arc<RecipeIndex>, llm: Arc<dyn LanguageModel>) -> Self {
        Self {
            index,
            llm,
            search: SearchConfig::interactive(),
        }
    }

    pub fn index(&self) -> &RecipeIndex {
        &self.index
    }

    pub fn model(&self) -> &str {
        self.llm.model()
    }

    pub fn search(&self, question: &str) -> Vec<SearchHit<'_>> {
        self.index.search(question, &self.search)
    }

    pub async fn answer(&self, question: &str) -> Result<RagAnswer> {
        let hits = self.search(question);
        tracing::debug!("Retrieved {} recipes for question", hits.len());

        let prompt = build_prompt(question, hits.iter().map(|hit| hit.recipe));
        let dishes = hits
            .iter()
            .map(|hit| hit.recipe.dish_name.clone())
            .collect();

        let answer = self.llm.complete(&prompt).await?;
        Ok(RagAnswer { answer, dishes })
    }
}
