//! TF-IDF Recipe Index
//!
//! Fits one vocabulary and IDF table per text field over the whole corpus.
//! A query is scored against every field by cosine similarity, scaled by the
//! field boost and summed. The index is built in one pass and is read-only
//! afterwards.

use std::collections::{BTreeMap, HashMap};

use tantivy::tokenizer::{
    LowerCaser, RemoveLongFilter, SimpleTokenizer, StopWordFilter, TextAnalyzer, Token,
    TokenStream,
};

use crate::recipe::{Recipe, RecipeField};
use crate::search::{SearchConfig, SearchHit};
use crate::stop_words;

/// Tokens of this many bytes or more are dropped
const MAX_TOKEN_BYTES: usize = 40;

/// Single-character tokens carry no signal for recipes
const MIN_TOKEN_CHARS: usize = 2;

/// Which fields are scored as text and which are exact-match filters
#[derive(Debug, Clone)]
pub struct IndexConfig {
    pub text_fields: Vec<RecipeField>,
    pub keyword_fields: Vec<RecipeField>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            text_fields: RecipeField::ALL.to_vec(),
            keyword_fields: Vec::new(),
        }
    }
}

/// Term weights for one text field
struct FieldModel {
    field: RecipeField,
    vocab: HashMap<String, usize>,
    idf: Vec<f32>,
    /// term id -> (doc id, normalized tf-idf weight)
    postings: Vec<Vec<(usize, f32)>>,
}

impl FieldModel {
    fn fit(field: RecipeField, docs: &[Vec<String>]) -> Self {
        let mut terms: Vec<&str> = docs.iter().flatten().map(String::as_str).collect();
        terms.sort_unstable();
        terms.dedup();
        let vocab: HashMap<String, usize> = terms
            .iter()
            .enumerate()
            .map(|(id, term)| (term.to_string(), id))
            .collect();

        let mut doc_freq = vec![0usize; vocab.len()];
        let counts: Vec<BTreeMap<usize, usize>> = docs
            .iter()
            .map(|tokens| {
                let counts = term_counts(tokens, &vocab);
                for term_id in counts.keys() {
                    doc_freq[*term_id] += 1;
                }
                counts
            })
            .collect();

        let n = docs.len() as f32;
        let idf: Vec<f32> = doc_freq
            .iter()
            .map(|df| ((1.0 + n) / (1.0 + *df as f32)).ln() + 1.0)
            .collect();

        let mut postings = vec![Vec::new(); vocab.len()];
        for (doc_id, doc_counts) in counts.iter().enumerate() {
            for (term_id, weight) in weigh(doc_counts, &idf) {
                postings[term_id].push((doc_id, weight));
            }
        }

        Self {
            field,
            vocab,
            idf,
            postings,
        }
    }

    /// Add `boost * cosine(query, doc)` to every matching document
    fn accumulate(&self, query_tokens: &[String], boost: f32, scores: &mut [f32]) {
        let counts = term_counts(query_tokens, &self.vocab);
        for (term_id, query_weight) in weigh(&counts, &self.idf) {
            for (doc_id, doc_weight) in &self.postings[term_id] {
                scores[*doc_id] += boost * query_weight * doc_weight;
            }
        }
    }
}

fn term_counts(tokens: &[String], vocab: &HashMap<String, usize>) -> BTreeMap<usize, usize> {
    let mut counts = BTreeMap::new();
    for token in tokens {
        if let Some(&term_id) = vocab.get(token) {
            *counts.entry(term_id).or_insert(0) += 1;
        }
    }
    counts
}

/// Raw tf * idf, L2-normalized, in term id order
fn weigh(counts: &BTreeMap<usize, usize>, idf: &[f32]) -> Vec<(usize, f32)> {
    let mut weights: Vec<(usize, f32)> = counts
        .iter()
        .map(|(term_id, count)| (*term_id, *count as f32 * idf[*term_id]))
        .collect();
    let norm = weights.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
    if norm > 0.0 {
        for (_, w) in &mut weights {
            *w /= norm;
        }
    }
    weights
}

fn build_analyzer() -> TextAnalyzer {
    let words = stop_words::ENGLISH.iter().map(|word| word.to_string());
    TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(RemoveLongFilter::limit(MAX_TOKEN_BYTES))
        .filter(LowerCaser)
        .filter(StopWordFilter::remove(words))
        .build()
}

/// In-memory TF-IDF index over recipe records
pub struct RecipeIndex {
    recipes: Vec<Recipe>,
    fields: Vec<FieldModel>,
    keyword_fields: Vec<RecipeField>,
    analyzer: TextAnalyzer,
}

impl RecipeIndex {
    /// Fit the index over the full corpus
    pub fn fit(recipes: Vec<Recipe>, config: IndexConfig) -> Self {
        let analyzer = build_analyzer();
        let mut index = Self {
            recipes: Vec::new(),
            fields: Vec::new(),
            keyword_fields: config.keyword_fields,
            analyzer,
        };

        index.fields = config
            .text_fields
            .iter()
            .map(|field| {
                let docs: Vec<Vec<String>> = recipes
                    .iter()
                    .map(|recipe| index.tokenize(recipe.field(*field)))
                    .collect();
                FieldModel::fit(*field, &docs)
            })
            .collect();
        index.recipes = recipes;

        tracing::debug!(
            "Fitted index over {} recipes, vocabulary sizes: {:?}",
            index.recipes.len(),
            index
                .fields
                .iter()
                .map(|m| (m.field.as_str(), m.vocab.len()))
                .collect::<Vec<_>>()
        );
        index
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let mut analyzer = self.analyzer.clone();
        let mut stream = analyzer.token_stream(text);
        let mut tokens = Vec::new();
        stream.process(&mut |token: &Token| {
            if token.text.chars().count() >= MIN_TOKEN_CHARS {
                tokens.push(token.text.clone());
            }
        });
        tokens
    }

    /// Rank recipes for a free-text query.
    ///
    /// Only positive scores at or above `min_score` are returned; equal
    /// scores keep dataset order.
    pub fn search(&self, query: &str, config: &SearchConfig) -> Vec<SearchHit<'_>> {
        if config.limit == 0 || self.recipes.is_empty() {
            return Vec::new();
        }

        let query_tokens = self.tokenize(query);
        let mut scores = vec![0.0f32; self.recipes.len()];
        for model in &self.fields {
            let boost = config.boosts.get(model.field);
            if boost != 0.0 {
                model.accumulate(&query_tokens, boost, &mut scores);
            }
        }

        for (field, value) in &config.filters {
            if !self.keyword_fields.contains(field) {
                continue;
            }
            for (recipe, score) in self.recipes.iter().zip(scores.iter_mut()) {
                if recipe.field(*field) != value.as_str() {
                    *score = 0.0;
                }
            }
        }

        let min_score = config.min_score.unwrap_or(0.0);
        let mut ranked: Vec<(usize, f32)> = scores
            .into_iter()
            .enumerate()
            .filter(|(_, score)| *score > 0.0 && *score >= min_score)
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.truncate(config.limit);

        ranked
            .into_iter()
            .map(|(doc_id, score)| SearchHit {
                recipe: &self.recipes[doc_id],
                score,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn text_fields(&self) -> Vec<RecipeField> {
        self.fields.iter().map(|m| m.field).collect()
    }

    pub fn keyword_fields(&self) -> &[RecipeField] {
        &self.keyword_fields
    }
}
