//! Search configuration and result helpers
//!
//! Boost weights, exact-match filters and result limits for a query.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::recipe::{Recipe, RecipeField};

/// Number of results for interactive questions
pub const INTERACTIVE_LIMIT: usize = 5;

/// Number of results when scoring retrieval quality
pub const EVALUATION_LIMIT: usize = 10;

/// Per-field boost weights. Fields without an entry weigh 1.0.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Boosts(BTreeMap<RecipeField, f32>);

impl Boosts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Boost profile found by a random search over the validation questions
    pub fn tuned() -> Self {
        Self::from_iter([
            (RecipeField::DishName, 2.49),
            (RecipeField::Cuisine, 2.16),
            (RecipeField::Diet, 2.745),
            (RecipeField::Tags, 0.23),
            (RecipeField::MainIngredients, 1.631),
            (RecipeField::CookingTimeMinutes, 0.39),
            (RecipeField::Difficulty, 2.64),
            (RecipeField::IngredientsFull, 1.73),
        ])
    }

    pub fn get(&self, field: RecipeField) -> f32 {
        self.0.get(&field).copied().unwrap_or(1.0)
    }

    pub fn set(&mut self, field: RecipeField, weight: f32) {
        self.0.insert(field, weight);
    }

    pub fn iter(&self) -> impl Iterator<Item = (RecipeField, f32)> + '_ {
        self.0.iter().map(|(field, weight)| (*field, *weight))
    }
}

impl FromIterator<(RecipeField, f32)> for Boosts {
    fn from_iter<I: IntoIterator<Item = (RecipeField, f32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Search configuration options
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Maximum number of results to return
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Field boosts; unset fields weigh 1.0
    #[serde(default)]
    pub boosts: Boosts,

    /// Exact-match filters, applied to keyword fields only
    #[serde(default)]
    pub filters: BTreeMap<RecipeField, String>,

    /// Hits scoring below this are dropped
    #[serde(default)]
    pub min_score: Option<f32>,
}

fn default_limit() -> usize {
    INTERACTIVE_LIMIT
}

impl SearchConfig {
    pub fn interactive() -> Self {
        Self {
            limit: INTERACTIVE_LIMIT,
            boosts: Boosts::new(),
            filters: BTreeMap::new(),
            min_score: None,
        }
    }

    pub fn evaluation() -> Self {
        Self {
            limit: EVALUATION_LIMIT,
            ..Self::interactive()
        }
    }

    pub fn with_boosts(mut self, boosts: Boosts) -> Self {
        self.boosts = boosts;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::interactive()
    }
}

/// A ranked recipe
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit<'a> {
    pub recipe: &'a Recipe,
    pub score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boosts_default_to_one() {
        let boosts = Boosts::tuned();
        assert_eq!(boosts.get(RecipeField::Diet), 2.745);
        assert_eq!(boosts.get(RecipeField::Instructions), 1.0);
        assert_eq!(Boosts::new().get(RecipeField::DishName), 1.0);
    }

    #[test]
    fn test_config_from_json() {
        let config: SearchConfig = serde_json::from_str(
            r#"{"boosts": {"dish_name": 3.0}, "filters": {"diet": "vegan"}}"#,
        )
        .unwrap();

        assert_eq!(config.limit, INTERACTIVE_LIMIT);
        assert_eq!(config.min_score, None);
        assert_eq!(config.boosts.get(RecipeField::DishName), 3.0);
        assert_eq!(config.filters.get(&RecipeField::Diet).map(String::as_str), Some("vegan"));
        assert_eq!(SearchConfig::evaluation().limit, EVALUATION_LIMIT);
    }
}
