//! Random search over field boost weights

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::recipe::RecipeField;
use crate::search::Boosts;

/// Inclusive range a boost weight is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
}

impl ParamRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.max > self.min {
            rng.gen_range(self.min..=self.max)
        } else {
            self.min
        }
    }
}

/// The fields tuned by default, each searched over 0.0..=3.0.
/// Long free-text fields keep their default weight.
pub fn default_param_ranges() -> Vec<(RecipeField, ParamRange)> {
    [
        RecipeField::DishName,
        RecipeField::Cuisine,
        RecipeField::Diet,
        RecipeField::Tags,
        RecipeField::MainIngredients,
        RecipeField::CookingTimeMinutes,
        RecipeField::Difficulty,
        RecipeField::IngredientsFull,
    ]
    .into_iter()
    .map(|field| (field, ParamRange::new(0.0, 3.0)))
    .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizeResult {
    pub boosts: Boosts,
    pub score: f64,
}

/// Draw `n_iterations` random boost vectors and keep the best-scoring one.
///
/// Returns `None` only when no trial ran.
pub fn simple_optimize<R, F>(
    param_ranges: &[(RecipeField, ParamRange)],
    mut objective: F,
    n_iterations: usize,
    rng: &mut R,
) -> Option<OptimizeResult>
where
    R: Rng + ?Sized,
    F: FnMut(&Boosts) -> f64,
{
    let mut best: Option<OptimizeResult> = None;

    for trial in 0..n_iterations {
        let boosts: Boosts = param_ranges
            .iter()
            .map(|(field, range)| (*field, range.sample(rng)))
            .collect();
        let score = objective(&boosts);
        tracing::debug!("Trial {}: score {:.4}", trial + 1, score);

        if best.as_ref().map_or(true, |b| score > b.score) {
            best = Some(OptimizeResult { boosts, score });
        }
    }

    best
}
