//! Recipe records and dataset loading
//!
//! Raw dataset entries mix strings, lists and numbers. Every field is
//! flattened to a single string before it reaches the index.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{EngineError, Result};

/// Where the recipe dataset is published
pub const DEFAULT_DATA_URL: &str =
    "https://raw.githubusercontent.com/eadka/fridgechef/main/Data/RecipeData.json";

/// The fields of a recipe record, in template order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipeField {
    DishName,
    Cuisine,
    Diet,
    Tags,
    MainIngredients,
    CookingTimeMinutes,
    Difficulty,
    IngredientsFull,
    Instructions,
    Substitutions,
    FlavorNotes,
}

impl RecipeField {
    pub const ALL: [RecipeField; 11] = [
        RecipeField::DishName,
        RecipeField::Cuisine,
        RecipeField::Diet,
        RecipeField::Tags,
        RecipeField::MainIngredients,
        RecipeField::CookingTimeMinutes,
        RecipeField::Difficulty,
        RecipeField::IngredientsFull,
        RecipeField::Instructions,
        RecipeField::Substitutions,
        RecipeField::FlavorNotes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecipeField::DishName => "dish_name",
            RecipeField::Cuisine => "cuisine",
            RecipeField::Diet => "diet",
            RecipeField::Tags => "tags",
            RecipeField::MainIngredients => "main_ingredients",
            RecipeField::CookingTimeMinutes => "cooking_time_minutes",
            RecipeField::Difficulty => "difficulty",
            RecipeField::IngredientsFull => "ingredients_full",
            RecipeField::Instructions => "instructions",
            RecipeField::Substitutions => "substitutions",
            RecipeField::FlavorNotes => "flavor_notes",
        }
    }
}

impl fmt::Display for RecipeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecipeField {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        RecipeField::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| EngineError::UnknownField(s.to_string()))
    }
}

/// A normalized recipe: every field is a plain string
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub dish_name: String,
    pub cuisine: String,
    pub diet: String,
    pub tags: String,
    pub main_ingredients: String,
    pub cooking_time_minutes: String,
    pub difficulty: String,
    pub ingredients_full: String,
    pub instructions: String,
    pub substitutions: String,
    pub flavor_notes: String,
}

impl Recipe {
    /// Build a recipe from one raw dataset object, flattening every field
    pub fn from_raw(raw: &serde_json::Map<String, Value>) -> Self {
        let mut recipe = Recipe::default();
        for field in RecipeField::ALL {
            let text = raw.get(field.as_str()).map(normalize_value).unwrap_or_default();
            *recipe.field_mut(field) = text;
        }
        recipe
    }

    pub fn field(&self, field: RecipeField) -> &str {
        match field {
            RecipeField::DishName => &self.dish_name,
            RecipeField::Cuisine => &self.cuisine,
            RecipeField::Diet => &self.diet,
            RecipeField::Tags => &self.tags,
            RecipeField::MainIngredients => &self.main_ingredients,
            RecipeField::CookingTimeMinutes => &self.cooking_time_minutes,
            RecipeField::Difficulty => &self.difficulty,
            RecipeField::IngredientsFull => &self.ingredients_full,
            RecipeField::Instructions => &self.instructions,
            RecipeField::Substitutions => &self.substitutions,
            RecipeField::FlavorNotes => &self.flavor_notes,
        }
    }

    fn field_mut(&mut self, field: RecipeField) -> &mut String {
        match field {
            RecipeField::DishName => &mut self.dish_name,
            RecipeField::Cuisine => &mut self.cuisine,
            RecipeField::Diet => &mut self.diet,
            RecipeField::Tags => &mut self.tags,
            RecipeField::MainIngredients => &mut self.main_ingredients,
            RecipeField::CookingTimeMinutes => &mut self.cooking_time_minutes,
            RecipeField::Difficulty => &mut self.difficulty,
            RecipeField::IngredientsFull => &mut self.ingredients_full,
            RecipeField::Instructions => &mut self.instructions,
            RecipeField::Substitutions => &mut self.substitutions,
            RecipeField::FlavorNotes => &mut self.flavor_notes,
        }
    }
}

/// Flatten a raw JSON value to the text the index sees.
///
/// Arrays are joined with single spaces in order, `null` is empty and
/// scalars use their JSON text.
pub fn normalize_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(normalize_value)
            .collect::<Vec<_>>()
            .join(" "),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Object(_) => value.to_string(),
    }
}

/// Parse a dataset document (a JSON array of recipe objects)
pub fn parse_recipes(json: &str) -> Result<Vec<Recipe>> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Array(entries) = value else {
        return Err(EngineError::Dataset(
            "expected a JSON array of recipes".to_string(),
        ));
    };

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| match entry {
            Value::Object(map) => Ok(Recipe::from_raw(map)),
            _ => Err(EngineError::Dataset(format!(
                "recipe #{} is not a JSON object",
                i
            ))),
        })
        .collect()
}

/// Load recipes from a local file or an `http(s)://` URL
pub async fn load_recipes(source: &str) -> Result<Vec<Recipe>> {
    let body = if source.starts_with("http://") || source.starts_with("https://") {
        tracing::info!("Downloading recipe dataset from {}", source);
        reqwest::get(source)
            .await?
            .error_for_status()?
            .text()
            .await?
    } else {
        tracing::info!("Reading recipe dataset from {}", source);
        tokio::fs::read_to_string(Path::new(source)).await?
    };

    let recipes = parse_recipes(&body)?;
    tracing::info!("Loaded {} recipes", recipes.len());
    Ok(recipes)
}
