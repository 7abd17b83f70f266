//! Property tests for recipe ranking.

use fridgechef_engine::recipe::parse_recipes;
use fridgechef_engine::{Boosts, IndexConfig, Recipe, RecipeField, RecipeIndex, SearchConfig};
use proptest::prelude::*;

const WORDS: &[&str] = &[
    "carrot", "beans", "tofu", "rice", "spinach", "lentils", "curry", "soup", "noodles", "garlic",
    "ginger", "tomato", "thai", "indian", "quick", "vegan",
];

fn arb_text() -> impl Strategy<Value = String> {
    proptest::collection::vec(proptest::sample::select(WORDS), 0..6).prop_map(|w| w.join(" "))
}

fn arb_recipe() -> impl Strategy<Value = Recipe> {
    ("[A-Z][a-z]{3,8}", arb_text(), arb_text(), arb_text()).prop_map(
        |(name, cuisine, main_ingredients, tags)| Recipe {
            dish_name: name,
            cuisine,
            main_ingredients,
            tags,
            ..Recipe::default()
        },
    )
}

fn arb_boosts() -> impl Strategy<Value = Boosts> {
    proptest::collection::vec(0.0f32..3.0, RecipeField::ALL.len()).prop_map(|weights| {
        RecipeField::ALL.iter().copied().zip(weights).collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Results are positive, sorted by descending score and bounded by the limit.
    #[test]
    fn results_ordered_and_bounded(
        recipes in proptest::collection::vec(arb_recipe(), 0..20),
        query in arb_text(),
        boosts in arb_boosts(),
        limit in 0usize..12,
    ) {
        let index = RecipeIndex::fit(recipes, IndexConfig::default());
        let config = SearchConfig::interactive().with_limit(limit).with_boosts(boosts);
        let results = index.search(&query, &config);

        prop_assert!(results.len() <= limit);
        prop_assert!(results.len() <= index.len());
        for hit in &results {
            prop_assert!(hit.score > 0.0);
        }
        for pair in results.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
    }

    /// The same index and inputs always give the same ranking.
    #[test]
    fn ranking_is_deterministic(
        recipes in proptest::collection::vec(arb_recipe(), 1..15),
        query in arb_text(),
    ) {
        let index = RecipeIndex::fit(recipes, IndexConfig::default());
        let config = SearchConfig::evaluation();

        let first: Vec<(String, f32)> = index
            .search(&query, &config)
            .iter()
            .map(|hit| (hit.recipe.dish_name.clone(), hit.score))
            .collect();
        let second: Vec<(String, f32)> = index
            .search(&query, &config)
            .iter()
            .map(|hit| (hit.recipe.dish_name.clone(), hit.score))
            .collect();

        prop_assert_eq!(first, second);
    }

    /// Scaling every boost by the same factor scales scores but keeps the order.
    #[test]
    fn uniform_boost_keeps_order(
        recipes in proptest::collection::vec(arb_recipe(), 1..15),
        query in arb_text(),
    ) {
        let index = RecipeIndex::fit(recipes, IndexConfig::default());
        let doubled: Boosts = RecipeField::ALL.iter().map(|f| (*f, 2.0)).collect();

        let plain: Vec<&str> = index
            .search(&query, &SearchConfig::evaluation())
            .iter()
            .map(|hit| hit.recipe.dish_name.as_str())
            .collect();
        let scaled: Vec<&str> = index
            .search(&query, &SearchConfig::evaluation().with_boosts(doubled))
            .iter()
            .map(|hit| hit.recipe.dish_name.as_str())
            .collect();

        prop_assert_eq!(plain, scaled);
    }
}

#[test]
fn dataset_lists_are_searchable() {
    let recipes = parse_recipes(
        r#"[
            {"dish_name": "Carrot Bean Stew", "main_ingredients": ["carrots", "beans"], "cooking_time_minutes": 40},
            {"dish_name": "Tofu Scramble", "main_ingredients": ["tofu", "turmeric"], "cooking_time_minutes": 15}
        ]"#,
    )
    .unwrap();
    let index = RecipeIndex::fit(recipes, IndexConfig::default());

    let results = index.search("Give me recipes for carrots and beans", &SearchConfig::interactive());
    assert_eq!(results[0].recipe.dish_name, "Carrot Bean Stew");

    let results = index.search("15", &SearchConfig::interactive());
    assert_eq!(results[0].recipe.dish_name, "Tofu Scramble");
}
