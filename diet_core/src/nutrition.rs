//! Ingredient-to-nutrition aggregation.
//!
//! Food values are defined per 100 units, so each ingredient contributes
//! `value * amount / 100`. References that do not resolve in the catalog,
//! and catalog entries with negative values, contribute nothing.

use crate::{Food, IngredientRef, Recipe, Totals};

/// Sum the nutrition of a list of ingredients against a food catalog snapshot
pub fn aggregate(ingredients: &[IngredientRef], foods: &[Food]) -> Totals {
    let mut totals = Totals::default();

    for ingredient in ingredients {
        let Some(food) = foods.iter().find(|f| f.id == ingredient.food_id) else {
            tracing::debug!("Ingredient {} not in catalog, skipping", ingredient.food_id);
            continue;
        };
        if !food.is_valid() {
            tracing::warn!("Food {} has negative nutrition values, skipping", food.id);
            continue;
        }

        let factor = ingredient.amount / 100.0;
        totals += Totals {
            calories: food.calories * factor,
            protein: food.protein * factor,
            carbs: food.carbs * factor,
            fats: food.fats * factor,
        };
    }

    totals
}

/// Fresh totals for a recipe, ignoring its cached `totals` field
pub fn recipe_totals(recipe: &Recipe, foods: &[Food]) -> Totals {
    aggregate(&recipe.ingredients, foods)
}
