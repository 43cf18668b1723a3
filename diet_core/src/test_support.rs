//! Fixture builders shared by the unit tests.

use crate::{ActivityLevel, Food, FoodUnit, IngredientRef, Recipe, Sex, UserProfile};
use std::collections::BTreeSet;

/// Sedentary profile holding its current weight over 12 weeks
pub(crate) fn profile(sex: Sex, weight: f64, height: f64, age: f64) -> UserProfile {
    UserProfile {
        id: "u1".into(),
        name: "Test".into(),
        sex,
        age,
        height,
        weight,
        target_weight: weight,
        goal_weeks: 12,
        activity_level: ActivityLevel::Sedentary,
        health_conditions: BTreeSet::new(),
        intolerances: BTreeSet::new(),
        sensitivity: None,
        weight_history: Vec::new(),
        liked_foods: Vec::new(),
        disliked_foods: Vec::new(),
        manual_target_kcal: None,
        manual_protein: None,
        manual_carbs: None,
        manual_fats: None,
        extra: serde_json::Map::new(),
    }
}

pub(crate) fn food(id: &str, calories: f64, protein: f64, carbs: f64, fats: f64) -> Food {
    Food {
        id: id.into(),
        name: id.into(),
        calories,
        protein,
        carbs,
        fats,
        unit: FoodUnit::Per100g,
        category: None,
        tags: BTreeSet::new(),
        extra: serde_json::Map::new(),
    }
}

pub(crate) fn food_with_tags(name: &str, tags: &[&str]) -> Food {
    Food {
        tags: tags.iter().map(|t| t.to_string()).collect(),
        ..food(name, 100.0, 0.0, 0.0, 0.0)
    }
}

pub(crate) fn recipe(id: &str, ingredients: &[(&str, f64)]) -> Recipe {
    Recipe {
        id: id.into(),
        name: id.into(),
        ingredients: ingredients
            .iter()
            .map(|(food_id, amount)| IngredientRef {
                food_id: food_id.to_string(),
                amount: *amount,
                note: None,
            })
            .collect(),
        servings: 1,
        totals: None,
        tags: BTreeSet::new(),
        meal_categories: BTreeSet::new(),
        extra: serde_json::Map::new(),
    }
}

pub(crate) fn recipe_with_tags(id: &str, tags: &[&str]) -> Recipe {
    Recipe {
        tags: tags.iter().map(|t| t.to_string()).collect(),
        ..recipe(id, &[])
    }
}
