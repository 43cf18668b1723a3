//! Proportional recipe scaling to a calorie target.

use crate::energy::daily_targets;
use crate::nutrition::aggregate;
use crate::{Food, IngredientRef, MealSlot, Recipe, Result, Totals, UserProfile};
use serde::Serialize;

/// Share used for meal names outside the known slots
pub const DEFAULT_MEAL_SHARE: f64 = 0.25;

/// Fraction of the daily target assigned to a meal slot
pub fn meal_share(slot: MealSlot) -> f64 {
    match slot {
        MealSlot::Breakfast => 0.20,
        MealSlot::Lunch => 0.35,
        MealSlot::Dinner => 0.30,
        MealSlot::Snacks => 0.15,
    }
}

/// Fraction of the daily target for a meal name, falling back to
/// [`DEFAULT_MEAL_SHARE`] for unknown names
pub fn meal_share_for(meal_name: &str) -> f64 {
    match MealSlot::from_name(meal_name) {
        Some(slot) => meal_share(slot),
        None => {
            tracing::debug!("Unknown meal {:?}, using share {}", meal_name, DEFAULT_MEAL_SHARE);
            DEFAULT_MEAL_SHARE
        }
    }
}

/// Calorie target for one meal of the day. Uses the same daily target as
/// planning, so a manual target applies here too.
pub fn meal_target(profile: &UserProfile, meal_name: &str) -> Result<f64> {
    Ok(daily_targets(profile)?.target_kcal * meal_share_for(meal_name))
}

/// A recipe's ingredients and totals after scaling
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScaledRecipe {
    pub ingredients: Vec<IngredientRef>,
    pub totals: Totals,
    pub scale_factor: f64,
}

/// Rescale a recipe so its calories approach `target_kcal`.
///
/// Amounts are rounded to whole grams and totals are recomputed from the
/// rounded amounts, so the two always agree. A recipe with no calories, or a
/// missing or non-positive target, comes back unscaled.
pub fn scale_to_target(recipe: &Recipe, foods: &[Food], target_kcal: Option<f64>) -> ScaledRecipe {
    let base_totals = aggregate(&recipe.ingredients, foods);

    let target = match target_kcal {
        Some(t) if t.is_finite() && t > 0.0 => t,
        _ => return unscaled(recipe, base_totals),
    };

    if base_totals.calories <= 0.0 {
        tracing::debug!("Recipe {} has no calories, not scaling", recipe.id);
        return unscaled(recipe, base_totals);
    }

    let scale_factor = target / base_totals.calories;
    let ingredients: Vec<IngredientRef> = recipe
        .ingredients
        .iter()
        .map(|ing| IngredientRef {
            amount: (ing.amount * scale_factor).round(),
            ..ing.clone()
        })
        .collect();
    let totals = aggregate(&ingredients, foods);

    tracing::debug!(
        "Scaled recipe {} by {:.3}: {:.0} -> {:.0} kcal",
        recipe.id,
        scale_factor,
        base_totals.calories,
        totals.calories
    );

    ScaledRecipe {
        ingredients,
        totals,
        scale_factor,
    }
}

fn unscaled(recipe: &Recipe, totals: Totals) -> ScaledRecipe {
    ScaledRecipe {
        ingredients: recipe.ingredients.clone(),
        totals,
        scale_factor: 1.0,
    }
}

/// Scale a recipe to a profile's target for the given meal
pub fn scale_for_meal(
    recipe: &Recipe,
    foods: &[Food],
    profile: &UserProfile,
    meal_name: &str,
) -> Result<ScaledRecipe> {
    let target = meal_target(profile, meal_name)?;
    Ok(scale_to_target(recipe, foods, Some(target)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{food, profile, recipe};
    use crate::{ActivityLevel, Error, Sex};

    fn catalog() -> Vec<Food> {
        vec![
            food("pasta", 350.0, 12.0, 72.0, 1.5),
            food("oil", 900.0, 0.0, 0.0, 100.0),
            food("tomato", 18.0, 0.9, 3.9, 0.2),
        ]
    }

    #[test]
    fn test_same_target_keeps_amounts() {
        let foods = catalog();
        let r = recipe("r1", &[("pasta", 80.0), ("oil", 10.0), ("tomato", 150.0)]);
        let base = aggregate(&r.ingredients, &foods);

        let scaled = scale_to_target(&r, &foods, Some(base.calories));
        assert!((scaled.scale_factor - 1.0).abs() < 1e-12);
        assert_eq!(scaled.ingredients, r.ingredients);
        assert!((scaled.totals.calories - base.calories).abs() < 1e-9);
    }

    #[test]
    fn test_doubling_target() {
        let foods = catalog();
        let r = recipe("r1", &[("pasta", 100.0), ("oil", 10.0)]);
        // 350 + 90 = 440 kcal
        let scaled = scale_to_target(&r, &foods, Some(880.0));

        assert_eq!(scaled.scale_factor, 2.0);
        assert_eq!(scaled.ingredients[0].amount, 200.0);
        assert_eq!(scaled.ingredients[1].amount, 20.0);
        assert_eq!(scaled.totals.calories, 880.0);
    }

    #[test]
    fn test_totals_follow_rounded_amounts() {
        let foods = catalog();
        let r = recipe("r1", &[("pasta", 70.0), ("tomato", 133.0)]);
        let scaled = scale_to_target(&r, &foods, Some(500.0));

        let recomputed = aggregate(&scaled.ingredients, &foods);
        assert_eq!(scaled.totals, recomputed);
        assert!(scaled.ingredients.iter().all(|i| i.amount.fract() == 0.0));
    }

    #[test]
    fn test_degenerate_recipe_is_unscaled() {
        let foods = catalog();
        let r = recipe("r1", &[("unknown", 100.0)]);
        let scaled = scale_to_target(&r, &foods, Some(600.0));

        assert_eq!(scaled.scale_factor, 1.0);
        assert_eq!(scaled.ingredients, r.ingredients);
        assert_eq!(scaled.totals.calories, 0.0);
    }

    #[test]
    fn test_missing_target_is_unscaled() {
        let foods = catalog();
        let r = recipe("r1", &[("pasta", 100.0)]);
        assert_eq!(scale_to_target(&r, &foods, None).scale_factor, 1.0);
        assert_eq!(scale_to_target(&r, &foods, Some(0.0)).scale_factor, 1.0);
    }

    #[test]
    fn test_meal_shares() {
        assert_eq!(meal_share_for("Colazione"), 0.20);
        assert_eq!(meal_share_for("Pranzo"), 0.35);
        assert_eq!(meal_share_for("Cena"), 0.30);
        assert_eq!(meal_share_for("Merenda/Spuntini"), 0.15);
        assert_eq!(meal_share_for("Brunch"), DEFAULT_MEAL_SHARE);

        let total: f64 = MealSlot::ALL.iter().map(|s| meal_share(*s)).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_meal_target_and_scale_for_meal() {
        let mut p = profile(Sex::Male, 80.0, 180.0, 30.0);
        p.activity_level = ActivityLevel::Sedentary;
        // tdee = 2136, no weight change
        assert_eq!(meal_target(&p, "lunch").unwrap(), 2136.0 * 0.35);

        let foods = catalog();
        let r = recipe("r1", &[("pasta", 100.0)]);
        let scaled = scale_for_meal(&r, &foods, &p, "Cena").unwrap();
        // 640.8 kcal / 350 per 100 g
        assert_eq!(scaled.ingredients[0].amount, 183.0);

        p.goal_weeks = 0;
        assert!(matches!(
            scale_for_meal(&r, &foods, &p, "Cena"),
            Err(Error::InvalidGoalConfiguration { .. })
        ));
    }

    #[test]
    fn test_meal_target_honours_manual_target() {
        let mut p = profile(Sex::Male, 80.0, 180.0, 30.0);
        p.goal_weeks = 0;
        p.manual_target_kcal = Some(2000.0);

        assert_eq!(meal_target(&p, "breakfast").unwrap(), 2000.0 * 0.20);

        let foods = catalog();
        let r = recipe("r1", &[("pasta", 100.0)]);
        // 400 kcal / 350 per 100 g
        let scaled = scale_for_meal(&r, &foods, &p, "Colazione").unwrap();
        assert_eq!(scaled.ingredients[0].amount, 114.0);
    }
}
