//! Weekly plan filling and plan calorie totals.
//!
//! Filling a slot is deterministic: candidates are narrowed in stages and the
//! pick rotates through them by `(day_index * 4 + slot_index) mod n`, so the
//! same inputs always produce the same plan and neighbouring slots differ
//! when there is more than one candidate.

use crate::energy::daily_targets;
use crate::filter::suitable_recipes;
use crate::nutrition::recipe_totals;
use crate::scaling::meal_share;
use crate::{DayOfWeek, Food, MealSlot, Plan, Recipe, Result, UserProfile};
use serde::Serialize;

/// Default calorie band around a meal target (±30%)
pub const DEFAULT_TOLERANCE: f64 = 0.3;

/// A recipe with no meal categories may be planned in any slot
fn fits_slot(recipe: &Recipe, slot: MealSlot) -> bool {
    recipe.meal_categories.is_empty()
        || recipe
            .meal_categories
            .iter()
            .any(|c| MealSlot::from_name(c) == Some(slot))
}

fn rotation_index(day: DayOfWeek, slot: MealSlot, len: usize) -> usize {
    (day.index() * MealSlot::ALL.len() + slot.index()) % len
}

/// Pick a recipe for one slot given the daily calorie target.
///
/// Candidates are the suitable recipes allowed in the slot whose calories fall
/// inside `target * (1 ± tolerance)`. Without any, the band is dropped, then
/// the slot restriction. Returns None only when no recipe is suitable at all.
pub fn pick_recipe<'a>(
    profile: &UserProfile,
    recipes: &'a [Recipe],
    foods: &[Food],
    day: DayOfWeek,
    slot: MealSlot,
    daily_kcal: f64,
    tolerance: f64,
) -> Option<&'a Recipe> {
    let suitable = suitable_recipes(profile, recipes);
    if suitable.is_empty() {
        tracing::debug!("No suitable recipes for {} on {} {}", profile.id, day, slot);
        return None;
    }

    let target = daily_kcal * meal_share(slot);
    let (low, high) = (target * (1.0 - tolerance), target * (1.0 + tolerance));

    let in_slot: Vec<&Recipe> = suitable
        .iter()
        .copied()
        .filter(|r| fits_slot(r, slot))
        .collect();
    let in_band: Vec<&Recipe> = in_slot
        .iter()
        .copied()
        .filter(|r| {
            let kcal = recipe_totals(r, foods).calories;
            kcal >= low && kcal <= high
        })
        .collect();

    let candidates = if !in_band.is_empty() {
        in_band
    } else if !in_slot.is_empty() {
        in_slot
    } else {
        suitable
    };

    let picked = candidates[rotation_index(day, slot, candidates.len())];
    tracing::debug!(
        "Picked {} for {} {} (target {:.0} kcal, {} candidates)",
        picked.id,
        day,
        slot,
        target,
        candidates.len()
    );
    Some(picked)
}

/// Pick a recipe for one slot using the profile's daily target
pub fn fill_meal<'a>(
    profile: &UserProfile,
    recipes: &'a [Recipe],
    foods: &[Food],
    day: DayOfWeek,
    slot: MealSlot,
    tolerance: f64,
) -> Result<Option<&'a Recipe>> {
    let daily_kcal = daily_targets(profile)?.target_kcal;
    Ok(pick_recipe(
        profile, recipes, foods, day, slot, daily_kcal, tolerance,
    ))
}

/// Fill every slot of one day. Slots with no suitable recipe are left as they were.
pub fn fill_day(
    plan: &mut Plan,
    profile: &UserProfile,
    recipes: &[Recipe],
    foods: &[Food],
    day: DayOfWeek,
    tolerance: f64,
) -> Result<()> {
    let daily_kcal = daily_targets(profile)?.target_kcal;
    fill_day_with_target(plan, profile, recipes, foods, day, daily_kcal, tolerance);
    Ok(())
}

fn fill_day_with_target(
    plan: &mut Plan,
    profile: &UserProfile,
    recipes: &[Recipe],
    foods: &[Food],
    day: DayOfWeek,
    daily_kcal: f64,
    tolerance: f64,
) {
    for slot in MealSlot::ALL {
        if let Some(recipe) = pick_recipe(profile, recipes, foods, day, slot, daily_kcal, tolerance) {
            plan.set_meal(day, slot, vec![recipe.id.clone()]);
        }
    }
}

/// Fill all seven days of a plan
pub fn fill_week(
    plan: &mut Plan,
    profile: &UserProfile,
    recipes: &[Recipe],
    foods: &[Food],
    tolerance: f64,
) -> Result<()> {
    let daily_kcal = daily_targets(profile)?.target_kcal;
    for day in DayOfWeek::ALL {
        fill_day_with_target(plan, profile, recipes, foods, day, daily_kcal, tolerance);
    }
    tracing::info!("Filled weekly plan {} for {}", plan.id, profile.id);
    Ok(())
}

/// Calories of the recipes planned in one slot. Unknown ids count as zero.
pub fn meal_calories(
    plan: &Plan,
    day: DayOfWeek,
    slot: MealSlot,
    recipes: &[Recipe],
    foods: &[Food],
) -> f64 {
    plan.recipe_ids(day, slot)
        .iter()
        .filter_map(|id| recipes.iter().find(|r| &r.id == id))
        .map(|r| recipe_totals(r, foods).calories)
        .fold(0.0, |acc, kcal| acc + kcal)
}

/// Calories of every slot of one day
pub fn day_calories(plan: &Plan, day: DayOfWeek, recipes: &[Recipe], foods: &[Food]) -> f64 {
    MealSlot::ALL
        .iter()
        .map(|slot| meal_calories(plan, day, *slot, recipes, foods))
        .fold(0.0, |acc, kcal| acc + kcal)
}

/// A day's planned calories against the daily target
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DayStatus {
    pub day: DayOfWeek,
    pub calories: f64,
    pub target_kcal: f64,
    pub over_target: bool,
}

pub fn day_status(
    plan: &Plan,
    day: DayOfWeek,
    recipes: &[Recipe],
    foods: &[Food],
    target_kcal: f64,
) -> DayStatus {
    let calories = day_calories(plan, day, recipes, foods);
    DayStatus {
        day,
        calories,
        target_kcal,
        over_target: calories > target_kcal,
    }
}

/// Status of all seven days
pub fn week_status(
    plan: &Plan,
    recipes: &[Recipe],
    foods: &[Food],
    target_kcal: f64,
) -> Vec<DayStatus> {
    DayOfWeek::ALL
        .iter()
        .map(|day| day_status(plan, *day, recipes, foods, target_kcal))
        .collect()
}
