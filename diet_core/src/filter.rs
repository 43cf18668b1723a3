//! Dietary filtering of foods and recipes for a user profile.
//!
//! Classification of a food runs in three stages, each able to stop the rest:
//! 1. Intolerances: intolerant to X and the food is not tagged "X-free"
//! 2. Condition exclusions: acidic foods for reflux, pro-inflammatory foods
//!    for arthritis or multiple sclerosis
//! 3. Condition scoring: friendly tags add to a score; a score of at least
//!    [`RECOMMEND_THRESHOLD`] recommends the food

use crate::conditions::{ARTHRITIS, IBS, MULTIPLE_SCLEROSIS, REFLUX};
use crate::{Food, Recipe, UserProfile};
use serde::Serialize;
use std::fmt;

pub const RECOMMEND_THRESHOLD: u32 = 2;

const LOW_ACID_SCORE: u32 = 2;
const IBS_FRIENDLY_SCORE: u32 = 2;
const ANTI_INFLAMMATORY_SCORE: u32 = 3;
const OMEGA_3_SCORE: u32 = 3;

/// Outcome of classifying one food
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Recommended,
    Avoided,
    Neutral,
}

/// Why a food was recommended or avoided
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum Reason {
    /// Carries the canonical intolerance that matched
    ContainsAllergen(String),
    AcidicForReflux,
    ProInflammatory,
    ConditionFriendly,
    Liked,
    Disliked,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::ContainsAllergen(_) => f.write_str("contains allergen"),
            Reason::AcidicForReflux => f.write_str("acidic, unsuitable for reflux"),
            Reason::ProInflammatory => f.write_str("pro-inflammatory"),
            Reason::ConditionFriendly => f.write_str("suited to health conditions"),
            Reason::Liked => f.write_str("liked"),
            Reason::Disliked => f.write_str("disliked"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub verdict: Verdict,
    pub reason: Option<Reason>,
    pub score: u32,
}

impl Classification {
    fn avoided(reason: Reason) -> Self {
        Self {
            verdict: Verdict::Avoided,
            reason: Some(reason),
            score: 0,
        }
    }
}

/// First intolerance the food is not marked free of
fn matching_allergen(food_tags: impl Fn(&str) -> bool, profile: &UserProfile) -> Option<String> {
    profile
        .canonical_intolerances()
        .into_iter()
        .find(|intolerance| !food_tags(&format!("{}-free", intolerance)))
}

/// Classify a food for a profile
pub fn classify(food: &Food, profile: &UserProfile) -> Classification {
    if let Some(allergen) = matching_allergen(|tag| food.has_tag(tag), profile) {
        return Classification::avoided(Reason::ContainsAllergen(allergen));
    }

    let reflux = profile.has_condition(REFLUX);
    let inflammatory =
        profile.has_condition(ARTHRITIS) || profile.has_condition(MULTIPLE_SCLEROSIS);

    if reflux && food.has_tag("acidic") {
        return Classification::avoided(Reason::AcidicForReflux);
    }
    if inflammatory && food.has_tag("pro-inflammatory") {
        return Classification::avoided(Reason::ProInflammatory);
    }

    let mut score = 0;
    if reflux && food.has_tag("low-acid") {
        score += LOW_ACID_SCORE;
    }
    if profile.has_condition(IBS) && food.has_tag("ibs-friendly") {
        score += IBS_FRIENDLY_SCORE;
    }
    if inflammatory {
        if food.has_tag("anti-inflammatory") {
            score += ANTI_INFLAMMATORY_SCORE;
        }
        if food.has_tag("omega-3") {
            score += OMEGA_3_SCORE;
        }
    }

    if score >= RECOMMEND_THRESHOLD {
        Classification {
            verdict: Verdict::Recommended,
            reason: Some(Reason::ConditionFriendly),
            score,
        }
    } else {
        Classification {
            verdict: Verdict::Neutral,
            reason: None,
            score,
        }
    }
}

/// One line of a recommendation list. Preference entries have no food id.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecommendationEntry {
    pub food_id: Option<String>,
    pub name: String,
    pub reason: Reason,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Recommendations {
    pub recommended: Vec<RecommendationEntry>,
    pub avoided: Vec<RecommendationEntry>,
}

/// Split a catalog into recommended and avoided foods for a profile.
///
/// The user's own liked/disliked foods come first; catalog entries follow in
/// catalog order. Neutral foods appear in neither list.
pub fn recommendations(profile: &UserProfile, foods: &[Food]) -> Recommendations {
    let preference = |name: &String, reason: Reason| RecommendationEntry {
        food_id: None,
        name: name.trim().to_lowercase(),
        reason,
    };

    let mut result = Recommendations {
        recommended: profile
            .liked_foods
            .iter()
            .map(|name| preference(name, Reason::Liked))
            .collect(),
        avoided: profile
            .disliked_foods
            .iter()
            .map(|name| preference(name, Reason::Disliked))
            .collect(),
    };

    for food in foods {
        let classification = classify(food, profile);
        let Some(reason) = classification.reason else {
            continue;
        };
        let entry = RecommendationEntry {
            food_id: Some(food.id.clone()),
            name: food.name.clone(),
            reason,
        };
        match classification.verdict {
            Verdict::Recommended => result.recommended.push(entry),
            Verdict::Avoided => result.avoided.push(entry),
            Verdict::Neutral => {}
        }
    }

    tracing::debug!(
        "Recommendations for {}: {} recommended, {} avoided",
        profile.id,
        result.recommended.len(),
        result.avoided.len()
    );

    result
}

/// Whether a recipe may be planned for a profile.
///
/// Stricter than food classification: reflux requires a "low-acid" recipe and
/// IBS requires "low-fodmap" or "gluten-free".
pub fn is_recipe_suitable(recipe: &Recipe, profile: &UserProfile) -> bool {
    if matching_allergen(|tag| recipe.has_tag(tag), profile).is_some() {
        return false;
    }
    if profile.has_condition(REFLUX) && !recipe.has_tag("low-acid") {
        return false;
    }
    if profile.has_condition(IBS) && !recipe.has_tag("low-fodmap") && !recipe.has_tag("gluten-free")
    {
        return false;
    }
    true
}

/// Recipes suitable for a profile, in catalog order
pub fn suitable_recipes<'a>(profile: &UserProfile, recipes: &'a [Recipe]) -> Vec<&'a Recipe> {
    recipes
        .iter()
        .filter(|r| is_recipe_suitable(r, profile))
        .collect()
}
