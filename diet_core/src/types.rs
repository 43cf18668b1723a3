//! Core domain types for the diet planning system.
//!
//! This module defines the entities the engine reads:
//! - Foods and their per-100 nutrition values
//! - User profiles with biometrics, goals and dietary attributes
//! - Recipes built from ingredient references
//! - Weekly plans mapping days and meal slots to recipe ids
//!
//! Loosely-typed fields from stored data are reconciled at the serde boundary:
//! absent and `null` collections both deserialize to empty, and legacy field
//! names (`gender`, `weeksToGoal`, `fat`) are accepted as aliases. Fields the
//! types do not model are kept in `extra` so a load-modify-save cycle does not
//! drop them.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Treat an explicit `null` the same as an absent field
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Case-insensitive tag lookup shared by foods and recipes
fn contains_tag(tags: &BTreeSet<String>, tag: &str) -> bool {
    tags.iter().any(|t| t.trim().eq_ignore_ascii_case(tag))
}

// ============================================================================
// Nutrition
// ============================================================================

/// Basis for a food's nutrition values
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum FoodUnit {
    #[default]
    #[serde(rename = "100g")]
    Per100g,
    #[serde(rename = "100ml")]
    Per100ml,
}

/// A catalog food. Macro fields are per 100 units of `unit`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Food {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default, alias = "fat")]
    pub fats: f64,
    #[serde(default)]
    pub unit: FoodUnit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: BTreeSet<String>,
    /// Stored fields this crate does not model, written back unchanged
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Food {
    pub fn has_tag(&self, tag: &str) -> bool {
        contains_tag(&self.tags, tag)
    }

    /// Macro fields must be non-negative
    pub fn is_valid(&self) -> bool {
        self.calories >= 0.0 && self.protein >= 0.0 && self.carbs >= 0.0 && self.fats >= 0.0
    }
}

/// Calorie and macro totals. Values are exact sums; rounding is left to display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default, alias = "fat")]
    pub fats: f64,
}

impl Totals {
    /// Totals rounded to whole units for display
    pub fn rounded(&self) -> Totals {
        Totals {
            calories: self.calories.round(),
            protein: self.protein.round(),
            carbs: self.carbs.round(),
            fats: self.fats.round(),
        }
    }
}

impl std::ops::AddAssign for Totals {
    fn add_assign(&mut self, rhs: Totals) {
        self.calories += rhs.calories;
        self.protein += rhs.protein;
        self.carbs += rhs.carbs;
        self.fats += rhs.fats;
    }
}

// ============================================================================
// User Profile
// ============================================================================

/// Biological sex as used by the BMR formula. Anything but "male" takes the
/// non-male branch.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(from = "String", into = "String")]
pub enum Sex {
    Male,
    Female,
    #[default]
    Other,
}

impl From<String> for Sex {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "male" | "m" | "maschio" => Sex::Male,
            "female" | "f" | "femmina" => Sex::Female,
            _ => Sex::Other,
        }
    }
}

impl From<Sex> for String {
    fn from(value: Sex) -> Self {
        match value {
            Sex::Male => "male".into(),
            Sex::Female => "female".into(),
            Sex::Other => "other".into(),
        }
    }
}

/// Self-reported activity level. Unrecognised values are kept verbatim.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(from = "String", into = "String")]
pub enum ActivityLevel {
    #[default]
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
    Unknown(String),
}

impl From<String> for ActivityLevel {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "sedentary" => ActivityLevel::Sedentary,
            "light" => ActivityLevel::Light,
            "medium" | "moderate" => ActivityLevel::Moderate,
            "active" => ActivityLevel::Active,
            "very_active" | "very active" => ActivityLevel::VeryActive,
            _ => ActivityLevel::Unknown(value),
        }
    }
}

impl From<ActivityLevel> for String {
    fn from(value: ActivityLevel) -> Self {
        match value {
            ActivityLevel::Sedentary => "sedentary".into(),
            ActivityLevel::Light => "light".into(),
            ActivityLevel::Moderate => "moderate".into(),
            ActivityLevel::Active => "active".into(),
            ActivityLevel::VeryActive => "very_active".into(),
            ActivityLevel::Unknown(raw) => raw,
        }
    }
}

/// Digestive sensitivity
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sensitivity {
    Low,
    Medium,
    High,
}

/// One entry of a user's weight log
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WeightSample {
    pub date: NaiveDate,
    pub actual: f64,
    pub estimated: f64,
}

#[derive(Deserialize)]
struct RawSample {
    date: String,
    actual: f64,
    estimated: f64,
}

/// Read a weight history, accepting `YYYY-MM-DD` or a full ISO timestamp and
/// skipping entries whose date cannot be parsed
fn lenient_history<'de, D>(deserializer: D) -> std::result::Result<Vec<WeightSample>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<RawSample> = null_as_default(deserializer)?;
    let samples = raw
        .into_iter()
        .filter_map(|r| {
            let day = r.date.get(..10).unwrap_or(&r.date);
            match NaiveDate::parse_from_str(day, "%Y-%m-%d") {
                Ok(date) => Some(WeightSample {
                    date,
                    actual: r.actual,
                    estimated: r.estimated,
                }),
                Err(e) => {
                    tracing::warn!("Skipping weight sample with bad date {:?}: {}", r.date, e);
                    None
                }
            }
        })
        .collect();
    Ok(samples)
}

/// A user profile with biometrics, goal and dietary attributes
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "gender")]
    pub sex: Sex,
    /// Years
    pub age: f64,
    /// Centimetres
    pub height: f64,
    /// Current weight in kilograms
    pub weight: f64,
    pub target_weight: f64,
    /// Must be positive before any target computation; absent reads as 0
    #[serde(default, alias = "weeksToGoal")]
    pub goal_weeks: i32,
    #[serde(default)]
    pub activity_level: ActivityLevel,
    #[serde(default, deserialize_with = "null_as_default")]
    pub health_conditions: BTreeSet<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub intolerances: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensitivity: Option<Sensitivity>,
    #[serde(default, deserialize_with = "lenient_history")]
    pub weight_history: Vec<WeightSample>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub liked_foods: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub disliked_foods: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_target_kcal: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_protein: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_carbs: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_fats: Option<f64>,
    /// Stored fields this crate does not model, written back unchanged
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl UserProfile {
    /// Kilograms to lose (positive) or gain (negative)
    pub fn kg_delta(&self) -> f64 {
        self.weight - self.target_weight
    }
}

// ============================================================================
// Recipes
// ============================================================================

/// A food amount inside a recipe. Amount is in grams.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IngredientRef {
    pub food_id: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

fn default_servings() -> u32 {
    1
}

/// A recipe. `totals` is a cached snapshot and may be stale; the engine always
/// recomputes from `ingredients`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ingredients: Vec<IngredientRef>,
    #[serde(default = "default_servings")]
    pub servings: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub totals: Option<Totals>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: BTreeSet<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub meal_categories: BTreeSet<String>,
    /// Stored fields this crate does not model, written back unchanged
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Recipe {
    pub fn has_tag(&self, tag: &str) -> bool {
        contains_tag(&self.tags, tag)
    }
}

// ============================================================================
// Plans
// ============================================================================

/// Meal slot within a day
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snacks,
}

impl MealSlot {
    pub const ALL: [MealSlot; 4] = [
        MealSlot::Breakfast,
        MealSlot::Lunch,
        MealSlot::Dinner,
        MealSlot::Snacks,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Resolve a meal name, accepting both plan keys and the Italian labels
    /// used by recipe meal categories.
    pub fn from_name(name: &str) -> Option<MealSlot> {
        match name.trim().to_lowercase().as_str() {
            "breakfast" | "colazione" => Some(MealSlot::Breakfast),
            "lunch" | "pranzo" => Some(MealSlot::Lunch),
            "dinner" | "cena" => Some(MealSlot::Dinner),
            "snacks" | "snack" | "merenda" | "spuntini" | "merenda/spuntini" => {
                Some(MealSlot::Snacks)
            }
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "Colazione",
            MealSlot::Lunch => "Pranzo",
            MealSlot::Dinner => "Cena",
            MealSlot::Snacks => "Merenda/Spuntini",
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Day key of a weekly plan
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

impl FromStr for DayOfWeek {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        let day = match s.trim().to_lowercase().as_str() {
            "monday" | "mon" | "lunedì" | "lunedi" => DayOfWeek::Monday,
            "tuesday" | "tue" | "martedì" | "martedi" => DayOfWeek::Tuesday,
            "wednesday" | "wed" | "mercoledì" | "mercoledi" => DayOfWeek::Wednesday,
            "thursday" | "thu" | "giovedì" | "giovedi" => DayOfWeek::Thursday,
            "friday" | "fri" | "venerdì" | "venerdi" => DayOfWeek::Friday,
            "saturday" | "sat" | "sabato" => DayOfWeek::Saturday,
            "sunday" | "sun" | "domenica" => DayOfWeek::Sunday,
            other => return Err(crate::Error::Other(format!("Unknown day: {}", other))),
        };
        Ok(day)
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DayOfWeek::Monday => "monday",
            DayOfWeek::Tuesday => "tuesday",
            DayOfWeek::Wednesday => "wednesday",
            DayOfWeek::Thursday => "thursday",
            DayOfWeek::Friday => "friday",
            DayOfWeek::Saturday => "saturday",
            DayOfWeek::Sunday => "sunday",
        };
        f.write_str(name)
    }
}

/// Recipe ids for each meal slot of one day
pub type DayMeals = BTreeMap<MealSlot, Vec<String>>;

/// A user's weekly meal plan
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub days: BTreeMap<DayOfWeek, DayMeals>,
    /// Stored fields this crate does not model, written back unchanged
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Plan {
    /// Create an empty plan for a user
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            name: None,
            days: BTreeMap::new(),
            extra: serde_json::Map::new(),
        }
    }

    /// Recipe ids planned for a slot (empty when unplanned)
    pub fn recipe_ids(&self, day: DayOfWeek, slot: MealSlot) -> &[String] {
        self.days
            .get(&day)
            .and_then(|meals| meals.get(&slot))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Replace the recipes of a slot
    pub fn set_meal(&mut self, day: DayOfWeek, slot: MealSlot, recipe_ids: Vec<String>) {
        self.days.entry(day).or_default().insert(slot, recipe_ids);
    }
}
