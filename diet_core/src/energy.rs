//! Energy model: basal metabolic rate, daily expenditure and calorie targets.
//!
//! - BMR uses Mifflin-St Jeor
//! - TDEE scales BMR by a fixed activity multiplier
//! - The target subtracts the daily share of the goal's energy deficit,
//!   using a fixed 7700 kcal per kg of body mass

use crate::macros::{allocate, Macros};
use crate::{ActivityLevel, Error, Result, Sex, UserProfile};
use serde::Serialize;

/// Energy equivalent of one kilogram of body mass (kcal)
pub const KCAL_PER_KG: f64 = 7700.0;

/// Multiplier used when the activity level is not recognised
pub const DEFAULT_ACTIVITY_MULTIPLIER: f64 = 1.2;

/// Targets below this are flagged as low
pub const LOW_TARGET_KCAL: f64 = 1500.0;

/// Targets above this are flagged as high
pub const HIGH_TARGET_KCAL: f64 = 2500.0;

/// Basal metabolic rate in kcal/day
pub fn bmr(profile: &UserProfile) -> f64 {
    let base = 10.0 * profile.weight + 6.25 * profile.height - 5.0 * profile.age;
    match profile.sex {
        Sex::Male => base + 5.0,
        Sex::Female | Sex::Other => base - 161.0,
    }
}

/// Activity multiplier table
pub fn activity_multiplier(level: &ActivityLevel) -> f64 {
    match level {
        ActivityLevel::Sedentary => 1.2,
        ActivityLevel::Light => 1.375,
        ActivityLevel::Moderate => 1.55,
        ActivityLevel::Active => 1.725,
        ActivityLevel::VeryActive => 1.9,
        ActivityLevel::Unknown(raw) => {
            tracing::debug!(
                "Unknown activity level {:?}, using {}",
                raw,
                DEFAULT_ACTIVITY_MULTIPLIER
            );
            DEFAULT_ACTIVITY_MULTIPLIER
        }
    }
}

/// Total daily energy expenditure in kcal/day (not rounded)
pub fn tdee(profile: &UserProfile) -> f64 {
    bmr(profile) * activity_multiplier(&profile.activity_level)
}

/// Goal duration in weeks, rejecting values that cannot divide
pub fn goal_weeks(profile: &UserProfile) -> Result<f64> {
    if profile.goal_weeks <= 0 {
        return Err(Error::InvalidGoalConfiguration {
            goal_weeks: profile.goal_weeks,
        });
    }
    Ok(f64::from(profile.goal_weeks))
}

/// Daily energy deficit needed to reach the target weight in time.
/// Negative for a weight-gain goal.
pub fn daily_deficit(profile: &UserProfile) -> Result<f64> {
    let weeks = goal_weeks(profile)?;
    let total_deficit = profile.kg_delta() * KCAL_PER_KG;
    Ok(total_deficit / (weeks * 7.0))
}

/// Daily calorie target, rounded to the nearest kcal
pub fn target_calories(profile: &UserProfile) -> Result<f64> {
    let tdee = tdee(profile);
    let deficit = daily_deficit(profile)?;
    let target = (tdee - deficit).round();

    tracing::debug!(
        "Target for {}: tdee={:.1} deficit={:.1} target={}",
        profile.id,
        tdee,
        deficit,
        target
    );

    Ok(target)
}

/// Combined energy and macro targets for a profile
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DailyTargets {
    pub bmr: f64,
    pub tdee: f64,
    /// None when the target was set manually
    pub deficit: Option<f64>,
    pub target_kcal: f64,
    pub macros: Macros,
    pub manual: bool,
}

/// A stored manual value; zero or negative means "not set"
fn manual(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}

/// Compute the daily targets, honouring a manual override when present
pub fn daily_targets(profile: &UserProfile) -> Result<DailyTargets> {
    let bmr = bmr(profile);
    let tdee = tdee(profile);

    if let Some(manual_kcal) = manual(profile.manual_target_kcal) {
        let split = allocate(profile, manual_kcal);
        tracing::debug!("Using manual target {} for {}", manual_kcal, profile.id);
        return Ok(DailyTargets {
            bmr,
            tdee,
            deficit: None,
            target_kcal: manual_kcal,
            macros: Macros {
                protein_g: manual(profile.manual_protein).unwrap_or(split.protein_g),
                carbs_g: manual(profile.manual_carbs).unwrap_or(split.carbs_g),
                fats_g: manual(profile.manual_fats).unwrap_or(split.fats_g),
            },
            manual: true,
        });
    }

    let deficit = daily_deficit(profile)?;
    let target_kcal = target_calories(profile)?;

    Ok(DailyTargets {
        bmr,
        tdee,
        deficit: Some(deficit),
        target_kcal,
        macros: allocate(profile, target_kcal),
        manual: false,
    })
}

/// General guidance tier for a calorie target
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Advice {
    Low,
    Balanced,
    High,
}

impl Advice {
    pub fn message(self) -> &'static str {
        match self {
            Advice::Low => {
                "Your calorie target is low. Favour nutrient-dense foods and consider \
                 more physical activity to allow a higher intake."
            }
            Advice::Balanced => {
                "Your target is balanced. Keep protein steady across meals and vary \
                 your sources of fruit and vegetables."
            }
            Advice::High => {
                "Your energy needs are high. Focus on complex carbohydrates and \
                 healthy fats to sustain your energy levels."
            }
        }
    }
}

/// Classify a calorie target into an advice tier
pub fn advice_for(target_kcal: f64) -> Advice {
    if target_kcal < LOW_TARGET_KCAL {
        Advice::Low
    } else if target_kcal > HIGH_TARGET_KCAL {
        Advice::High
    } else {
        Advice::Balanced
    }
}
