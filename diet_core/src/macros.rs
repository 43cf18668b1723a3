//! Macro-nutrient allocation of a calorie target.
//!
//! The baseline split is protein 30%, carbs 40%, fats 30%. Health conditions
//! override it in a fixed order, each later rule replacing the earlier one:
//! 1. reflux: fats 20%, carbs 50%
//! 2. endometriosis or arthritis: protein 35%, carbs 35%, fats 30%
//! 3. multiple sclerosis: protein 30%, carbs 30%, fats 40%
//! 4. high sensitivity: back to the baseline

use crate::conditions::{ARTHRITIS, ENDOMETRIOSIS, MULTIPLE_SCLEROSIS, REFLUX};
use crate::{Sensitivity, UserProfile};
use serde::Serialize;

pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
pub const KCAL_PER_G_CARBS: f64 = 4.0;
pub const KCAL_PER_G_FAT: f64 = 9.0;

/// Fractions of the calorie target per macro. Always sums to 1.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MacroSplit {
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

impl MacroSplit {
    pub const BASELINE: MacroSplit = MacroSplit {
        protein: 0.30,
        carbs: 0.40,
        fats: 0.30,
    };
}

/// Gram targets, rounded to whole grams
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Macros {
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fats_g: f64,
}

impl Macros {
    /// Energy represented by the gram targets
    pub fn kcal(&self) -> f64 {
        self.protein_g * KCAL_PER_G_PROTEIN
            + self.carbs_g * KCAL_PER_G_CARBS
            + self.fats_g * KCAL_PER_G_FAT
    }
}

/// Resolve the percentage split for a profile
pub fn macro_split(profile: &UserProfile) -> MacroSplit {
    let mut split = MacroSplit::BASELINE;

    if profile.has_condition(REFLUX) {
        split.fats = 0.20;
        split.carbs = 0.50;
    }

    if profile.has_condition(ENDOMETRIOSIS) || profile.has_condition(ARTHRITIS) {
        split = MacroSplit {
            protein: 0.35,
            carbs: 0.35,
            fats: 0.30,
        };
    }

    if profile.has_condition(MULTIPLE_SCLEROSIS) {
        split = MacroSplit {
            protein: 0.30,
            carbs: 0.30,
            fats: 0.40,
        };
    }

    if profile.sensitivity == Some(Sensitivity::High) {
        split = MacroSplit::BASELINE;
    }

    split
}

/// Convert a calorie target into gram targets
pub fn allocate(profile: &UserProfile, target_kcal: f64) -> Macros {
    let split = macro_split(profile);
    tracing::debug!("Macro split for {}: {:?}", profile.id, split);

    Macros {
        protein_g: (target_kcal * split.protein / KCAL_PER_G_PROTEIN).round(),
        carbs_g: (target_kcal * split.carbs / KCAL_PER_G_CARBS).round(),
        fats_g: (target_kcal * split.fats / KCAL_PER_G_FAT).round(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::profile;
    use crate::Sex;

    fn with_conditions(conditions: &[&str]) -> UserProfile {
        let mut p = profile(Sex::Female, 65.0, 168.0, 35.0);
        p.health_conditions = conditions.iter().map(|c| c.to_string()).collect();
        p
    }

    #[test]
    fn test_baseline_split() {
        let macros = allocate(&with_conditions(&[]), 2000.0);
        assert_eq!(macros.protein_g, 150.0);
        assert_eq!(macros.carbs_g, 200.0);
        // 600 / 9 = 66.67
        assert_eq!(macros.fats_g, 67.0);
    }

    #[test]
    fn test_reflux_lowers_fat() {
        let split = macro_split(&with_conditions(&["Reflusso"]));
        assert_eq!(split.protein, 0.30);
        assert_eq!(split.carbs, 0.50);
        assert_eq!(split.fats, 0.20);
    }

    #[test]
    fn test_endometriosis_overrides_reflux() {
        let split = macro_split(&with_conditions(&["reflux", "endometriosis"]));
        assert_eq!(
            split,
            MacroSplit {
                protein: 0.35,
                carbs: 0.35,
                fats: 0.30
            }
        );
    }

    #[test]
    fn test_arthritis_and_multiple_sclerosis() {
        assert_eq!(macro_split(&with_conditions(&["artrite"])).protein, 0.35);
        let ms = macro_split(&with_conditions(&["artrite", "sclerosi multipla"]));
        assert_eq!(ms.fats, 0.40);
        assert_eq!(ms.carbs, 0.30);
    }

    #[test]
    fn test_high_sensitivity_resets_to_baseline() {
        let mut p = with_conditions(&["reflux", "endometriosis"]);
        p.sensitivity = Some(Sensitivity::High);
        assert_eq!(macro_split(&p), MacroSplit::BASELINE);

        p.sensitivity = Some(Sensitivity::Medium);
        assert_ne!(macro_split(&p), MacroSplit::BASELINE);
    }

    #[test]
    fn test_macros_account_for_the_whole_target() {
        let cases: [&[&str]; 4] = [&[], &["reflux"], &["endometriosis"], &["sclerosi multipla"]];
        for conditions in cases {
            for target in [1200.0, 1417.0, 1850.0, 2750.0] {
                let macros = allocate(&with_conditions(conditions), target);
                // Each macro rounds by at most half a gram
                assert!(
                    (macros.kcal() - target).abs() <= 8.5,
                    "{:?} at {} gave {} kcal",
                    conditions,
                    target,
                    macros.kcal()
                );
            }
        }
    }
}
