//! Weight progression: the linear forecast toward the goal and the
//! reconciliation of logged weights against it.
//!
//! Both use the same linear model: the profile loses (or gains)
//! `weight - target_weight` evenly over `goal_weeks`.

use crate::energy::goal_weeks;
use crate::{Result, UserProfile, WeightSample};
use chrono::NaiveDate;
use serde::Serialize;

/// Round to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// One week of the forecast
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProjectionPoint {
    pub week_index: u32,
    pub projected_weight: f64,
}

/// Expected weight at every week from now (week 0) to the goal (week `goal_weeks`)
pub fn project(profile: &UserProfile) -> Result<Vec<ProjectionPoint>> {
    let weeks = goal_weeks(profile)?;
    let weekly_change = profile.kg_delta() / weeks;

    let points = (0..=profile.goal_weeks as u32)
        .map(|week| ProjectionPoint {
            week_index: week,
            projected_weight: round1(profile.weight - weekly_change * f64::from(week)),
        })
        .collect();

    Ok(points)
}

/// Expected daily change in kg (positive when losing)
pub fn daily_rate(profile: &UserProfile) -> Result<f64> {
    Ok(profile.kg_delta() / (goal_weeks(profile)? * 7.0))
}

/// Weight history after logging a measurement
#[derive(Clone, Debug, PartialEq)]
pub struct WeightLog {
    /// Full history, ascending by date
    pub history: Vec<WeightSample>,
    /// New current weight, set when the logged date is the most recent one
    pub current_weight: Option<f64>,
}

impl WeightLog {
    /// Write the result back onto the caller's profile
    pub fn apply_to(self, profile: &mut UserProfile) {
        profile.weight_history = self.history;
        if let Some(weight) = self.current_weight {
            profile.weight = weight;
        }
    }
}

/// Sort samples ascending by date
pub fn sorted_history(history: &[WeightSample]) -> Vec<WeightSample> {
    let mut sorted = history.to_vec();
    sorted.sort_by_key(|s| s.date);
    sorted
}

/// Record `actual` kg on `date`.
///
/// An existing sample for the date has its `actual` overwritten. Otherwise a
/// new sample is inserted whose estimate continues from the preceding sample's
/// estimate (or the current weight when there is none) minus one day of the
/// linear rate.
pub fn reconcile(profile: &UserProfile, date: NaiveDate, actual: f64) -> Result<WeightLog> {
    let mut history = sorted_history(&profile.weight_history);

    if let Some(existing) = history.iter_mut().find(|s| s.date == date) {
        tracing::debug!("Overwriting weight for {} on {}", profile.id, date);
        existing.actual = actual;
    } else {
        let rate = daily_rate(profile)?;
        let previous_estimate = history
            .iter()
            .rev()
            .find(|s| s.date < date)
            .map(|s| s.estimated)
            .unwrap_or(profile.weight);

        let sample = WeightSample {
            date,
            actual,
            estimated: round1(previous_estimate - rate),
        };
        tracing::debug!("New weight sample for {}: {:?}", profile.id, sample);

        let position = history.partition_point(|s| s.date < date);
        history.insert(position, sample);
    }

    let is_latest = history.last().map(|s| s.date <= date).unwrap_or(true);

    Ok(WeightLog {
        history,
        current_weight: is_latest.then_some(actual),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::profile;
    use crate::{Error, Sex};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn losing_profile() -> UserProfile {
        let mut p = profile(Sex::Female, 70.0, 165.0, 28.0);
        p.target_weight = 65.0;
        p.goal_weeks = 10;
        p
    }

    #[test]
    fn test_projection_endpoints() {
        let points = project(&losing_profile()).unwrap();

        assert_eq!(points.len(), 11);
        assert_eq!(points[0].projected_weight, 70.0);
        assert_eq!(points[5].projected_weight, 67.5);
        assert_eq!(points[10].projected_weight, 65.0);
        assert_eq!(points[10].week_index, 10);
    }

    #[test]
    fn test_projection_rounds_to_one_decimal() {
        let mut p = losing_profile();
        p.goal_weeks = 3;
        let weights: Vec<f64> = project(&p).unwrap().iter().map(|pt| pt.projected_weight).collect();
        assert_eq!(weights, [70.0, 68.3, 66.7, 65.0]);
    }

    #[test]
    fn test_projection_rejects_zero_weeks() {
        let mut p = losing_profile();
        p.goal_weeks = 0;
        assert!(matches!(
            project(&p),
            Err(Error::InvalidGoalConfiguration { goal_weeks: 0 })
        ));
    }

    #[test]
    fn test_reconcile_appends_with_estimate() {
        let p = losing_profile();
        let log = reconcile(&p, date("2026-03-01"), 69.6).unwrap();

        // 5 kg over 70 days = 0.0714/day
        assert_eq!(log.history.len(), 1);
        assert_eq!(log.history[0].estimated, 69.9);
        assert_eq!(log.history[0].actual, 69.6);
        assert_eq!(log.current_weight, Some(69.6));
    }

    #[test]
    fn test_reconcile_overwrites_same_day() {
        let mut p = losing_profile();
        p.weight_history = vec![WeightSample {
            date: date("2026-03-01"),
            actual: 69.6,
            estimated: 69.9,
        }];

        let log = reconcile(&p, date("2026-03-01"), 69.2).unwrap();
        assert_eq!(log.history.len(), 1);
        assert_eq!(log.history[0].actual, 69.2);
        assert_eq!(log.history[0].estimated, 69.9);
    }

    #[test]
    fn test_reconcile_overwrite_does_not_need_goal() {
        let mut p = losing_profile();
        p.goal_weeks = 0;
        p.weight_history = vec![WeightSample {
            date: date("2026-03-01"),
            actual: 69.6,
            estimated: 69.9,
        }];
        assert!(reconcile(&p, date("2026-03-01"), 69.0).is_ok());
        assert!(reconcile(&p, date("2026-03-02"), 69.0).is_err());
    }

    #[test]
    fn test_reconcile_backfill_keeps_order_and_current_weight() {
        let mut p = losing_profile();
        p.weight_history = vec![
            WeightSample {
                date: date("2026-03-10"),
                actual: 69.0,
                estimated: 69.3,
            },
            WeightSample {
                date: date("2026-03-01"),
                actual: 69.8,
                estimated: 69.9,
            },
        ];

        let log = reconcile(&p, date("2026-03-05"), 69.5).unwrap();
        let dates: Vec<_> = log.history.iter().map(|s| s.date).collect();
        assert_eq!(dates, [date("2026-03-01"), date("2026-03-05"), date("2026-03-10")]);
        // Continues from the 1 March estimate
        assert_eq!(log.history[1].estimated, 69.8);
        assert_eq!(log.current_weight, None);
    }

    #[test]
    fn test_apply_to_profile() {
        let mut p = losing_profile();
        let log = reconcile(&p, date("2026-03-01"), 69.4).unwrap();
        log.apply_to(&mut p);

        assert_eq!(p.weight, 69.4);
        assert_eq!(p.weight_history.len(), 1);
    }
}
