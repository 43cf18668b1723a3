//! Weight history windows for display.
//!
//! A timeframe selects the samples dated on or after a cutoff computed from
//! "today". `Daily` applies no cutoff. Month-based windows step back whole
//! calendar months, clamping to the last day of shorter months.

use crate::progression::sorted_history;
use crate::{Error, UserProfile, WeightSample};
use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Bimonthly,
    Quarterly,
    Semiannual,
    Annual,
}

impl Timeframe {
    pub const ALL: [Timeframe; 7] = [
        Timeframe::Daily,
        Timeframe::Weekly,
        Timeframe::Monthly,
        Timeframe::Bimonthly,
        Timeframe::Quarterly,
        Timeframe::Semiannual,
        Timeframe::Annual,
    ];

    /// Earliest date included in the window, or None for no limit
    pub fn cutoff(self, today: NaiveDate) -> Option<NaiveDate> {
        let months = match self {
            Timeframe::Daily => return None,
            Timeframe::Weekly => return today.checked_sub_days(Days::new(7)),
            Timeframe::Monthly => 1,
            Timeframe::Bimonthly => 2,
            Timeframe::Quarterly => 3,
            Timeframe::Semiannual => 6,
            Timeframe::Annual => 12,
        };
        today.checked_sub_months(Months::new(months))
    }

    fn as_str(self) -> &'static str {
        match self {
            Timeframe::Daily => "daily",
            Timeframe::Weekly => "weekly",
            Timeframe::Monthly => "monthly",
            Timeframe::Bimonthly => "bimonthly",
            Timeframe::Quarterly => "quarterly",
            Timeframe::Semiannual => "semiannual",
            Timeframe::Annual => "annual",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Timeframe::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| Error::Other(format!("Unknown timeframe: {}", s)))
    }
}

/// Samples inside the timeframe window, ascending by date
pub fn filter_history(
    history: &[WeightSample],
    timeframe: Timeframe,
    today: NaiveDate,
) -> Vec<WeightSample> {
    let sorted = sorted_history(history);
    match timeframe.cutoff(today) {
        Some(cutoff) => sorted.into_iter().filter(|s| s.date >= cutoff).collect(),
        None => sorted,
    }
}

/// History to chart for a profile.
///
/// A profile that has never logged a weight gets a single sample for today
/// built from the current weight.
pub fn display_history(
    profile: &UserProfile,
    timeframe: Timeframe,
    today: NaiveDate,
) -> Vec<WeightSample> {
    if profile.weight_history.is_empty() {
        return vec![WeightSample {
            date: today,
            actual: profile.weight,
            estimated: profile.weight,
        }];
    }

    let samples = filter_history(&profile.weight_history, timeframe, today);
    tracing::debug!(
        "{} of {} samples in {} window for {}",
        samples.len(),
        profile.weight_history.len(),
        timeframe,
        profile.id
    );
    samples
}
