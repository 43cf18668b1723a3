#![forbid(unsafe_code)]

//! Core domain model and nutrition engine for the Dieta diet planner.
//!
//! This crate provides:
//! - Domain types (foods, user profiles, recipes, weekly plans)
//! - Nutrition aggregation and proportional recipe scaling
//! - Energy targets and macro allocation
//! - Dietary filtering for intolerances and health conditions
//! - Weight projection, logging and history windows
//! - Meal planning
//! - Persistence (JSON store, CSV export) and configuration
//!
//! Engine functions are pure: they take snapshots and return values, and
//! callers decide what to persist.

pub mod types;
pub mod error;
pub mod conditions;
pub mod config;
pub mod logging;
pub mod nutrition;
pub mod energy;
pub mod macros;
pub mod filter;
pub mod scaling;
pub mod progression;
pub mod history;
pub mod planner;
pub mod store;
pub mod export;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use nutrition::{aggregate, recipe_totals};
pub use energy::{daily_targets, target_calories, DailyTargets};
pub use macros::{allocate, Macros};
pub use filter::{classify, recommendations, Classification, Recommendations};
pub use scaling::{scale_for_meal, scale_to_target, ScaledRecipe};
pub use progression::{project, reconcile, ProjectionPoint, WeightLog};
pub use history::{display_history, Timeframe};
pub use planner::{fill_week, DayStatus};
pub use store::{DataSource, JsonStore, MemoryStore};
pub use export::export_history_csv;
