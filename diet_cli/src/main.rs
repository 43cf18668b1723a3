use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use diet_core::energy::advice_for;
use diet_core::planner::{fill_day, week_status};
use diet_core::scaling::meal_target;
use diet_core::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dieta")]
#[command(about = "Diet planning and weight tracking", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show energy and macro targets
    Stats {
        #[arg(long)]
        user: String,
    },

    /// List recommended and avoided foods
    Recommend {
        #[arg(long)]
        user: String,
    },

    /// Scale a recipe to a meal's share of the daily target
    Scale {
        #[arg(long)]
        user: String,

        #[arg(long)]
        recipe: String,

        /// Meal name (breakfast, lunch, dinner, snacks or the Italian labels)
        #[arg(long)]
        meal: String,
    },

    /// Show the weekly weight projection
    Project {
        #[arg(long)]
        user: String,
    },

    /// Log a weight measurement
    LogWeight {
        #[arg(long)]
        user: String,

        /// Weight in kg
        #[arg(long)]
        weight: f64,

        /// Measurement date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Show weight history
    History {
        #[arg(long)]
        user: String,

        /// daily, weekly, monthly, bimonthly, quarterly, semiannual or annual
        #[arg(long)]
        timeframe: Option<Timeframe>,

        /// Also write the shown history to a CSV file
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Auto-fill the weekly meal plan
    Plan {
        #[arg(long)]
        user: String,

        /// Fill only this day
        #[arg(long)]
        day: Option<DayOfWeek>,
    },
}

fn main() {
    diet_core::logging::init_with_level("warn");

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    tracing::debug!("Using data directory {:?}", data_dir);
    let store = JsonStore::new(data_dir);
    let today = Local::now().date_naive();

    match cli.command {
        Commands::Stats { user } => cmd_stats(&store, &user),
        Commands::Recommend { user } => cmd_recommend(&store, &user),
        Commands::Scale { user, recipe, meal } => cmd_scale(&store, &user, &recipe, &meal),
        Commands::Project { user } => cmd_project(&store, &user),
        Commands::LogWeight { user, weight, date } => {
            cmd_log_weight(&store, &user, weight, date.unwrap_or(today))
        }
        Commands::History {
            user,
            timeframe,
            export,
        } => cmd_history(
            &store,
            &user,
            timeframe.unwrap_or(config.display.timeframe),
            export,
            today,
        ),
        Commands::Plan { user, day } => cmd_plan(&store, &user, day, &config),
    }
}

fn cmd_stats(store: &JsonStore, user_id: &str) -> Result<()> {
    let profile = store.user(user_id)?;
    let targets = daily_targets(&profile)?;

    println!("User: {} ({})", profile.name, profile.id);
    println!("BMR: {:.0} kcal", targets.bmr);
    println!("TDEE: {:.0} kcal", targets.tdee);
    match targets.deficit {
        Some(deficit) => println!("Daily deficit: {:.0} kcal", deficit),
        None => println!("Manual target"),
    }
    println!("Target: {:.0} kcal", targets.target_kcal);
    println!("Protein: {:.0} g", targets.macros.protein_g);
    println!("Carbs: {:.0} g", targets.macros.carbs_g);
    println!("Fats: {:.0} g", targets.macros.fats_g);
    println!();
    println!("{}", advice_for(targets.target_kcal).message());
    Ok(())
}

fn cmd_recommend(store: &JsonStore, user_id: &str) -> Result<()> {
    let profile = store.user(user_id)?;
    let foods = store.foods()?;
    let recs = recommendations(&profile, &foods);

    println!("Recommended:");
    for entry in &recs.recommended {
        println!("  - {} ({})", entry.name, entry.reason);
    }
    println!("Avoided:");
    for entry in &recs.avoided {
        println!("  - {} ({})", entry.name, entry.reason);
    }
    Ok(())
}

fn cmd_scale(store: &JsonStore, user_id: &str, recipe_id: &str, meal: &str) -> Result<()> {
    let profile = store.user(user_id)?;
    let recipe = store.recipe(recipe_id)?;
    let foods = store.foods()?;

    let target = meal_target(&profile, meal)?;
    let scaled = scale_for_meal(&recipe, &foods, &profile, meal)?;

    println!(
        "{} for {} (target {:.0} kcal, factor {:.2})",
        recipe.name, meal, target, scaled.scale_factor
    );
    for ingredient in &scaled.ingredients {
        let name = foods
            .iter()
            .find(|f| f.id == ingredient.food_id)
            .map(|f| f.name.as_str())
            .unwrap_or(ingredient.food_id.as_str());
        println!("  {}: {:.0} g", name, ingredient.amount);
    }

    let totals = scaled.totals.rounded();
    println!(
        "Total: {} kcal, protein {} g, carbs {} g, fats {} g",
        totals.calories, totals.protein, totals.carbs, totals.fats
    );
    Ok(())
}

fn cmd_project(store: &JsonStore, user_id: &str) -> Result<()> {
    let profile = store.user(user_id)?;
    for point in project(&profile)? {
        println!("Week {:>2}: {:.1} kg", point.week_index, point.projected_weight);
    }
    Ok(())
}

fn cmd_log_weight(store: &JsonStore, user_id: &str, weight: f64, date: NaiveDate) -> Result<()> {
    let updated = store.update_user(user_id, |profile| {
        reconcile(profile, date, weight)?.apply_to(profile);
        Ok(())
    })?;

    let estimated = updated
        .weight_history
        .iter()
        .find(|s| s.date == date)
        .map(|s| s.estimated)
        .unwrap_or(weight);

    println!(
        "Logged {:.1} kg on {} (estimated {:.1} kg)",
        weight, date, estimated
    );
    println!("Current weight: {:.1} kg", updated.weight);
    Ok(())
}

fn cmd_history(
    store: &JsonStore,
    user_id: &str,
    timeframe: Timeframe,
    export: Option<PathBuf>,
    today: NaiveDate,
) -> Result<()> {
    let profile = store.user(user_id)?;
    let samples = display_history(&profile, timeframe, today);

    println!("{:<12}{:>8}{:>11}", "date", "actual", "estimated");
    for sample in &samples {
        println!(
            "{:<12}{:>8.1}{:>11.1}",
            sample.date.to_string(),
            sample.actual,
            sample.estimated
        );
    }

    if let Some(path) = export {
        let count = export_history_csv(&path, &samples)?;
        println!("Exported {} samples to {}", count, path.display());
    }
    Ok(())
}

fn cmd_plan(
    store: &JsonStore,
    user_id: &str,
    day: Option<DayOfWeek>,
    config: &Config,
) -> Result<()> {
    let profile = store.user(user_id)?;
    let foods = store.foods()?;
    let recipes = store.recipes()?;
    let tolerance = config.planner.tolerance;

    let mut plan = match store.plan_for_user(&profile.id)? {
        Some(plan) => plan,
        None => Plan::new(&profile.id),
    };

    match day {
        Some(day) => fill_day(&mut plan, &profile, &recipes, &foods, day, tolerance)?,
        None => fill_week(&mut plan, &profile, &recipes, &foods, tolerance)?,
    }
    store.upsert_plan(&plan)?;

    let target = daily_targets(&profile)?.target_kcal;
    for status in week_status(&plan, &recipes, &foods, target) {
        if day.is_some_and(|d| d != status.day) {
            continue;
        }
        let marker = if status.over_target { " (over target)" } else { "" };
        println!(
            "{}: {:.0} / {:.0} kcal{}",
            status.day, status.calories, status.target_kcal, marker
        );
        for slot in MealSlot::ALL {
            let ids = plan.recipe_ids(status.day, slot);
            if !ids.is_empty() {
                println!("  {}: {}", slot, ids.join(", "));
            }
        }
    }
    Ok(())
}
