//! Data access for foods, users, recipes and plans.
//!
//! The engine only ever sees snapshots handed over through [`DataSource`].
//! [`JsonStore`] keeps one JSON array per collection in a data directory with
//! file locking, so the CLI and any other process can share it safely.

use crate::error::Error;
use crate::{Food, Plan, Recipe, Result, UserProfile};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const FOODS_FILE: &str = "foods.json";
pub const USERS_FILE: &str = "users.json";
pub const RECIPES_FILE: &str = "recipes.json";
pub const PLANS_FILE: &str = "plans.json";

/// Read access to the stored collections
pub trait DataSource {
    fn foods(&self) -> Result<Vec<Food>>;
    fn users(&self) -> Result<Vec<UserProfile>>;
    fn recipes(&self) -> Result<Vec<Recipe>>;
    fn plans(&self) -> Result<Vec<Plan>>;

    fn user(&self, id: &str) -> Result<UserProfile> {
        self.users()?
            .into_iter()
            .find(|u| u.id == id)
            .ok_or_else(|| Error::not_found("user", id))
    }

    fn recipe(&self, id: &str) -> Result<Recipe> {
        self.recipes()?
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| Error::not_found("recipe", id))
    }

    /// The first plan belonging to a user, if any
    fn plan_for_user(&self, user_id: &str) -> Result<Option<Plan>> {
        Ok(self.plans()?.into_iter().find(|p| p.user_id == user_id))
    }
}

/// File-backed store over a data directory
#[derive(Clone, Debug)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    pub fn save_foods(&self, foods: &[Food]) -> Result<()> {
        write_collection(&self.path(FOODS_FILE), foods)
    }

    pub fn save_users(&self, users: &[UserProfile]) -> Result<()> {
        write_collection(&self.path(USERS_FILE), users)
    }

    pub fn save_recipes(&self, recipes: &[Recipe]) -> Result<()> {
        write_collection(&self.path(RECIPES_FILE), recipes)
    }

    pub fn save_plans(&self, plans: &[Plan]) -> Result<()> {
        write_collection(&self.path(PLANS_FILE), plans)
    }

    /// Load a user, modify it, and save the collection back
    pub fn update_user<F>(&self, id: &str, f: F) -> Result<UserProfile>
    where
        F: FnOnce(&mut UserProfile) -> Result<()>,
    {
        let mut users = self.users()?;
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| Error::not_found("user", id))?;
        f(user)?;
        let updated = user.clone();
        self.save_users(&users)?;
        Ok(updated)
    }

    /// Replace the plan with the same id, or append it
    pub fn upsert_plan(&self, plan: &Plan) -> Result<()> {
        let mut plans = self.plans()?;
        match plans.iter_mut().find(|p| p.id == plan.id) {
            Some(existing) => *existing = plan.clone(),
            None => plans.push(plan.clone()),
        }
        self.save_plans(&plans)
    }
}

impl DataSource for JsonStore {
    fn foods(&self) -> Result<Vec<Food>> {
        read_collection(&self.path(FOODS_FILE))
    }

    fn users(&self) -> Result<Vec<UserProfile>> {
        read_collection(&self.path(USERS_FILE))
    }

    fn recipes(&self) -> Result<Vec<Recipe>> {
        read_collection(&self.path(RECIPES_FILE))
    }

    fn plans(&self) -> Result<Vec<Plan>> {
        read_collection(&self.path(PLANS_FILE))
    }
}

/// Read a JSON array with a shared lock.
///
/// A missing file is an empty collection. A file that does not parse is an
/// error and is left untouched.
fn read_collection<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        tracing::debug!("No file at {:?}, using empty collection", path);
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let mut contents = String::new();
    let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
    file.unlock()?;
    read?;

    if contents.trim().is_empty() {
        tracing::warn!("Empty file {:?}, using empty collection", path);
        return Ok(Vec::new());
    }

    let items: Vec<T> = serde_json::from_str(&contents).map_err(|e| {
        tracing::error!("Failed to parse {:?}: {}", path, e);
        Error::Json(e)
    })?;
    tracing::debug!("Loaded {} entries from {:?}", items.len(), path);
    Ok(items)
}

/// Atomically replace a JSON array: write a locked temp file in the same
/// directory, sync it, then rename it over the target.
fn write_collection<T: Serialize>(path: &Path, items: &[T]) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| Error::Other(format!("{:?} has no parent directory", path)))?;
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    temp.as_file().lock_exclusive()?;

    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        serde_json::to_writer_pretty(&mut writer, items)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;
    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    tracing::debug!("Saved {} entries to {:?}", items.len(), path);
    Ok(())
}

/// In-memory snapshots
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    pub foods: Vec<Food>,
    pub users: Vec<UserProfile>,
    pub recipes: Vec<Recipe>,
    pub plans: Vec<Plan>,
}

impl DataSource for MemoryStore {
    fn foods(&self) -> Result<Vec<Food>> {
        Ok(self.foods.clone())
    }

    fn users(&self) -> Result<Vec<UserProfile>> {
        Ok(self.users.clone())
    }

    fn recipes(&self) -> Result<Vec<Recipe>> {
        Ok(self.recipes.clone())
    }

    fn plans(&self) -> Result<Vec<Plan>> {
        Ok(self.plans.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{food, profile, recipe};
    use crate::{DayOfWeek, MealSlot, Sex};

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(temp_dir.path());

        store
            .save_foods(&[food("rice", 360.0, 7.0, 80.0, 0.6)])
            .unwrap();
        store
            .save_recipes(&[recipe("risotto", &[("rice", 90.0)])])
            .unwrap();
        store
            .save_users(&[profile(Sex::Female, 60.0, 165.0, 40.0)])
            .unwrap();

        assert_eq!(store.foods().unwrap()[0].calories, 360.0);
        assert_eq!(store.recipe("risotto").unwrap().ingredients[0].amount, 90.0);
        assert_eq!(store.user("u1").unwrap().sex, Sex::Female);
    }

    #[test]
    fn test_missing_files_are_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(temp_dir.path().join("nothing-here"));

        assert!(store.foods().unwrap().is_empty());
        assert!(store.plans().unwrap().is_empty());
        assert!(store.plan_for_user("u1").unwrap().is_none());
    }

    #[test]
    fn test_corrupted_file_is_an_error() {
        crate::logging::init_test();
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(temp_dir.path());
        std::fs::write(temp_dir.path().join(USERS_FILE), "{ invalid json }").unwrap();

        assert!(matches!(store.users(), Err(Error::Json(_))));
        // Left as it was
        let contents = std::fs::read_to_string(temp_dir.path().join(USERS_FILE)).unwrap();
        assert_eq!(contents, "{ invalid json }");
    }

    #[test]
    fn test_unknown_user_is_not_found() {
        let store = MemoryStore::default();
        assert!(matches!(
            store.user("ghost"),
            Err(Error::NotFound { kind: "user", .. })
        ));
    }

    #[test]
    fn test_update_user_pattern() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(temp_dir.path());
        store
            .save_users(&[profile(Sex::Male, 80.0, 180.0, 30.0)])
            .unwrap();

        store
            .update_user("u1", |u| {
                u.weight = 79.2;
                Ok(())
            })
            .unwrap();

        assert_eq!(store.user("u1").unwrap().weight, 79.2);
        assert!(store.update_user("ghost", |_| Ok(())).is_err());
    }

    #[test]
    fn test_update_user_keeps_unmodelled_fields() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(temp_dir.path());
        std::fs::write(
            temp_dir.path().join(USERS_FILE),
            r#"[{
                "id": "u1",
                "sex": "female",
                "age": 40,
                "height": 165,
                "weight": 60,
                "targetWeight": 58,
                "goalWeeks": 8,
                "email": "anna@example.com",
                "role": "admin"
            }]"#,
        )
        .unwrap();

        store
            .update_user("u1", |u| {
                u.weight = 59.5;
                Ok(())
            })
            .unwrap();

        let contents = std::fs::read_to_string(temp_dir.path().join(USERS_FILE)).unwrap();
        let saved: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(saved[0]["email"], "anna@example.com");
        assert_eq!(saved[0]["role"], "admin");
        assert_eq!(saved[0]["weight"], 59.5);
    }

    #[test]
    fn test_upsert_plan() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(temp_dir.path());

        let mut plan = Plan::new("u1");
        store.upsert_plan(&plan).unwrap();
        plan.set_meal(DayOfWeek::Monday, MealSlot::Lunch, vec!["risotto".into()]);
        store.upsert_plan(&plan).unwrap();
        store.upsert_plan(&Plan::new("u2")).unwrap();

        let plans = store.plans().unwrap();
        assert_eq!(plans.len(), 2);
        let saved = store.plan_for_user("u1").unwrap().unwrap();
        assert_eq!(saved.recipe_ids(DayOfWeek::Monday, MealSlot::Lunch), ["risotto"]);
    }

    #[test]
    fn test_atomic_save_leaves_no_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(temp_dir.path());
        store.save_plans(&[Plan::new("u1")]).unwrap();

        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != PLANS_FILE)
            .collect();
        assert!(extras.is_empty(), "Unexpected files: {:?}", extras);
    }
}
