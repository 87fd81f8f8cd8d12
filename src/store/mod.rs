//! File-backed goal collection.
//!
//! The canonical list lives in memory and is mirrored to a single JSON file.
//! Every mutation runs under one lock: the change is applied to a working
//! copy, the copy is written to disk, and only then does it replace the
//! in-memory list. A failed write leaves memory and file as they were.

mod error;

pub use error::StoreError;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

use crate::models::{Goal, GoalStatus};

/// Backing file used when no other path is configured.
pub const DEFAULT_DATA_FILE: &str = "data/goals.json";

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Clone)]
pub struct GoalStore {
    path: PathBuf,
    goals: Arc<Mutex<Vec<Goal>>>,
}

impl GoalStore {
    /// Open the store backed by `path`, loading any goals already saved there.
    ///
    /// A missing file means an empty collection. An unreadable or malformed
    /// file is an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self {
            path: path.into(),
            goals: Arc::new(Mutex::new(Vec::new())),
        };

        {
            let mut goals = store.lock();
            *goals = read_file(&store.path)?;
            tracing::info!(
                "Loaded {} goals from {}",
                goals.len(),
                store.path.display()
            );
        }

        Ok(store)
    }

    pub fn open_default() -> Result<Self> {
        Self::open(DEFAULT_DATA_FILE)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Goal>> {
        self.goals.lock().expect("goal store lock poisoned")
    }

    // ============================================================
    // Reads
    // ============================================================

    /// All goals in insertion order.
    pub fn get_all(&self) -> Vec<Goal> {
        self.lock().clone()
    }

    pub fn get(&self, id: Uuid) -> Option<Goal> {
        self.lock().iter().find(|g| g.id == id).cloned()
    }

    // ============================================================
    // Mutations
    // ============================================================

    pub fn add(&self, goal: Goal) -> Result<Goal> {
        if goal.title.trim().is_empty() {
            return Err(StoreError::Validation("title is required".to_string()));
        }

        let mut goals = self.lock();
        let mut working = goals.clone();
        working.push(goal.clone());
        self.commit(&mut goals, working)?;

        tracing::debug!("Added goal {}", goal.id);
        Ok(goal)
    }

    /// Replace the mutable fields of the goal with `goal.id`.
    ///
    /// `id` and `created_date` of the stored goal are kept. Reaching 100%
    /// progress forces `Completed`; lower progress keeps the given status.
    pub fn update(&self, goal: Goal) -> Result<Goal> {
        let mut goals = self.lock();
        let index = goals
            .iter()
            .position(|g| g.id == goal.id)
            .ok_or(StoreError::NotFound(goal.id))?;

        let mut working = goals.clone();
        let existing = &mut working[index];
        existing.title = goal.title;
        existing.description = goal.description;
        existing.goal_type = goal.goal_type;
        existing.target_date = goal.target_date;
        existing.progress_percent = goal.progress_percent;
        existing.status = if goal.progress_percent == 100 {
            GoalStatus::Completed
        } else {
            goal.status
        };
        let updated = existing.clone();

        self.commit(&mut goals, working)?;

        tracing::debug!("Updated goal {}", updated.id);
        Ok(updated)
    }

    /// Remove the goal with `id`. Returns `false` without touching the file
    /// if there is no such goal.
    pub fn delete(&self, id: Uuid) -> Result<bool> {
        let mut goals = self.lock();
        let Some(index) = goals.iter().position(|g| g.id == id) else {
            return Ok(false);
        };

        let mut working = goals.clone();
        working.remove(index);
        self.commit(&mut goals, working)?;

        tracing::debug!("Deleted goal {}", id);
        Ok(true)
    }

    /// Write the current collection to the backing file.
    pub fn save(&self) -> Result<()> {
        let goals = self.lock();
        write_file(&self.path, &goals)
    }

    /// Persist `working` and, once it is on disk, make it the live collection.
    fn commit(&self, goals: &mut Vec<Goal>, working: Vec<Goal>) -> Result<()> {
        write_file(&self.path, &working)?;
        *goals = working;
        Ok(())
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}

fn read_file(path: &Path) -> Result<Vec<Goal>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let json = fs::read_to_string(path).map_err(|source| io_error(path, source))?;
    // A file holding `null` is an empty collection.
    let goals: Option<Vec<Goal>> = serde_json::from_str(&json)?;
    Ok(goals.unwrap_or_default())
}

/// Pretty-print `goals` to a sibling temp file, then rename it into place.
fn write_file(path: &Path, goals: &[Goal]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| io_error(parent, source))?;
    }

    let json = serde_json::to_string_pretty(goals)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).map_err(|source| io_error(&tmp, source))?;
    if let Err(source) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(io_error(path, source));
    }

    tracing::debug!("Saved {} goals to {}", goals.len(), path.display());
    Ok(())
}
