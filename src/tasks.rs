//! Task registry
//!
//! CRUD over the task pool: add, complete, roll forward, lookup, filters.
//! The registry itself never rejects a double completion - that contract
//! belongs to the operations layer, which checks `completed_at` before
//! calling [`TaskRegistry::complete`].

use chrono::{Local, NaiveDate};

use crate::store::{Result, Store};
use crate::types::{generate_id, Task, TaskPriority};

/// Task CRUD over the store.
pub struct TaskRegistry<'a> {
    store: &'a Store,
}

impl<'a> TaskRegistry<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Add a new task to the pool. Only fails on a storage error.
    pub fn add(
        &self,
        content: &str,
        priority: TaskPriority,
        notes: Vec<String>,
    ) -> Result<Task> {
        let mut pool = self.store.load_tasks()?;
        let task = Task {
            id: generate_id(),
            content: content.to_string(),
            priority,
            created_at: Local::now(),
            completed_at: None,
            roll_forward_count: 0,
            notes,
        };
        pool.tasks.push(task.clone());
        self.store.save_tasks(&pool.tasks)?;
        Ok(task)
    }

    /// Mark a task completed. Returns None if the id is unknown.
    pub fn complete(&self, id: &str) -> Result<Option<Task>> {
        let mut pool = self.store.load_tasks()?;
        for task in &mut pool.tasks {
            if task.id == id {
                task.completed_at = Some(Local::now());
                let updated = task.clone();
                self.store.save_tasks(&pool.tasks)?;
                return Ok(Some(updated));
            }
        }
        Ok(None)
    }

    /// Roll a task into the next day: bump the count, note the date.
    pub fn roll_forward(&self, id: &str) -> Result<Option<Task>> {
        self.roll_forward_on(id, Local::now().date_naive())
    }

    /// Roll forward as of a specific date.
    pub fn roll_forward_on(&self, id: &str, date: NaiveDate) -> Result<Option<Task>> {
        let mut pool = self.store.load_tasks()?;
        for task in &mut pool.tasks {
            if task.id == id {
                task.roll_forward_count += 1;
                task.notes
                    .push(format!("Rolled forward on {}", date.format("%Y-%m-%d")));
                let updated = task.clone();
                self.store.save_tasks(&pool.tasks)?;
                return Ok(Some(updated));
            }
        }
        Ok(None)
    }

    /// Resolve a task by exact id, else by the first case-insensitive
    /// content substring match. When several tasks match, the earliest one
    /// wins - callers get no ambiguity signal.
    pub fn find(&self, identifier: &str) -> Result<Option<Task>> {
        let pool = self.store.load_tasks()?;

        if let Some(task) = pool.tasks.iter().find(|t| t.id == identifier) {
            return Ok(Some(task.clone()));
        }

        let needle = identifier.to_lowercase();
        Ok(pool
            .tasks
            .iter()
            .find(|t| t.content.to_lowercase().contains(&needle))
            .cloned())
    }

    /// List tasks, optionally filtered by priority and completion status.
    pub fn list(&self, priority: Option<TaskPriority>, active_only: bool) -> Result<Vec<Task>> {
        let pool = self.store.load_tasks()?;
        Ok(pool
            .tasks
            .into_iter()
            .filter(|t| priority.map_or(true, |p| t.priority == p))
            .filter(|t| !active_only || t.is_active())
            .collect())
    }

    /// Active tasks rolled forward at least `min_roll` times.
    pub fn avoided(&self, min_roll: u32) -> Result<Vec<Task>> {
        let pool = self.store.load_tasks()?;
        Ok(pool
            .tasks
            .into_iter()
            .filter(|t| t.is_active() && t.roll_forward_count >= min_roll)
            .collect())
    }
}
