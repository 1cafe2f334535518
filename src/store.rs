//! Durable task records.
//!
//! `TaskStore` owns every `Task`: an in-memory map guarded by one lock, with
//! every mutation flushed to a JSON file before the call returns. A restart
//! reloads the file, so polling clients observe the last persisted state of
//! any run (read-your-writes durability). The single lock also serializes
//! concurrent writers to the same task id.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::brand::BrandAsset;
use crate::scoring::ComprehensiveReport;

/// Which pipeline family a task runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Free text in, structured brand asset out.
    Generation,
    /// Conversation content in, graded valuation report out (generation runs
    /// first when no asset exists yet).
    Evaluation,
}

/// Task lifecycle state. `Failed` may re-enter `InProgress` via retry;
/// `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

/// Payload supplied at task creation, tagged per task kind so retry
/// classification is exhaustive.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskInput {
    Generation {
        content: String,
    },
    Evaluation {
        /// Collected conversation text describing the brand.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
        /// Pre-structured asset, when the client already has one.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        asset: Option<Box<BrandAsset>>,
    },
}

/// Step-level progress of a running task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskProgress {
    pub step: u32,
    pub total_steps: u32,
    pub message: String,
}

/// Intermediate outputs persisted per stage so a retry resumes at the first
/// incomplete stage instead of starting over.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskArtifacts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_asset: Option<Box<BrandAsset>>,
}

/// Terminal output, tagged per task kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskOutput {
    Asset { asset: Box<BrandAsset> },
    Report { report: Box<ComprehensiveReport> },
}

/// A unit of orchestrated work with persisted status, progress, and result.
///
/// Invariant: once the status leaves pending/in_progress, exactly one of
/// `result` / `error` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub kind: TaskKind,
    pub status: TaskStatus,
    pub input: TaskInput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<TaskProgress>,
    #[serde(default)]
    pub artifacts: TaskArtifacts,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<TaskOutput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Keyed storage for task records with synchronous JSON-file durability.
#[derive(Debug, Clone)]
pub struct TaskStore {
    tasks: Arc<RwLock<HashMap<String, Task>>>,
    storage_path: PathBuf,
}

impl TaskStore {
    /// Open the store, loading any previously persisted tasks.
    pub fn open(storage_path: PathBuf) -> anyhow::Result<Self> {
        let tasks = if storage_path.exists() {
            let contents = std::fs::read_to_string(&storage_path)?;
            let loaded: Vec<Task> = serde_json::from_str(&contents)?;
            loaded.into_iter().map(|t| (t.id.clone(), t)).collect()
        } else {
            HashMap::new()
        };

        Ok(Self {
            tasks: Arc::new(RwLock::new(tasks)),
            storage_path,
        })
    }

    /// Create a fresh pending task and persist it immediately.
    pub fn create(&self, kind: TaskKind, input: TaskInput) -> anyhow::Result<String> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let task = Task {
            id: id.clone(),
            kind,
            status: TaskStatus::Pending,
            input,
            progress: None,
            artifacts: TaskArtifacts::default(),
            result: None,
            error: None,
            created_at: now,
            updated_at: now,
        };

        let mut tasks = self.tasks.write().expect("task store lock poisoned");
        tasks.insert(id.clone(), task);
        self.save(&tasks)?;
        Ok(id)
    }

    /// Fetch a task by id.
    pub fn get(&self, id: &str) -> Option<Task> {
        let tasks = self.tasks.read().expect("task store lock poisoned");
        tasks.get(id).cloned()
    }

    /// Apply a mutation to a task and flush. Absent ids are a logged no-op,
    /// not an error: a disconnected client may race task deletion.
    fn with_task(&self, id: &str, mutate: impl FnOnce(&mut Task)) {
        let mut tasks = self.tasks.write().expect("task store lock poisoned");
        match tasks.get_mut(id) {
            Some(task) => {
                mutate(task);
                task.updated_at = Utc::now();
            }
            None => {
                tracing::warn!(task_id = %id, "update for unknown task ignored");
                return;
            }
        }
        if let Err(e) = self.save(&tasks) {
            tracing::error!(task_id = %id, "failed to persist task store: {}", e);
        }
    }

    /// Move a task into `in_progress`, clearing any previous error.
    pub fn begin_run(&self, id: &str) {
        self.with_task(id, |task| {
            task.status = TaskStatus::InProgress;
            task.error = None;
        });
    }

    pub fn update_status(&self, id: &str, status: TaskStatus) {
        self.with_task(id, |task| task.status = status);
    }

    pub fn set_progress(&self, id: &str, progress: TaskProgress) {
        self.with_task(id, |task| task.progress = Some(progress));
    }

    /// Persist a completed generation stage so retries skip it.
    pub fn set_generated_asset(&self, id: &str, asset: BrandAsset) {
        self.with_task(id, |task| {
            task.artifacts.generated_asset = Some(Box::new(asset));
        });
    }

    /// Record the terminal output. Implies `completed`; clears any error.
    pub fn set_result(&self, id: &str, result: TaskOutput) {
        self.with_task(id, |task| {
            task.status = TaskStatus::Completed;
            task.result = Some(result);
            task.error = None;
        });
    }

    /// Record a failure. Implies `failed`; clears any result.
    pub fn set_error(&self, id: &str, message: impl Into<String>) {
        let message = message.into();
        self.with_task(id, |task| {
            task.status = TaskStatus::Failed;
            task.error = Some(message);
            task.result = None;
        });
    }

    /// Write the full task map to disk. Called with the write lock held so
    /// writers to the same id cannot interleave their flushes.
    fn save(&self, tasks: &HashMap<String, Task>) -> anyhow::Result<()> {
        if let Some(parent) = self.storage_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let records: Vec<&Task> = tasks.values().collect();
        let contents = serde_json::to_string_pretty(&records)?;
        std::fs::write(&self.storage_path, contents)?;
        Ok(())
    }
}
