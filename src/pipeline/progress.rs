use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::store::{TaskProgress, TaskStore};

/// One frame of the progress stream.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    pub step: u32,
    pub total_steps: u32,
    pub status: String,
    /// Percentage in [0, 100], derived from step / totalSteps.
    pub progress: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Wall-clock seconds for the step, when measured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProgressEvent {
    pub fn step(step: u32, total_steps: u32, status: impl Into<String>) -> Self {
        let progress = if total_steps == 0 {
            0
        } else {
            ((step as f64 / total_steps as f64) * 100.0).round() as u32
        };
        ProgressEvent {
            step,
            total_steps,
            status: status.into(),
            progress,
            data: None,
            timing: None,
            completed: None,
            error: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_timing(mut self, seconds: f64) -> Self {
        self.timing = Some(seconds);
        self
    }

    /// Terminal success frame carrying the stage output.
    pub fn finished(total_steps: u32, status: impl Into<String>, data: Value) -> Self {
        let mut event = ProgressEvent::step(total_steps, total_steps, status);
        event.data = Some(data);
        event.completed = Some(true);
        event
    }

    /// Terminal failure frame.
    pub fn failed(step: u32, total_steps: u32, error: impl Into<String>) -> Self {
        let error = error.into();
        let mut event = ProgressEvent::step(step, total_steps, format!("❌ {error}"));
        event.completed = Some(true);
        event.error = Some(error);
        event
    }
}

/// Fan-out point for pipeline progress.
///
/// Every emitted event is mirrored into the task record (when bound to a
/// task) and pushed to the live stream (when one is attached). A consumer
/// that went away only drops the live copy; the run keeps going.
#[derive(Clone)]
pub struct ProgressEmitter {
    store: TaskStore,
    task_id: Option<String>,
    tx: Option<mpsc::Sender<ProgressEvent>>,
}

impl ProgressEmitter {
    pub fn new(store: TaskStore) -> Self {
        ProgressEmitter { store, task_id: None, tx: None }
    }

    pub fn for_task(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }

    pub fn with_channel(mut self, tx: mpsc::Sender<ProgressEvent>) -> Self {
        self.tx = Some(tx);
        self
    }

    pub async fn emit(&self, event: ProgressEvent) {
        if let Some(id) = &self.task_id {
            self.store.set_progress(
                id,
                TaskProgress {
                    step: event.step,
                    total_steps: event.total_steps,
                    message: event.status.clone(),
                },
            );
        }
        if let Some(tx) = &self.tx {
            // Stream consumers may disconnect mid-run.
            let _ = tx.send(event).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_percentage() {
        assert_eq!(ProgressEvent::step(1, 4, "x").progress, 25);
        assert_eq!(ProgressEvent::step(3, 9, "x").progress, 33);
        assert_eq!(ProgressEvent::step(9, 9, "x").progress, 100);
        assert_eq!(ProgressEvent::step(0, 0, "x").progress, 0);
    }

    #[test]
    fn test_serialized_shape_is_camel_case() {
        let event = ProgressEvent::step(2, 5, "working").with_timing(1.25);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["step"], 2);
        assert_eq!(json["totalSteps"], 5);
        assert_eq!(json["timing"], 1.25);
        assert!(json.get("completed").is_none());
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_terminal_frames() {
        let ok = ProgressEvent::finished(5, "done", serde_json::json!({"x": 1}));
        assert_eq!(ok.completed, Some(true));
        assert!(ok.error.is_none());

        let failed = ProgressEvent::failed(3, 5, "boom");
        assert_eq!(failed.completed, Some(true));
        assert_eq!(failed.error.as_deref(), Some("boom"));
        assert!(failed.status.contains("boom"));
    }

    #[tokio::test]
    async fn test_emit_survives_dropped_receiver() {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStore::open(dir.path().join("tasks.json")).unwrap();
        let (tx, rx) = mpsc::channel(4);
        drop(rx);
        let emitter = ProgressEmitter::new(store).with_channel(tx);
        emitter.emit(ProgressEvent::step(1, 4, "still running")).await;
    }

    #[tokio::test]
    async fn test_emit_mirrors_into_task_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStore::open(dir.path().join("tasks.json")).unwrap();
        let id = store
            .create(
                crate::store::TaskKind::Generation,
                crate::store::TaskInput::Generation { content: "一家咖啡店".into() },
            )
            .unwrap();
        let emitter = ProgressEmitter::new(store.clone()).for_task(&id);
        emitter.emit(ProgressEvent::step(2, 4, "halfway")).await;

        let task = store.get(&id).unwrap();
        let progress = task.progress.unwrap();
        assert_eq!(progress.step, 2);
        assert_eq!(progress.total_steps, 4);
        assert_eq!(progress.message, "halfway");
    }
}
