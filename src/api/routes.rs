//! HTTP route handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event, Sse},
        IntoResponse, Json, Response,
    },
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::brand::BrandAsset;
use crate::config::Config;
use crate::llm::{LlmClient, OpenAiClient};
use crate::pipeline::{Orchestrator, ProgressEmitter, ProgressEvent, RetryError};
use crate::store::{TaskInput, TaskKind, TaskOutput, TaskStore};
use crate::tools;

use super::types::*;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: TaskStore,
    pub orchestrator: Orchestrator,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/tasks", post(create_task))
        .route("/tasks/:id", get(get_task))
        .route("/tasks/:id/retry", post(retry_task))
        .route("/brand/generate", post(generate_brand))
        .route("/brand/evaluate", post(evaluate_brand))
        .route("/functions/web-search", post(search_web))
        .route("/functions/web-reader", post(read_web))
        .with_state(state)
}

/// Start the HTTP server.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let store = TaskStore::open(config.store_path.clone())?;
    let llm: Arc<dyn LlmClient> = Arc::new(OpenAiClient::new(&config));
    let orchestrator = Orchestrator::new(store.clone(), llm);

    let state = Arc::new(AppState {
        config: config.clone(),
        store,
        orchestrator,
    });

    let app = router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({"success": false, "error": message.into()})),
    )
        .into_response()
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

/// Build a task input from the untyped `input` body, per task type.
fn task_input_from(kind: TaskKind, input: Value) -> Result<TaskInput, String> {
    match kind {
        TaskKind::Generation => {
            let content = input
                .get("content")
                .and_then(Value::as_str)
                .unwrap_or("")
                .trim()
                .to_string();
            if content.is_empty() {
                return Err("生成任务需要非空的 content".to_string());
            }
            if content.chars().count() > MAX_CONTENT_CHARS {
                return Err("品牌内容过长，最多10000字符".to_string());
            }
            Ok(TaskInput::Generation { content })
        }
        TaskKind::Evaluation => {
            let content = input
                .get("content")
                .and_then(Value::as_str)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty());
            let asset = match input.get("asset") {
                Some(v) if v.is_object() => {
                    let parsed: BrandAsset = serde_json::from_value(v.clone())
                        .map_err(|e| format!("asset 解析失败: {e}"))?;
                    Some(Box::new(parsed))
                }
                _ => None,
            };
            if content.is_none() && asset.is_none() {
                return Err("评测任务需要 content 或 asset".to_string());
            }
            Ok(TaskInput::Evaluation { content, asset })
        }
    }
}

async fn create_task(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTaskRequest>,
) -> Response {
    let Some(kind) = req.kind else {
        return error_response(StatusCode::BAD_REQUEST, "type 为必填项");
    };
    let input = match task_input_from(kind, req.input) {
        Ok(input) => input,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
    };
    match state.store.create(kind, input) {
        Ok(task_id) => (
            StatusCode::CREATED,
            Json(TaskCreatedResponse {
                success: true,
                task_id,
            }),
        )
            .into_response(),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

async fn get_task(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    match state.store.get(&id) {
        Some(task) => Json(json!({"success": true, "task": task})).into_response(),
        None => error_response(StatusCode::NOT_FOUND, "任务不存在"),
    }
}

async fn retry_task(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    match state.orchestrator.retry(&id) {
        Ok(info) => Json(RetryResponse {
            success: true,
            task_id: info.task_id,
            from_step: info.from_step,
        })
        .into_response(),
        Err(RetryError::NotFound) => error_response(StatusCode::NOT_FOUND, "任务不存在"),
        Err(e @ RetryError::Conflict(_)) => {
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
    }
}

/// Reuse the caller's task when one was named, otherwise create a fresh one.
fn resolve_task(
    state: &AppState,
    existing: Option<String>,
    kind: TaskKind,
    input: TaskInput,
) -> Result<String, Response> {
    match existing {
        Some(id) => {
            if state.store.get(&id).is_some() {
                Ok(id)
            } else {
                Err(error_response(StatusCode::NOT_FOUND, "任务不存在"))
            }
        }
        None => state
            .store
            .create(kind, input)
            .map_err(|e| error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())),
    }
}

/// Launch the run in the background and stream its progress frames as SSE,
/// closed by a `[DONE]` sentinel.
fn sse_run(state: Arc<AppState>, task_id: String) -> Response {
    let (tx, mut rx) = mpsc::channel::<ProgressEvent>(32);
    let emitter = ProgressEmitter::new(state.store.clone()).with_channel(tx);
    let orchestrator = state.orchestrator.clone();
    let id = task_id.clone();
    tokio::spawn(async move {
        let _ = orchestrator.run_task(&id, emitter).await;
    });

    let stream = async_stream::stream! {
        while let Some(event) = rx.recv().await {
            match Event::default().json_data(&event) {
                Ok(frame) => yield Ok::<Event, std::convert::Infallible>(frame),
                Err(e) => tracing::error!("progress frame serialization failed: {}", e),
            }
        }
        yield Ok(Event::default().data("[DONE]"));
    };
    Sse::new(stream).into_response()
}

/// Run the task to completion and answer with its output.
async fn run_blocking(state: &AppState, task_id: &str) -> Response {
    let emitter = ProgressEmitter::new(state.store.clone());
    match state.orchestrator.run_task(task_id, emitter).await {
        Ok(TaskOutput::Asset { asset }) => {
            Json(json!({"success": true, "taskId": task_id, "data": asset})).into_response()
        }
        Ok(TaskOutput::Report { report }) => {
            Json(json!({"success": true, "taskId": task_id, "data": report})).into_response()
        }
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

async fn generate_brand(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateRequest>,
) -> Response {
    if let Err(message) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, message);
    }
    let input = TaskInput::Generation {
        content: req.content.trim().to_string(),
    };
    let task_id = match resolve_task(&state, req.task_id, TaskKind::Generation, input) {
        Ok(id) => id,
        Err(response) => return response,
    };
    if req.stream {
        sse_run(state, task_id)
    } else {
        run_blocking(&state, &task_id).await
    }
}

async fn evaluate_brand(
    State(state): State<Arc<AppState>>,
    Json(req): Json<EvaluateRequest>,
) -> Response {
    if let Err(message) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, message);
    }
    let asset: BrandAsset = match serde_json::from_value(req.asset) {
        Ok(asset) => asset,
        Err(e) => {
            return error_response(StatusCode::BAD_REQUEST, format!("品牌资产解析失败: {e}"))
        }
    };
    let input = TaskInput::Evaluation {
        content: None,
        asset: Some(Box::new(asset)),
    };
    let task_id = match resolve_task(&state, req.task_id, TaskKind::Evaluation, input) {
        Ok(id) => id,
        Err(response) => return response,
    };
    if req.stream {
        sse_run(state, task_id)
    } else {
        run_blocking(&state, &task_id).await
    }
}

async fn search_web(Json(req): Json<WebSearchRequest>) -> Response {
    let Some(query) = req
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
    else {
        return error_response(StatusCode::BAD_REQUEST, "query 为必填项");
    };
    match tools::web_search(query).await {
        Ok(results) => Json(results).into_response(),
        Err(e) => error_response(StatusCode::BAD_GATEWAY, e.to_string()),
    }
}

async fn read_web(Json(req): Json<WebReaderRequest>) -> Response {
    let Some(url) = req.url.as_deref().map(str::trim).filter(|u| !u.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "url 为必填项");
    };
    match tools::fetch_url(url).await {
        Ok(page) => Json(page).into_response(),
        Err(e) => error_response(StatusCode::BAD_GATEWAY, e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_input_requires_content() {
        assert!(task_input_from(TaskKind::Generation, json!({})).is_err());
        assert!(task_input_from(TaskKind::Generation, json!({"content": "  "})).is_err());

        let input = task_input_from(
            TaskKind::Generation,
            json!({"content": " 一家咖啡店 "}),
        )
        .unwrap();
        let TaskInput::Generation { content } = input else {
            panic!("wrong input variant");
        };
        assert_eq!(content, "一家咖啡店");
    }

    #[test]
    fn test_generation_input_rejects_oversized_content() {
        let input = json!({"content": "字".repeat(10001)});
        assert!(task_input_from(TaskKind::Generation, input).is_err());
    }

    #[test]
    fn test_evaluation_input_accepts_content_or_asset() {
        assert!(task_input_from(TaskKind::Evaluation, json!({})).is_err());

        let from_content =
            task_input_from(TaskKind::Evaluation, json!({"content": "星辰咖啡"})).unwrap();
        assert!(matches!(
            from_content,
            TaskInput::Evaluation { content: Some(_), asset: None }
        ));

        let from_asset = task_input_from(
            TaskKind::Evaluation,
            json!({"asset": {"brand_name": "星辰咖啡"}}),
        )
        .unwrap();
        let TaskInput::Evaluation { asset: Some(asset), .. } = from_asset else {
            panic!("asset not parsed");
        };
        assert_eq!(asset.brand_name, "星辰咖啡");
    }

    #[test]
    fn test_evaluation_input_rejects_malformed_asset() {
        let input = json!({"asset": {"brand_assets": {"user_personas": {"personas": 3}}}});
        assert!(task_input_from(TaskKind::Evaluation, input).is_err());
    }
}
