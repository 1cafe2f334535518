//! Request and response bodies for the HTTP surface.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::TaskKind;

/// Longest brand description accepted by the pipeline endpoints.
pub const MAX_CONTENT_CHARS: usize = 10000;

/// Body of `POST /tasks`. The input shape depends on the task type, so it
/// stays raw JSON until the type is known.
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(rename = "type")]
    pub kind: Option<TaskKind>,
    #[serde(default)]
    pub input: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCreatedResponse {
    pub success: bool,
    pub task_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryResponse {
    pub success: bool,
    pub task_id: String,
    pub from_step: &'static str,
}

/// Body of `POST /brand/generate`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub stream: bool,
    #[serde(default)]
    pub task_id: Option<String>,
}

/// Body of `POST /brand/evaluate`: a brand asset plus stream controls. The
/// asset fields arrive at the top level, so everything not recognized as a
/// control field is collected into `asset`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateRequest {
    #[serde(default)]
    pub stream: bool,
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(flatten)]
    pub asset: Value,
}

impl GenerateRequest {
    /// Empty or oversized content is rejected before any task is created.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.content.trim().is_empty() {
            return Err("品牌内容不能为空");
        }
        if self.content.chars().count() > MAX_CONTENT_CHARS {
            return Err("品牌内容过长，最多10000字符");
        }
        Ok(())
    }
}

impl EvaluateRequest {
    /// The asset must name the brand and carry the asset tree.
    pub fn validate(&self) -> Result<(), &'static str> {
        let has_name = self
            .asset
            .get("brand_name")
            .and_then(Value::as_str)
            .is_some_and(|s| !s.trim().is_empty());
        if !has_name {
            return Err("brand_name 为必填项");
        }
        if !self.asset.get("brand_assets").is_some_and(Value::is_object) {
            return Err("brand_assets 为必填项");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct WebSearchRequest {
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WebReaderRequest {
    #[serde(default)]
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_task_request_missing_type() {
        let req: CreateTaskRequest =
            serde_json::from_value(json!({"input": {"content": "x"}})).unwrap();
        assert!(req.kind.is_none());
    }

    #[test]
    fn test_create_task_request_parses_kind() {
        let req: CreateTaskRequest = serde_json::from_value(json!({
            "type": "evaluation",
            "input": {"content": "x"}
        }))
        .unwrap();
        assert_eq!(req.kind, Some(TaskKind::Evaluation));
    }

    #[test]
    fn test_generate_request_validation() {
        let ok: GenerateRequest =
            serde_json::from_value(json!({"content": "一家咖啡店"})).unwrap();
        assert!(ok.validate().is_ok());
        assert!(!ok.stream);

        let empty: GenerateRequest =
            serde_json::from_value(json!({"content": "   "})).unwrap();
        assert!(empty.validate().is_err());

        let long: GenerateRequest =
            serde_json::from_value(json!({"content": "字".repeat(10001)})).unwrap();
        assert!(long.validate().is_err());
    }

    #[test]
    fn test_evaluate_request_collects_asset_fields() {
        let req: EvaluateRequest = serde_json::from_value(json!({
            "brand_name": "星辰咖啡",
            "brand_assets": {"title": "品牌资产"},
            "stream": true,
            "taskId": "abc"
        }))
        .unwrap();
        assert!(req.stream);
        assert_eq!(req.task_id.as_deref(), Some("abc"));
        assert!(req.validate().is_ok());
        assert_eq!(req.asset["brand_name"], "星辰咖啡");
        assert!(req.asset.get("stream").is_none());
    }

    #[test]
    fn test_evaluate_request_requires_name_and_assets() {
        let missing_assets: EvaluateRequest =
            serde_json::from_value(json!({"brand_name": "星辰咖啡"})).unwrap();
        assert!(missing_assets.validate().is_err());

        let missing_name: EvaluateRequest =
            serde_json::from_value(json!({"brand_assets": {}})).unwrap();
        assert!(missing_name.validate().is_err());
    }
}
