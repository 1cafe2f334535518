use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde_json::json;

use crate::analyzer::ContentAnalyzer;
use crate::brand::BrandAsset;
use crate::generator::AssetGenerator;
use crate::llm::LlmClient;
use crate::pipeline::{EvaluationStep, GenerationStep, ProgressEmitter, ProgressEvent};
use crate::scoring::{
    consistency_grade, consistency_total, evaluate_brandz, ComprehensiveReport, ConsistencyResult,
};
use crate::store::{TaskInput, TaskKind, TaskOutput, TaskStatus, TaskStore};

const GENERATION_STEPS: u32 = GenerationStep::ALL.len() as u32;
const EVALUATION_STEPS: u32 = EvaluationStep::ALL.len() as u32;

/// Accepted retry request: which stage the rerun will start from.
#[derive(Debug, Clone)]
pub struct RetryInfo {
    pub task_id: String,
    pub from_step: &'static str,
}

#[derive(Debug, thiserror::Error)]
pub enum RetryError {
    #[error("任务不存在")]
    NotFound,
    #[error("{0}")]
    Conflict(&'static str),
}

/// Runs task pipelines against the store, emitting progress as it goes.
///
/// Stage outputs are checkpointed into the task record, so a rerun of a
/// failed evaluation task picks up after any stage that already finished.
#[derive(Clone)]
pub struct Orchestrator {
    store: TaskStore,
    generator: Arc<AssetGenerator>,
    analyzer: Arc<ContentAnalyzer>,
}

impl Orchestrator {
    pub fn new(store: TaskStore, llm: Arc<dyn LlmClient>) -> Self {
        Self {
            store,
            generator: Arc::new(AssetGenerator::new(llm.clone())),
            analyzer: Arc::new(ContentAnalyzer::new(llm)),
        }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Drive a stored task to a terminal state.
    ///
    /// Status, progress, checkpoints, and the final result or error are all
    /// persisted; the emitter carries the same sequence to any live stream.
    pub async fn run_task(&self, id: &str, emitter: ProgressEmitter) -> anyhow::Result<TaskOutput> {
        let task = self
            .store
            .get(id)
            .ok_or_else(|| anyhow::anyhow!("task {id} not found"))?;
        self.store.begin_run(id);
        let emitter = emitter.for_task(id);

        let outcome = match task.kind {
            TaskKind::Generation => self.run_generation_task(id, &task.input, &emitter).await,
            TaskKind::Evaluation => self.run_evaluation_task(id, &task, &emitter).await,
        };

        match outcome {
            Ok(output) => {
                self.store.set_result(id, output.clone());
                Ok(output)
            }
            Err(e) => {
                let message = e.to_string();
                tracing::error!(task_id = id, error = %message, "task failed");
                self.store.set_error(id, &message);
                let step = self
                    .store
                    .get(id)
                    .and_then(|t| t.progress)
                    .map(|p| (p.step, p.total_steps))
                    .unwrap_or((0, GENERATION_STEPS));
                emitter
                    .emit(ProgressEvent::failed(step.0, step.1, message))
                    .await;
                Err(e)
            }
        }
    }

    async fn run_generation_task(
        &self,
        id: &str,
        input: &TaskInput,
        emitter: &ProgressEmitter,
    ) -> anyhow::Result<TaskOutput> {
        let TaskInput::Generation { content } = input else {
            anyhow::bail!("task {id} carries evaluation input but is a generation task");
        };
        let asset = self
            .run_generation(content, emitter, 0, GENERATION_STEPS)
            .await?;
        emitter
            .emit(ProgressEvent::finished(
                GENERATION_STEPS,
                "✅ 品牌资产生成完成",
                serde_json::to_value(&asset)?,
            ))
            .await;
        Ok(TaskOutput::Asset {
            asset: Box::new(asset),
        })
    }

    async fn run_evaluation_task(
        &self,
        id: &str,
        task: &crate::store::Task,
        emitter: &ProgressEmitter,
    ) -> anyhow::Result<TaskOutput> {
        let TaskInput::Evaluation { content, asset } = &task.input else {
            anyhow::bail!("task {id} carries generation input but is an evaluation task");
        };

        // A checkpointed asset from an earlier run wins over re-generating.
        let ready_asset = task
            .artifacts
            .generated_asset
            .clone()
            .or_else(|| asset.clone());
        let needs_generation = ready_asset.is_none();
        let total = if needs_generation {
            GENERATION_STEPS + EVALUATION_STEPS
        } else {
            EVALUATION_STEPS
        };

        let asset = match ready_asset {
            Some(asset) => *asset,
            None => {
                let content = content
                    .as_deref()
                    .ok_or_else(|| anyhow::anyhow!("评测任务缺少品牌内容或品牌资产"))?;
                let generated = self.run_generation(content, emitter, 0, total).await?;
                self.store.set_generated_asset(id, generated.clone());
                generated
            }
        };

        let base = if needs_generation { GENERATION_STEPS } else { 0 };
        let report = self.run_evaluation(&asset, emitter, base, total).await?;
        emitter
            .emit(ProgressEvent::finished(
                total,
                "✅ 品牌评测完成",
                serde_json::to_value(&report)?,
            ))
            .await;
        Ok(TaskOutput::Report {
            report: Box::new(report),
        })
    }

    /// Generation stage. Step numbers are offset by `base` so the stage can
    /// run either standalone or as the front half of an evaluation.
    pub async fn run_generation(
        &self,
        content: &str,
        emitter: &ProgressEmitter,
        base: u32,
        total: u32,
    ) -> anyhow::Result<BrandAsset> {
        let step = |s: GenerationStep| base + s.index();

        emitter
            .emit(ProgressEvent::step(
                step(GenerationStep::BasicInfo),
                total,
                GenerationStep::BasicInfo.label(),
            ))
            .await;
        let basic = self.generator.basic_info(content).await?;
        emitter
            .emit(
                ProgressEvent::step(step(GenerationStep::BasicInfo), total, "✅ 基本品牌信息生成完成")
                    .with_data(serde_json::to_value(&basic)?),
            )
            .await;

        emitter
            .emit(ProgressEvent::step(
                step(GenerationStep::ParallelSections),
                total,
                GenerationStep::ParallelSections.label(),
            ))
            .await;
        let started = Instant::now();
        let (positioning, expression, personas) = tokio::try_join!(
            self.generator.positioning(content, &basic.brand_name),
            self.generator.expression(content, &basic.brand_name),
            self.generator.personas(content, &basic.brand_name),
        )?;
        emitter
            .emit(
                ProgressEvent::step(
                    step(GenerationStep::ParallelSections),
                    total,
                    "✅ 品牌定位、表达、用户画像分析完成",
                )
                .with_timing(started.elapsed().as_secs_f64()),
            )
            .await;

        emitter
            .emit(ProgressEvent::step(
                step(GenerationStep::Assemble),
                total,
                GenerationStep::Assemble.label(),
            ))
            .await;
        let assembled = self
            .generator
            .assemble(&basic, positioning, expression, personas);

        emitter
            .emit(ProgressEvent::step(
                step(GenerationStep::ValidateAndFill),
                total,
                GenerationStep::ValidateAndFill.label(),
            ))
            .await;
        let asset = self.generator.validate_and_fill(assembled, content).await;
        tracing::info!(brand_name = %asset.brand_name, "brand asset generated");
        Ok(asset)
    }

    /// Evaluation stage over a complete asset.
    pub async fn run_evaluation(
        &self,
        asset: &BrandAsset,
        emitter: &ProgressEmitter,
        base: u32,
        total: u32,
    ) -> anyhow::Result<ComprehensiveReport> {
        let step = |s: EvaluationStep| base + s.index();

        emitter
            .emit(ProgressEvent::step(
                step(EvaluationStep::AnalyzeContent),
                total,
                EvaluationStep::AnalyzeContent.label(),
            ))
            .await;
        let narrative = self.analyzer.analysis_report(asset).await?;

        emitter
            .emit(ProgressEvent::step(
                step(EvaluationStep::ExtractMetrics),
                total,
                EvaluationStep::ExtractMetrics.label(),
            ))
            .await;
        let metrics = self.analyzer.extract_metrics(&narrative).await?;

        emitter
            .emit(ProgressEvent::step(
                step(EvaluationStep::ScoreConsistency),
                total,
                EvaluationStep::ScoreConsistency.label(),
            ))
            .await;
        let total_score = consistency_total(&metrics);
        let grade = consistency_grade(total_score);
        let swot = self.analyzer.swot(&narrative).await;
        let summary = self
            .analyzer
            .final_summary(total_score, grade, &swot, &narrative)
            .await;
        let consistency = ConsistencyResult::new(metrics, narrative, swot, summary);
        emitter
            .emit(
                ProgressEvent::step(
                    step(EvaluationStep::ScoreConsistency),
                    total,
                    "✅ 品牌一致性评估完成",
                )
                .with_data(json!({
                    "totalScore": consistency.total_score,
                    "grade": consistency.grade,
                })),
            )
            .await;

        emitter
            .emit(ProgressEvent::step(
                step(EvaluationStep::ScoreBrandz),
                total,
                EvaluationStep::ScoreBrandz.label(),
            ))
            .await;
        let brandz = evaluate_brandz(asset, consistency.total_score);
        emitter
            .emit(
                ProgressEvent::step(
                    step(EvaluationStep::ScoreBrandz),
                    total,
                    "✅ BrandZ价值评估完成",
                )
                .with_data(json!({
                    "brandzValue": brandz.brandz_value,
                    "brandGrade": brandz.brand_grade,
                })),
            )
            .await;

        emitter
            .emit(ProgressEvent::step(
                step(EvaluationStep::AssembleReport),
                total,
                EvaluationStep::AssembleReport.label(),
            ))
            .await;
        let report = ComprehensiveReport::assemble(asset, consistency, brandz, Utc::now());
        tracing::info!(
            brand_name = %report.brand_name,
            consistency_grade = %report.evaluation_summary.consistency_grade,
            brandz_grade = %report.evaluation_summary.brandz_grade,
            "brand evaluation assembled"
        );
        Ok(report)
    }

    /// Validate a retry request and, when accepted, relaunch the task in the
    /// background. Rejected requests leave the task record untouched.
    pub fn retry(&self, id: &str) -> Result<RetryInfo, RetryError> {
        let task = self.store.get(id).ok_or(RetryError::NotFound)?;
        match task.status {
            TaskStatus::InProgress => {
                return Err(RetryError::Conflict("任务正在进行中，无法重试"))
            }
            TaskStatus::Completed => return Err(RetryError::Conflict("任务已完成，无需重试")),
            TaskStatus::Pending | TaskStatus::Failed => {}
        }

        let from_step = if matches!(task.kind, TaskKind::Evaluation)
            && task.artifacts.generated_asset.is_some()
        {
            "evaluation"
        } else {
            "generation"
        };

        // Flip to in_progress before returning so a second retry request
        // observes the conflict.
        self.store.begin_run(id);
        let orchestrator = self.clone();
        let task_id = id.to_string();
        tokio::spawn(async move {
            let emitter = ProgressEmitter::new(orchestrator.store.clone());
            let _ = orchestrator.run_task(&task_id, emitter).await;
        });

        Ok(RetryInfo {
            task_id: id.to_string(),
            from_step,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ChatMessage, ChatOptions};
    use crate::scoring::ConsistencyMetrics;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::mpsc;

    fn positioning_json() -> serde_json::Value {
        json!({
            "title": "品牌定位",
            "description": "面向都市青年的精品咖啡品牌",
            "we_believe": {"title": "我们相信", "points": ["好咖啡值得等待", "品质源于专注"]},
            "we_oppose": {"title": "我们反对", "points": ["工业化速成", "千篇一律"]},
            "brand_mission": {"title": "品牌使命", "description": "把手冲咖啡带进日常生活"},
            "why_choose_us": {"title": "为什么选择我们", "reason": "专业烘焙", "statement": "每一杯都独特", "additional_info": ""}
        })
    }

    fn expression_json() -> serde_json::Value {
        json!({
            "title": "品牌表达",
            "description": "温暖而专业的表达体系",
            "language_style": {"title": "语言风格", "options": ["温暖", "专业", "真诚"]},
            "brand_slogan": {"title": "品牌口号", "slogan": "每一杯都是星辰"},
            "color_style": {
                "title": "色彩风格",
                "description": "深棕与暖金的组合",
                "palettes": [{"name": "主色调", "primary_color": "#4a2c2a", "secondary_color": "#c9a66b", "background_color": "#faf6f0", "secondary_background_color": "#f0e6d8"}]
            },
            "tone": {"title": "品牌调性", "description": "沉稳专注，独特而有温度"},
            "icon": {"placeholder": ""},
            "font_layout": {"placeholder": ""},
            "web_link": {"url": ""}
        })
    }

    fn personas_json() -> serde_json::Value {
        json!({
            "title": "用户画像",
            "description": "核心客群",
            "personas": [{
                "id": "persona_1",
                "title": "用户画像1",
                "avatar": "",
                "name": "小林",
                "age_gender": "28岁 女",
                "percentage_in_group": "45%",
                "description": "注重生活品质的上班族",
                "pain_points": ["连锁咖啡同质化", "品质不稳定"],
                "user_characteristics": [{"keyword": "品质敏感", "percentage": 80}],
                "user_scenarios": ["工作日早晨", "周末下午"]
            }]
        })
    }

    fn metrics_json() -> serde_json::Value {
        let mut scores = serde_json::Map::new();
        for name in ConsistencyMetrics::METRIC_NAMES {
            scores.insert(name.to_string(), json!(8.0));
        }
        serde_json::Value::Object(scores)
    }

    /// Answers every pipeline prompt with plausible content.
    struct ScriptedLlm;

    fn scripted_reply(prompt: &str) -> String {
        if prompt.contains("待评分指标清单") {
            metrics_json().to_string()
        } else if prompt.contains("最终总结") {
            "星辰咖啡整体一致性表现优秀，建议继续保持。".to_string()
        } else if prompt.contains("SWOT") {
            json!({
                "strengths": ["理念清晰"],
                "weaknesses": ["视觉待统一"],
                "opportunities": ["精品咖啡市场增长"],
                "threats": ["竞争激烈"]
            })
            .to_string()
        } else if prompt.contains("品牌一致性分析") {
            "星辰咖啡的品牌理念、表达与视觉体系整体高度一致。".to_string()
        } else if prompt.contains("提取基本信息") {
            json!({"brand_name": "星辰咖啡", "brand_description": "主打手冲精品咖啡的连锁品牌"})
                .to_string()
        } else if prompt.contains("品牌定位信息") {
            positioning_json().to_string()
        } else if prompt.contains("品牌表达信息") {
            expression_json().to_string()
        } else if prompt.contains("用户画像信息") {
            personas_json().to_string()
        } else if prompt.contains("缺失的字段") {
            json!({"value": "补全内容"}).to_string()
        } else {
            "好的。".to_string()
        }
    }

    #[async_trait]
    impl LlmClient for ScriptedLlm {
        async fn complete(
            &self,
            messages: &[ChatMessage],
            _options: ChatOptions,
        ) -> anyhow::Result<String> {
            let prompt = messages.last().map(|m| m.content.as_str()).unwrap_or("");
            Ok(scripted_reply(prompt))
        }
    }

    /// Fails the first `failures` completions, then behaves like ScriptedLlm.
    struct FlakyLlm {
        failures: usize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LlmClient for FlakyLlm {
        async fn complete(
            &self,
            messages: &[ChatMessage],
            _options: ChatOptions,
        ) -> anyhow::Result<String> {
            if self.calls.fetch_add(1, Ordering::SeqCst) < self.failures {
                anyhow::bail!("completion service unreachable");
            }
            let prompt = messages.last().map(|m| m.content.as_str()).unwrap_or("");
            Ok(scripted_reply(prompt))
        }
    }

    fn orchestrator_with(llm: Arc<dyn LlmClient>) -> (Orchestrator, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStore::open(dir.path().join("tasks.json")).unwrap();
        (Orchestrator::new(store, llm), dir)
    }

    fn preset_asset() -> BrandAsset {
        let asset: BrandAsset = serde_json::from_value(json!({
            "brand_name": "星辰咖啡",
            "brand_assets": {
                "title": "品牌资产",
                "description": "主打手冲精品咖啡的连锁品牌",
                "brand_image": {
                    "title": "品牌形象",
                    "description": "品牌形象描述",
                    "brand_positioning": positioning_json(),
                    "brand_expression": expression_json()
                },
                "user_personas": personas_json()
            }
        }))
        .unwrap();
        asset
    }

    #[tokio::test]
    async fn test_generation_task_completes_with_monotonic_progress() {
        let (orchestrator, _dir) = orchestrator_with(Arc::new(ScriptedLlm));
        let id = orchestrator
            .store()
            .create(
                TaskKind::Generation,
                TaskInput::Generation {
                    content: "一家主打手冲精品咖啡的连锁品牌，名为星辰咖啡。".into(),
                },
            )
            .unwrap();

        let (tx, mut rx) = mpsc::channel(64);
        let emitter = ProgressEmitter::new(orchestrator.store().clone()).with_channel(tx);
        let output = orchestrator.run_task(&id, emitter).await.unwrap();

        let TaskOutput::Asset { asset } = output else {
            panic!("generation task must yield an asset");
        };
        assert_eq!(asset.brand_name, "星辰咖啡");

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        assert!(!events.is_empty());
        let mut last_step = 0;
        for event in &events {
            assert!(event.step >= last_step, "progress went backwards");
            assert_eq!(event.total_steps, 4);
            last_step = event.step;
        }
        let terminal = events.last().unwrap();
        assert_eq!(terminal.step, 4);
        assert_eq!(terminal.completed, Some(true));
        assert!(terminal.error.is_none());
        assert!(terminal.data.is_some());

        let task = orchestrator.store().get(&id).unwrap();
        assert_eq!(task.status, TaskStatus::Completed);
        assert!(task.result.is_some());
        assert!(task.error.is_none());
    }

    #[tokio::test]
    async fn test_evaluation_from_content_runs_both_stages() {
        let (orchestrator, _dir) = orchestrator_with(Arc::new(ScriptedLlm));
        let id = orchestrator
            .store()
            .create(
                TaskKind::Evaluation,
                TaskInput::Evaluation {
                    content: Some("一家主打手冲精品咖啡的连锁品牌，名为星辰咖啡。".into()),
                    asset: None,
                },
            )
            .unwrap();

        let (tx, mut rx) = mpsc::channel(64);
        let emitter = ProgressEmitter::new(orchestrator.store().clone()).with_channel(tx);
        let output = orchestrator.run_task(&id, emitter).await.unwrap();

        let TaskOutput::Report { report } = output else {
            panic!("evaluation task must yield a report");
        };
        assert_eq!(report.brand_name, "星辰咖啡");
        assert!(["A+", "A", "B+", "B", "C+", "C", "D"]
            .contains(&report.evaluation_summary.consistency_grade.as_str()));
        assert!(["A", "B", "C", "D", "E"]
            .contains(&report.evaluation_summary.brandz_grade.as_str()));

        let mut last_event = None;
        while let Ok(event) = rx.try_recv() {
            assert_eq!(event.total_steps, 9);
            last_event = Some(event);
        }
        let terminal = last_event.unwrap();
        assert_eq!(terminal.step, 9);
        assert_eq!(terminal.completed, Some(true));

        // The generated asset is checkpointed for future retries.
        let task = orchestrator.store().get(&id).unwrap();
        assert!(task.artifacts.generated_asset.is_some());
    }

    #[tokio::test]
    async fn test_evaluation_with_preset_asset_skips_generation() {
        let (orchestrator, _dir) = orchestrator_with(Arc::new(ScriptedLlm));
        let id = orchestrator
            .store()
            .create(
                TaskKind::Evaluation,
                TaskInput::Evaluation {
                    content: None,
                    asset: Some(Box::new(preset_asset())),
                },
            )
            .unwrap();

        let (tx, mut rx) = mpsc::channel(64);
        let emitter = ProgressEmitter::new(orchestrator.store().clone()).with_channel(tx);
        let output = orchestrator.run_task(&id, emitter).await.unwrap();

        let TaskOutput::Report { report } = output else {
            panic!("evaluation task must yield a report");
        };
        assert!(report
            .evaluation_summary
            .overall_performance_summary
            .contains("星辰咖啡"));

        while let Ok(event) = rx.try_recv() {
            assert_eq!(event.total_steps, 5);
        }
    }

    #[tokio::test]
    async fn test_evaluation_without_content_or_asset_fails() {
        let (orchestrator, _dir) = orchestrator_with(Arc::new(ScriptedLlm));
        let id = orchestrator
            .store()
            .create(
                TaskKind::Evaluation,
                TaskInput::Evaluation {
                    content: None,
                    asset: None,
                },
            )
            .unwrap();

        let emitter = ProgressEmitter::new(orchestrator.store().clone());
        assert!(orchestrator.run_task(&id, emitter).await.is_err());

        let task = orchestrator.store().get(&id).unwrap();
        assert_eq!(task.status, TaskStatus::Failed);
        assert!(task.error.is_some());
        assert!(task.result.is_none());
    }

    #[tokio::test]
    async fn test_retry_rejects_in_progress_and_completed() {
        let (orchestrator, _dir) = orchestrator_with(Arc::new(ScriptedLlm));
        let id = orchestrator
            .store()
            .create(
                TaskKind::Generation,
                TaskInput::Generation { content: "x".into() },
            )
            .unwrap();

        orchestrator.store().begin_run(&id);
        let before = orchestrator.store().get(&id).unwrap().updated_at;
        assert!(matches!(
            orchestrator.retry(&id),
            Err(RetryError::Conflict(_))
        ));
        assert_eq!(orchestrator.store().get(&id).unwrap().updated_at, before);

        orchestrator.store().set_result(
            &id,
            TaskOutput::Asset {
                asset: Box::new(preset_asset()),
            },
        );
        assert!(matches!(
            orchestrator.retry(&id),
            Err(RetryError::Conflict(_))
        ));

        assert!(matches!(
            orchestrator.retry("no-such-task"),
            Err(RetryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_failed_task_retries_to_completion() {
        // First completion call fails, so the initial run dies in step 1.
        let llm = Arc::new(FlakyLlm {
            failures: 1,
            calls: AtomicUsize::new(0),
        });
        let (orchestrator, _dir) = orchestrator_with(llm);
        let id = orchestrator
            .store()
            .create(
                TaskKind::Generation,
                TaskInput::Generation {
                    content: "一家主打手冲精品咖啡的连锁品牌，名为星辰咖啡。".into(),
                },
            )
            .unwrap();

        let emitter = ProgressEmitter::new(orchestrator.store().clone());
        assert!(orchestrator.run_task(&id, emitter).await.is_err());
        assert_eq!(
            orchestrator.store().get(&id).unwrap().status,
            TaskStatus::Failed
        );

        let info = orchestrator.retry(&id).unwrap();
        assert_eq!(info.from_step, "generation");

        let mut task = orchestrator.store().get(&id).unwrap();
        for _ in 0..200 {
            if task.status == TaskStatus::Completed {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            task = orchestrator.store().get(&id).unwrap();
        }
        assert_eq!(task.status, TaskStatus::Completed);
        assert!(task.error.is_none());
        assert!(task.result.is_some());
    }

    #[tokio::test]
    async fn test_retry_resumes_evaluation_from_checkpoint() {
        let (orchestrator, _dir) = orchestrator_with(Arc::new(ScriptedLlm));
        let id = orchestrator
            .store()
            .create(
                TaskKind::Evaluation,
                TaskInput::Evaluation {
                    content: Some("星辰咖啡".into()),
                    asset: None,
                },
            )
            .unwrap();
        orchestrator.store().set_generated_asset(&id, preset_asset());
        orchestrator.store().set_error(&id, "先前运行失败");

        let info = orchestrator.retry(&id).unwrap();
        assert_eq!(info.from_step, "evaluation");

        let mut task = orchestrator.store().get(&id).unwrap();
        for _ in 0..200 {
            if task.status == TaskStatus::Completed {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            task = orchestrator.store().get(&id).unwrap();
        }
        assert_eq!(task.status, TaskStatus::Completed);
        assert!(matches!(task.result, Some(TaskOutput::Report { .. })));
        // A resumed run covers only the evaluation stage.
        assert_eq!(task.progress.unwrap().total_steps, 5);
    }
}
