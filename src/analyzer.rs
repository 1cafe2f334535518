//! Qualitative brand content analysis.
//!
//! Two completion calls: a narrative consistency analysis of the full asset,
//! then a structured extraction of the per-metric scores from that report.
//! A failed call is a stage failure; only individually missing or invalid
//! metric values fall back to the 5.0 midpoint, and the SWOT / summary
//! helpers fall back to fixed text.

use std::sync::Arc;

use serde_json::Value;

use crate::brand::BrandAsset;
use crate::llm::{LlmClient, LlmClientExt};
use crate::scoring::{ConsistencyMetrics, SwotAnalysis};

/// Output of the narrative analysis plus score extraction.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub report: String,
    pub metrics: ConsistencyMetrics,
}

/// Drives the completion service to produce consistency metrics for an asset.
pub struct ContentAnalyzer {
    llm: Arc<dyn LlmClient>,
}

impl ContentAnalyzer {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Narrative consistency analysis over the whole asset tree.
    pub async fn analysis_report(&self, asset: &BrandAsset) -> anyhow::Result<String> {
        let asset_json = serde_json::to_string_pretty(asset)?;
        let prompt = format!(
            "作为一名资深的品牌战略专家，请对品牌\"{brand_name}\"进行一次全面、深入、系统性的品牌一致性分析。\
             请严格基于以下提供的品牌数据，撰写一份详细的分析报告。\n\n\
             ### 品牌核心数据:\n```json\n{asset_json}\n```\n\n\
             ### 分析报告撰写要求:\n\
             请围绕\"品牌一致性\"这一核心，从以下七个维度展开详细论述，并直接引用上述JSON数据中的关键信息来支撑你的观点：\n\
             1. 品牌理念层一致性（使命、愿景、价值观是否清晰统一）\n\
             2. 品牌表达层一致性（口号、语言风格、调性是否统一）\n\
             3. 视觉识别系统一致性（色彩、字体、布局、符号是否遵循统一规范）\n\
             4. 语言风格系统一致性（各触点语言是否展现统一风格）\n\
             5. 品牌承诺与RTB一致性（承诺是否清晰，RTB能否支撑承诺）\n\
             6. 目标受众契合度（品牌表现是否与目标受众产生共鸣）\n\
             7. 品牌架构层级间协同性（理念、表达、视觉、语言、承诺是否互相协同）\n\n\
             请将你的分析整合成一份流畅、专业的报告。",
            brand_name = asset.brand_name,
        );
        self.llm
            .text("你是资深的品牌战略专家。", &prompt)
            .await
    }

    /// Extract the per-metric scores from a narrative report.
    ///
    /// The call must return a JSON object; individual metrics that are
    /// missing or non-numeric default to 5.0.
    pub async fn extract_metrics(&self, report: &str) -> anyhow::Result<ConsistencyMetrics> {
        let metric_list = serde_json::to_string_pretty(ConsistencyMetrics::METRIC_NAMES)?;
        let prompt = format!(
            "作为一名量化分析专家，请仔细阅读以下品牌一致性分析报告，并基于报告内容，为下列所有指标进行精确评分。\n\n\
             ### 品牌一致性分析报告:\n---\n{report}\n---\n\n\
             ### 评分要求:\n\
             1. 请对每一个指标给出 0-10 分的评分，支持一位小数。0分代表完全不一致或缺失，10分代表完美一致。\n\
             2. 评分必须严格依据上述报告的内容。\n\
             3. 必须为清单中的每一个指标都提供评分。\n\
             4. 请以一个JSON对象返回所有评分，key为指标名称，value为评分，不要添加任何额外的解释。\n\n\
             ### 待评分指标清单:\n```json\n{metric_list}\n```\n\n\
             请现在开始评分，并返回完整的JSON对象。"
        );
        let value = self.llm.json("你是量化分析专家。", &prompt).await?;
        metrics_from_value(value)
    }

    /// SWOT breakdown of the analysis report, with a fixed fallback when the
    /// completion call fails.
    pub async fn swot(&self, report: &str) -> SwotAnalysis {
        let prompt = format!(
            "基于以下品牌一致性分析报告，请生成SWOT分析：\n\n{report}\n\n\
             请从优势(Strengths)、劣势(Weaknesses)、机会(Opportunities)、威胁(Threats)四个维度进行分析，\
             以JSON格式返回，包含strengths、weaknesses、opportunities、threats四个字符串数组。"
        );

        match self.llm.json("你是品牌战略专家。", &prompt).await {
            Ok(value) => swot_from_value(value),
            Err(e) => {
                tracing::warn!("SWOT generation failed, using fallback: {}", e);
                default_swot()
            }
        }
    }

    /// Final summary paragraph, with a fixed fallback when the completion
    /// call fails.
    pub async fn final_summary(
        &self,
        total_score: f64,
        grade: &str,
        swot: &SwotAnalysis,
        report: &str,
    ) -> String {
        let truncated: String = report.chars().take(500).collect();
        let prompt = format!(
            "基于以下信息，生成品牌一致性评测的最终总结：\n\n\
             总分: {total_score}/100\n等级: {grade}\n\
             SWOT分析: {swot}\n分析报告: {truncated}...\n\n\
             请生成一个简洁、专业的总结，包含总体评价、主要优势、需要改进的地方和建议。",
            swot = serde_json::to_string(swot).unwrap_or_default(),
        );

        match self.llm.text("你是品牌战略专家。", &prompt).await {
            Ok(summary) => summary,
            Err(e) => {
                tracing::warn!("final summary generation failed, using fallback: {}", e);
                let rating = if total_score >= 80.0 {
                    "优秀"
                } else if total_score >= 60.0 {
                    "良好"
                } else {
                    "需要改进"
                };
                format!(
                    "品牌一致性评测总结\n\n总分: {total_score}/100\n等级: {grade}\n\n\
                     总体评价: 该品牌在一致性方面表现{rating}。\n\n\
                     建议:\n1. 制定统一的品牌视觉规范\n2. 建立完整的品牌语言体系\n\
                     3. 加强各层级间的协同配合\n4. 定期进行品牌一致性审查"
                )
            }
        }
    }
}

/// Build a metrics record from a scores object, clamping values into [0,10]
/// and substituting 5.0 for anything missing or non-numeric.
fn metrics_from_value(value: Value) -> anyhow::Result<ConsistencyMetrics> {
    let scores = value
        .as_object()
        .ok_or_else(|| anyhow::anyhow!("metric scores are not a JSON object"))?;

    let mut clean = serde_json::Map::new();
    for name in ConsistencyMetrics::METRIC_NAMES {
        match scores.get(*name).and_then(Value::as_f64) {
            Some(score) => {
                clean.insert(name.to_string(), Value::from(score.clamp(0.0, 10.0)));
            }
            None => {
                tracing::warn!(metric = name, "missing or invalid score, defaulting to 5.0");
                clean.insert(name.to_string(), Value::from(5.0));
            }
        }
    }

    Ok(serde_json::from_value(Value::Object(clean))?)
}

fn swot_from_value(value: Value) -> SwotAnalysis {
    let mut swot: SwotAnalysis = serde_json::from_value(value).unwrap_or_default();
    let defaults = default_swot();
    if swot.strengths.is_empty() {
        swot.strengths = defaults.strengths;
    }
    if swot.weaknesses.is_empty() {
        swot.weaknesses = defaults.weaknesses;
    }
    if swot.opportunities.is_empty() {
        swot.opportunities = defaults.opportunities;
    }
    if swot.threats.is_empty() {
        swot.threats = defaults.threats;
    }
    swot
}

fn default_swot() -> SwotAnalysis {
    SwotAnalysis {
        strengths: vec!["品牌理念清晰".to_string(), "表达风格统一".to_string()],
        weaknesses: vec![
            "需要加强视觉一致性".to_string(),
            "语言风格有待统一".to_string(),
        ],
        opportunities: vec![
            "可以进一步优化品牌表达".to_string(),
            "有机会提升用户体验".to_string(),
        ],
        threats: vec!["市场竞争激烈".to_string(), "消费者需求变化快".to_string()],
    }
}
