//! Comprehensive report assembly.
//!
//! Pure string formatting over the scoring outputs; the evaluation timestamp
//! is supplied by the caller so the assembly itself stays deterministic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::brandz::BrandZEvaluation;
use super::consistency::ConsistencyResult;
use crate::brand::BrandAsset;

const METHODOLOGY: &str = "Kantar BrandZ Model + Brand Consistency Analysis";

/// Narrative reports bundled with the numeric evaluations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReports {
    pub consistency_report: String,
    pub financial_report: String,
    pub mds_report: String,
}

/// One-look summary of the whole evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationSummary {
    pub consistency_grade: String,
    pub brandz_grade: String,
    pub overall_performance_summary: String,
}

/// Terminal artifact of the evaluation pipeline. Write-once, read-many.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComprehensiveReport {
    pub brand_name: String,
    pub evaluation_date: String,
    pub methodology: String,
    pub consistency_evaluation: ConsistencyResult,
    pub brandz_evaluation: BrandZEvaluation,
    pub analysis_reports: AnalysisReports,
    pub evaluation_summary: EvaluationSummary,
}

impl ComprehensiveReport {
    /// Assemble the terminal report from the stage outputs.
    pub fn assemble(
        asset: &BrandAsset,
        consistency: ConsistencyResult,
        brandz: BrandZEvaluation,
        evaluation_date: DateTime<Utc>,
    ) -> Self {
        let analysis_reports = AnalysisReports {
            consistency_report: consistency.analysis_report.clone(),
            financial_report: financial_report(&asset.brand_name, &brandz),
            mds_report: mds_report(&asset.brand_name, &brandz),
        };
        let evaluation_summary = EvaluationSummary {
            consistency_grade: consistency.grade.clone(),
            brandz_grade: brandz.brand_grade.clone(),
            overall_performance_summary: overall_summary(
                &asset.brand_name,
                &consistency,
                &brandz,
            ),
        };

        Self {
            brand_name: asset.brand_name.clone(),
            evaluation_date: evaluation_date.to_rfc3339(),
            methodology: METHODOLOGY.to_string(),
            consistency_evaluation: consistency,
            brandz_evaluation: brandz,
            analysis_reports,
            evaluation_summary,
        }
    }
}

fn rating(score: f64, excellent: f64, good: f64) -> &'static str {
    if score > excellent {
        "优秀"
    } else if score > good {
        "良好"
    } else {
        "需要改进"
    }
}

fn financial_report(brand_name: &str, result: &BrandZEvaluation) -> String {
    format!(
        "财务价值分析报告\n\n品牌名称: {brand_name}\n\n\
         1. 收益表现: {revenue}/100\n   - 评估: {revenue_rating}\n   - 建议: 提升市场竞争力，扩大市场份额\n\n\
         2. 资产效率: {efficiency}/100\n   - 评估: {efficiency_rating}\n   - 建议: 优化资源配置，提高运营效率\n\n\
         3. 品牌倍数: {multiple}\n   - 评估: {multiple_rating}\n   - 建议: 增强品牌影响力，提升品牌溢价能力\n\n\
         财务价值总分: {total:.1}/100\n",
        brand_name = brand_name,
        revenue = result.revenue_performance,
        revenue_rating = rating(result.revenue_performance, 80.0, 60.0),
        efficiency = result.asset_efficiency,
        efficiency_rating = rating(result.asset_efficiency, 80.0, 60.0),
        multiple = result.brand_multiple,
        multiple_rating = rating(result.brand_multiple, 3.0, 2.0),
        total = result.financial_value_score,
    )
}

fn mds_report(brand_name: &str, result: &BrandZEvaluation) -> String {
    format!(
        "品牌贡献分析报告 (MDS模型)\n\n品牌名称: {brand_name}\n\n\
         1. 有意义度 (Meaningful): {meaningful}/100\n   - 评估: {meaningful_rating}\n   - 建议: 强化品牌价值主张，提升品牌意义\n\n\
         2. 差异化度 (Different): {different}/100\n   - 评估: {different_rating}\n   - 建议: 突出品牌独特性，建立差异化优势\n\n\
         3. 显著度 (Salient): {salient}/100\n   - 评估: {salient_rating}\n   - 建议: 提升品牌知名度，增强品牌记忆点\n\n\
         4. 一致性 (Consistency): {consistency}/100\n   - 评估: {consistency_rating}\n   - 建议: 保持品牌表达一致性，强化品牌识别\n\n\
         品牌贡献总分: {total:.1}/100\n",
        brand_name = brand_name,
        meaningful = result.meaningful_score,
        meaningful_rating = rating(result.meaningful_score, 80.0, 60.0),
        different = result.different_score,
        different_rating = rating(result.different_score, 80.0, 60.0),
        salient = result.salient_score,
        salient_rating = rating(result.salient_score, 80.0, 60.0),
        consistency = result.consistency_score,
        consistency_rating = rating(result.consistency_score, 80.0, 60.0),
        total = result.brand_contribution_score,
    )
}

fn overall_summary(
    brand_name: &str,
    consistency: &ConsistencyResult,
    brandz: &BrandZEvaluation,
) -> String {
    let overall_score = (consistency.total_score + brandz.brandz_value) / 2.0;
    let overall_grade = super::brandz::brand_grade(overall_score);

    format!(
        "品牌综合评估总结\n\n品牌名称: {brand_name}\n\n\
         总体评分: {score:.1}/100\n品牌等级: {grade}\n\n\
         优势分析:\n- 品牌一致性: {consistency_rating}\n- 品牌价值: {value_rating}\n\n\
         改进建议:\n\
         1. 持续优化品牌定位与表达的一致性\n\
         2. 提升品牌在目标用户中的认知度和美誉度\n\
         3. 加强品牌差异化建设，突出核心竞争优势\n\
         4. 完善品牌传播体系，提升品牌影响力\n\n\
         发展前景: {outlook}\n",
        brand_name = brand_name,
        score = overall_score,
        grade = overall_grade,
        consistency_rating = if consistency.total_score > 70.0 { "良好" } else { "需要改进" },
        value_rating = if brandz.brandz_value > 70.0 { "良好" } else { "需要改进" },
        outlook = if overall_score > 70.0 { "良好" } else { "需要重点关注" },
    )
}
