//! BrandZ-style valuation: financial value, MDS brand contribution, and the
//! combined brand value with its grade.
//!
//! The keyword heuristics here (string-contains checks driving fixed point
//! swings) reproduce the arithmetic the valuation contract is pinned to.
//! TODO: revisit the heuristics once a scoring model replaces them; the
//! constants below are load-bearing for golden tests until then.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::brand::BrandAsset;

/// Top-level split between financial value and brand contribution.
pub const FINANCIAL_VALUE_WEIGHT: f64 = 0.4;
pub const BRAND_CONTRIBUTION_WEIGHT: f64 = 0.6;

/// Financial sub-score weights. The brand multiple is normalized onto the
/// 0-100 scale as `min(multiple * 20, 100)` before weighting.
pub const REVENUE_PERFORMANCE_WEIGHT: f64 = 0.5;
pub const ASSET_EFFICIENCY_WEIGHT: f64 = 0.3;
pub const BRAND_MULTIPLE_WEIGHT: f64 = 0.2;

/// Equal weights over the MDS sub-scores plus the externally supplied
/// consistency score.
pub const CONTRIBUTION_COMPONENT_WEIGHT: f64 = 0.25;

/// Divisor against which the brand multiple amplifies the base score.
const MULTIPLE_PIVOT: f64 = 2.5;

/// Financial heuristics output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancialScores {
    pub revenue_performance: f64,
    pub asset_efficiency: f64,
    pub brand_multiple: f64,
}

impl FinancialScores {
    /// Weighted financial value score on the 0-100 scale.
    pub fn combined(&self) -> f64 {
        self.revenue_performance * REVENUE_PERFORMANCE_WEIGHT
            + self.asset_efficiency * ASSET_EFFICIENCY_WEIGHT
            + (self.brand_multiple * 20.0).min(100.0) * BRAND_MULTIPLE_WEIGHT
    }
}

/// MDS (meaningful / different / salient) heuristics output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContributionScores {
    pub meaningful: f64,
    pub different: f64,
    pub salient: f64,
}

impl ContributionScores {
    /// Weighted brand contribution score, folding in the consistency score.
    pub fn combined(&self, consistency_score: f64) -> f64 {
        self.meaningful * CONTRIBUTION_COMPONENT_WEIGHT
            + self.different * CONTRIBUTION_COMPONENT_WEIGHT
            + self.salient * CONTRIBUTION_COMPONENT_WEIGHT
            + consistency_score * CONTRIBUTION_COMPONENT_WEIGHT
    }
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

/// Derive the financial sub-scores from the asset's positioning text.
///
/// Baselines are 70/70/2.0; each triggered keyword family nudges its
/// sub-score up, clamped to 100 (multiple clamped to [1.0, 5.0]).
pub fn financial_value(asset: &BrandAsset) -> FinancialScores {
    let positioning = &asset.brand_assets.brand_image.brand_positioning;
    let mission = &positioning.brand_mission.description;
    let value = &positioning.description;

    let mut revenue_performance: f64 = 70.0;
    let mut asset_efficiency: f64 = 70.0;
    let mut brand_multiple: f64 = 2.0;

    // 基于定位评估收益表现
    if contains_any(&positioning.description, &["领导", "领先"]) {
        revenue_performance += 20.0;
    }

    // 基于使命评估资产效率
    if contains_any(mission, &["专业", "品质"]) {
        asset_efficiency += 20.0;
    }

    // 基于价值主张评估品牌倍数
    if contains_any(value, &["独特", "创新"]) {
        brand_multiple += 0.5;
    }

    FinancialScores {
        revenue_performance: revenue_performance.min(100.0),
        asset_efficiency: asset_efficiency.min(100.0),
        brand_multiple: brand_multiple.clamp(1.0, 5.0),
    }
}

/// Derive the MDS sub-scores from the asset's positioning and expression.
///
/// Baseline 70 each, +20 per triggered signal, clamped to 100.
pub fn brand_contribution(asset: &BrandAsset) -> ContributionScores {
    let positioning = &asset.brand_assets.brand_image.brand_positioning;
    let expression = &asset.brand_assets.brand_image.brand_expression;

    let mut meaningful: f64 = 70.0;
    let mut different: f64 = 70.0;
    let mut salient: f64 = 70.0;

    // 有意义度
    if contains_any(&positioning.brand_mission.description, &["价值", "意义"]) {
        meaningful += 20.0;
    }

    // 差异化度
    if contains_any(&positioning.description, &["独特", "创新"]) {
        different += 20.0;
    }

    // 显著度
    if !expression.brand_slogan.slogan.is_empty() || !expression.tone.description.is_empty() {
        salient += 20.0;
    }

    ContributionScores {
        meaningful: meaningful.min(100.0),
        different: different.min(100.0),
        salient: salient.min(100.0),
    }
}

/// Combine financial value and brand contribution into the BrandZ value,
/// amplified by the brand multiple.
pub fn brandz_value(financial_value_score: f64, brand_contribution_score: f64, brand_multiple: f64) -> f64 {
    let base = financial_value_score * FINANCIAL_VALUE_WEIGHT
        + brand_contribution_score * BRAND_CONTRIBUTION_WEIGHT;
    base * (brand_multiple / MULTIPLE_PIVOT)
}

/// Brand grade from the BrandZ value. Boundaries are inclusive-lower.
pub fn brand_grade(value: f64) -> &'static str {
    if value >= 90.0 {
        "A"
    } else if value >= 80.0 {
        "B"
    } else if value >= 70.0 {
        "C"
    } else if value >= 60.0 {
        "D"
    } else {
        "E"
    }
}

/// Full BrandZ evaluation output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandZEvaluation {
    pub financial_value_score: f64,
    pub revenue_performance: f64,
    pub asset_efficiency: f64,
    pub brand_multiple: f64,
    pub brand_contribution_score: f64,
    pub meaningful_score: f64,
    pub different_score: f64,
    pub salient_score: f64,
    pub consistency_score: f64,
    pub brandz_value: f64,
    pub brand_grade: String,
    pub evaluation_details: serde_json::Value,
    pub improvement_suggestions: String,
}

/// Run the whole BrandZ pipeline over an asset plus the consistency score
/// produced by the consistency evaluation.
pub fn evaluate_brandz(asset: &BrandAsset, consistency_score: f64) -> BrandZEvaluation {
    let financial = financial_value(asset);
    let financial_value_score = financial.combined();

    let mds = brand_contribution(asset);
    let brand_contribution_score = mds.combined(consistency_score);

    let value = brandz_value(
        financial_value_score,
        brand_contribution_score,
        financial.brand_multiple,
    );
    let grade = brand_grade(value).to_string();

    let evaluation_details = json!({
        "financial_breakdown": financial,
        "mds_breakdown": mds,
        "brandz_calculation": {
            "financial_weight": FINANCIAL_VALUE_WEIGHT,
            "brand_contribution_weight": BRAND_CONTRIBUTION_WEIGHT,
            "final_score": value,
        },
    });

    let improvement_suggestions =
        improvement_suggestions(financial_value_score, brand_contribution_score, consistency_score);

    BrandZEvaluation {
        financial_value_score,
        revenue_performance: financial.revenue_performance,
        asset_efficiency: financial.asset_efficiency,
        brand_multiple: financial.brand_multiple,
        brand_contribution_score,
        meaningful_score: mds.meaningful,
        different_score: mds.different,
        salient_score: mds.salient,
        consistency_score,
        brandz_value: value,
        brand_grade: grade,
        evaluation_details,
        improvement_suggestions,
    }
}

fn improvement_suggestions(financial: f64, contribution: f64, consistency: f64) -> String {
    let mut suggestions = Vec::new();

    if financial < 70.0 {
        suggestions.push("提升财务表现，优化资源配置");
    }
    if contribution < 70.0 {
        suggestions.push("加强品牌建设，提升品牌影响力");
    }
    if consistency < 70.0 {
        suggestions.push("保持品牌表达一致性，强化品牌识别");
    }

    if suggestions.is_empty() {
        "建议继续优化品牌建设".to_string()
    } else {
        suggestions.join("；")
    }
}
