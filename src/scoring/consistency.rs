//! Brand consistency metrics and weighted total.
//!
//! 55 named sub-scores in [0,10], grouped into 8 categories. Each category
//! carries a weight table; the tables sum to exactly 1.0 in aggregate, so a
//! uniform metric value of 10.0 maps onto a total of 100. Not every metric is
//! weighted: the analyzer scores the full grid, the total only consumes the
//! weighted subset.

use serde::{Deserialize, Serialize};

fn default_metric_score() -> f64 {
    5.0
}

macro_rules! consistency_metrics {
    ($($field:ident),* $(,)?) => {
        /// Fixed-shape record of per-metric consistency scores, each in [0,10].
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        pub struct ConsistencyMetrics {
            $(
                #[serde(default = "default_metric_score")]
                pub $field: f64,
            )*
        }

        impl ConsistencyMetrics {
            /// Every metric name, in declaration order.
            pub const METRIC_NAMES: &'static [&'static str] = &[$(stringify!($field)),*];

            /// Look up a metric by name.
            pub fn get(&self, name: &str) -> Option<f64> {
                match name {
                    $(stringify!($field) => Some(self.$field),)*
                    _ => None,
                }
            }

            /// A record where every metric has the same value.
            pub fn uniform(value: f64) -> Self {
                Self { $($field: value,)* }
            }

            /// Clamp every metric into the valid [0,10] range.
            pub fn clamp_scores(&mut self) {
                $(self.$field = self.$field.clamp(0.0, 10.0);)*
            }
        }

        impl Default for ConsistencyMetrics {
            fn default() -> Self {
                Self::uniform(default_metric_score())
            }
        }
    };
}

consistency_metrics! {
    // 品牌理念层面
    mission_clarity,
    mission_consistency,
    vision_clarity,
    vision_appeal,
    values_clarity,
    values_authenticity,
    // 品牌表达层面
    style_consistency,
    tone_appropriateness,
    keyword_recognition,
    scenario_adaptation,
    // 视觉识别层面
    color_consistency,
    typography_consistency,
    layout_consistency,
    symbol_recognition,
    visual_appeal,
    // 语言风格层面
    language_consistency,
    language_appropriateness,
    slogan_memorability,
    message_clarity,
    // 品牌承诺层面
    promise_clarity,
    promise_credibility,
    benefit_clarity,
    experience_coherence,
    // RTB层面
    rtb_clarity,
    rtb_uniqueness,
    rtb_credibility,
    // 目标受众契合度
    philosophy_ta_alignment,
    values_ta_resonance,
    vision_ta_appeal,
    // 层级间契合度
    philosophy_expression_alignment,
    values_tone_consistency,
    mission_keyword_alignment,
    philosophy_visual_alignment,
    values_color_symbolism,
    vision_design_harmony,
    philosophy_language_alignment,
    values_slogan_consistency,
    mission_message_clarity,
    expression_visual_harmony,
    tone_visual_consistency,
    style_symbol_alignment,
    expression_language_coherence,
    tone_language_matching,
    style_message_consistency,
    visual_language_integration,
    color_language_emotion,
    symbol_slogan_synergy,
    promise_philosophy_alignment,
    promise_expression_consistency,
    promise_visual_support,
    promise_language_clarity,
    rtb_philosophy_foundation,
    rtb_expression_reinforcement,
    rtb_visual_evidence,
    rtb_language_persuasion,
}

/// Category weight tables. Aggregate sum is exactly 1.0.
pub const CATEGORY_WEIGHTS: &[(&str, &[(&str, f64)])] = &[
    // 品牌理念 (20%)
    (
        "brand_philosophy",
        &[
            ("mission_clarity", 0.03),
            ("mission_consistency", 0.03),
            ("vision_clarity", 0.03),
            ("vision_appeal", 0.03),
            ("values_clarity", 0.04),
            ("values_authenticity", 0.04),
        ],
    ),
    // 品牌表达 (15%)
    (
        "brand_expression",
        &[
            ("style_consistency", 0.04),
            ("tone_appropriateness", 0.04),
            ("keyword_recognition", 0.035),
            ("scenario_adaptation", 0.035),
        ],
    ),
    // 视觉识别 (15%)
    (
        "visual_identity",
        &[
            ("color_consistency", 0.03),
            ("typography_consistency", 0.03),
            ("layout_consistency", 0.03),
            ("symbol_recognition", 0.03),
            ("visual_appeal", 0.03),
        ],
    ),
    // 语言风格 (10%)
    (
        "language_style",
        &[
            ("language_consistency", 0.025),
            ("language_appropriateness", 0.025),
            ("slogan_memorability", 0.025),
            ("message_clarity", 0.025),
        ],
    ),
    // 品牌承诺 (10%)
    (
        "brand_promise",
        &[
            ("promise_clarity", 0.025),
            ("promise_credibility", 0.025),
            ("benefit_clarity", 0.025),
            ("experience_coherence", 0.025),
        ],
    ),
    // RTB (5%)
    (
        "rtb",
        &[
            ("rtb_clarity", 0.02),
            ("rtb_uniqueness", 0.015),
            ("rtb_credibility", 0.015),
        ],
    ),
    // 目标受众契合度 (10%)
    (
        "ta_alignment",
        &[
            ("philosophy_ta_alignment", 0.04),
            ("values_ta_resonance", 0.03),
            ("vision_ta_appeal", 0.03),
        ],
    ),
    // 层级间契合度 (15%)
    (
        "hierarchy_alignment",
        &[
            ("philosophy_expression_alignment", 0.015),
            ("philosophy_visual_alignment", 0.015),
            ("philosophy_language_alignment", 0.015),
            ("expression_visual_harmony", 0.015),
            ("expression_language_coherence", 0.015),
            ("visual_language_integration", 0.015),
            ("promise_philosophy_alignment", 0.01),
            ("promise_expression_consistency", 0.01),
            ("promise_visual_support", 0.01),
            ("rtb_expression_reinforcement", 0.01),
            ("rtb_visual_evidence", 0.01),
            ("values_tone_consistency", 0.0025),
            ("values_slogan_consistency", 0.0025),
            ("tone_language_matching", 0.0025),
            ("symbol_slogan_synergy", 0.0025),
        ],
    ),
];

/// Weighted total over the metric grid, scaled from the [0,10] metric range
/// onto [0,100] and rounded to the nearest integer score.
pub fn consistency_total(metrics: &ConsistencyMetrics) -> f64 {
    let mut total = 0.0;
    for (_, table) in CATEGORY_WEIGHTS {
        for (name, weight) in *table {
            let score = metrics.get(name).unwrap_or(0.0);
            total += score * weight;
        }
    }
    (total * 10.0).round()
}

/// Consistency grade. Boundaries are inclusive-lower.
pub fn consistency_grade(score: f64) -> &'static str {
    if score >= 90.0 {
        "A+"
    } else if score >= 80.0 {
        "A"
    } else if score >= 70.0 {
        "B+"
    } else if score >= 60.0 {
        "B"
    } else if score >= 50.0 {
        "C+"
    } else if score >= 40.0 {
        "C"
    } else {
        "D"
    }
}

/// SWOT breakdown attached to a consistency evaluation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwotAnalysis {
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub opportunities: Vec<String>,
    #[serde(default)]
    pub threats: Vec<String>,
}

/// Full consistency evaluation: the deterministic score plus the narrative
/// material produced by the analyzer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsistencyResult {
    pub total_score: f64,
    pub grade: String,
    pub metrics: ConsistencyMetrics,
    pub analysis_report: String,
    pub swot_analysis: SwotAnalysis,
    pub final_summary: String,
}

impl ConsistencyResult {
    /// Score the metric grid and bundle it with the narrative material.
    pub fn new(
        metrics: ConsistencyMetrics,
        analysis_report: String,
        swot_analysis: SwotAnalysis,
        final_summary: String,
    ) -> Self {
        let total_score = consistency_total(&metrics);
        let grade = consistency_grade(total_score).to_string();
        Self {
            total_score,
            grade,
            metrics,
            analysis_report,
            swot_analysis,
            final_summary,
        }
    }
}
