//! Deterministic scoring engine.
//!
//! Everything in this module is pure: no I/O, no clocks except where a caller
//! passes a timestamp in, and identical inputs always produce identical
//! outputs. The valuation arithmetic is an auditable contract; the keyword
//! heuristics and weight constants are pinned by golden tests and must not be
//! changed without a product decision.

pub mod brandz;
pub mod consistency;
pub mod report;

pub use brandz::{
    brand_contribution, brand_grade, brandz_value, evaluate_brandz, financial_value,
    BrandZEvaluation, ContributionScores, FinancialScores,
};
pub use consistency::{
    consistency_grade, consistency_total, ConsistencyMetrics, ConsistencyResult, SwotAnalysis,
};
pub use report::{AnalysisReports, ComprehensiveReport, EvaluationSummary};
