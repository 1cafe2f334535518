//! Pipeline orchestration: step tables, progress streaming, retry/resume.

mod orchestrator;
mod progress;

pub use orchestrator::{Orchestrator, RetryError, RetryInfo};
pub use progress::{ProgressEmitter, ProgressEvent};

use serde::{Deserialize, Serialize};

/// Sub-steps of the generation stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStep {
    BasicInfo,
    ParallelSections,
    Assemble,
    ValidateAndFill,
}

impl GenerationStep {
    pub const ALL: [GenerationStep; 4] = [
        GenerationStep::BasicInfo,
        GenerationStep::ParallelSections,
        GenerationStep::Assemble,
        GenerationStep::ValidateAndFill,
    ];

    /// One-based position within the stage.
    pub fn index(self) -> u32 {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0) as u32 + 1
    }

    pub fn label(self) -> &'static str {
        match self {
            GenerationStep::BasicInfo => "正在生成基本品牌信息...",
            GenerationStep::ParallelSections => "🚀 并行执行：品牌定位 & 表达 & 用户画像分析...",
            GenerationStep::Assemble => "正在组合品牌资产数据...",
            GenerationStep::ValidateAndFill => "正在验证和补全缺失字段...",
        }
    }
}

/// Sub-steps of the evaluation stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationStep {
    AnalyzeContent,
    ExtractMetrics,
    ScoreConsistency,
    ScoreBrandz,
    AssembleReport,
}

impl EvaluationStep {
    pub const ALL: [EvaluationStep; 5] = [
        EvaluationStep::AnalyzeContent,
        EvaluationStep::ExtractMetrics,
        EvaluationStep::ScoreConsistency,
        EvaluationStep::ScoreBrandz,
        EvaluationStep::AssembleReport,
    ];

    /// One-based position within the stage.
    pub fn index(self) -> u32 {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0) as u32 + 1
    }

    pub fn label(self) -> &'static str {
        match self {
            EvaluationStep::AnalyzeContent => "正在进行品牌内容分析...",
            EvaluationStep::ExtractMetrics => "正在提取一致性评分...",
            EvaluationStep::ScoreConsistency => "正在进行品牌一致性评估...",
            EvaluationStep::ScoreBrandz => "正在进行BrandZ价值评估...",
            EvaluationStep::AssembleReport => "正在生成综合报告...",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_indices_are_contiguous() {
        for (i, step) in GenerationStep::ALL.iter().enumerate() {
            assert_eq!(step.index(), i as u32 + 1);
        }
        for (i, step) in EvaluationStep::ALL.iter().enumerate() {
            assert_eq!(step.index(), i as u32 + 1);
        }
    }
}
