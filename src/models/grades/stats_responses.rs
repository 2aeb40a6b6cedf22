use serde::Serialize;
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::models::activities::entities::ActivityType;

/// 活动提交统计
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct ActivityStats {
    pub activity_id: i64,
    // 全部提交记录数（含历史尝试）
    pub total_attempts: usize,
    // 以下按每个学生的当前提交统计
    pub submitted_students: usize,
    pub graded_count: usize,
    pub pending_count: usize,
    pub returned_count: usize,
    pub late_count: usize,
    pub score_stats: Option<ScoreStats>,
    pub score_distribution: Vec<ScoreRange>,
}

/// 分数统计
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct ScoreStats {
    pub average: f64,
    pub max: f64,
    pub min: f64,
}

/// 分数区间
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct ScoreRange {
    pub range: String,
    pub count: usize,
}

/// 学生在某课程中的进度
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct StudentProgress {
    pub student_id: i64,
    pub total_activities: usize,
    pub submitted_activities: usize,
    pub graded_activities: usize,
    pub average_percentage: Option<f64>,
}

/// 教师待评分工作量
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradingWorkload {
    pub pending_grading: usize,
    pub pending_by_type: BTreeMap<ActivityType, usize>,
    // 24 小时内截止且仍有待评分提交的活动
    pub urgent_activity_ids: Vec<i64>,
}
