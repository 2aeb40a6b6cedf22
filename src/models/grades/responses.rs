use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::grades::entities::{GradeTier, LetterGrade};
use crate::models::submissions::entities::SubmissionStatus;

/// 成绩汇总
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeSummary {
    pub total_points: f64,
    pub earned_points: f64,
    pub average_grade: f64,
    pub completed_activities: usize,
    pub total_activities: usize,
}

/// 成绩单行状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub enum GradeRowStatus {
    Graded,
    Submitted,
    Returned,
    NotSubmitted,
}

impl From<SubmissionStatus> for GradeRowStatus {
    fn from(status: SubmissionStatus) -> Self {
        match status {
            SubmissionStatus::Submitted => GradeRowStatus::Submitted,
            SubmissionStatus::Graded => GradeRowStatus::Graded,
            SubmissionStatus::Returned => GradeRowStatus::Returned,
        }
    }
}

/// 成绩单的一行（每个活动一行）
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeRow {
    pub activity_id: i64,
    pub title: String,
    pub max_score: Option<f64>,
    pub submission_id: Option<i64>,
    pub score: Option<f64>,
    pub percentage: Option<f64>,
    pub letter: Option<LetterGrade>,
    pub tier: Option<GradeTier>,
    pub status: GradeRowStatus,
    pub feedback: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
}

/// 成绩单分栏
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub enum GradeTab {
    #[default]
    All,
    Graded,
    Pending,
    Missing,
}

impl GradeTab {
    pub fn matches(&self, status: GradeRowStatus) -> bool {
        match self {
            GradeTab::All => true,
            GradeTab::Graded => status == GradeRowStatus::Graded,
            GradeTab::Pending => status == GradeRowStatus::Submitted,
            GradeTab::Missing => status == GradeRowStatus::NotSubmitted,
        }
    }
}

impl std::str::FromStr for GradeTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(GradeTab::All),
            "graded" => Ok(GradeTab::Graded),
            "pending" => Ok(GradeTab::Pending),
            "missing" => Ok(GradeTab::Missing),
            _ => Err(format!("Invalid grade tab: {s}")),
        }
    }
}
