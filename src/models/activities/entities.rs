use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::common::{nullable, timestamps};
use crate::models::submissions::entities::Submission;

// 活动类型
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "../frontend/src/types/generated/activity.ts")]
pub enum ActivityType {
    Assignment,   // 作业
    Quiz,         // 测验
    Announcement, // 公告，不可提交
    Practice,     // 练习
    Discussion,   // 讨论
    Survey,       // 问卷
}

impl ActivityType {
    pub const ASSIGNMENT: &'static str = "ASSIGNMENT";
    pub const QUIZ: &'static str = "QUIZ";
    pub const ANNOUNCEMENT: &'static str = "ANNOUNCEMENT";
    pub const PRACTICE: &'static str = "PRACTICE";
    pub const DISCUSSION: &'static str = "DISCUSSION";
    pub const SURVEY: &'static str = "SURVEY";

    pub fn all() -> &'static [ActivityType] {
        &[
            Self::Assignment,
            Self::Quiz,
            Self::Announcement,
            Self::Practice,
            Self::Discussion,
            Self::Survey,
        ]
    }

    /// 是否接受学生提交
    pub fn accepts_submissions(&self) -> bool {
        !matches!(self, ActivityType::Announcement)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Assignment => Self::ASSIGNMENT,
            ActivityType::Quiz => Self::QUIZ,
            ActivityType::Announcement => Self::ANNOUNCEMENT,
            ActivityType::Practice => Self::PRACTICE,
            ActivityType::Discussion => Self::DISCUSSION,
            ActivityType::Survey => Self::SURVEY,
        }
    }
}

impl<'de> Deserialize<'de> for ActivityType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ActivityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            Self::ASSIGNMENT => Ok(ActivityType::Assignment),
            Self::QUIZ => Ok(ActivityType::Quiz),
            Self::ANNOUNCEMENT => Ok(ActivityType::Announcement),
            Self::PRACTICE => Ok(ActivityType::Practice),
            Self::DISCUSSION => Ok(ActivityType::Discussion),
            Self::SURVEY => Ok(ActivityType::Survey),
            _ => Err(format!("Invalid activity type: {s}")),
        }
    }
}

// 提交方式
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "../frontend/src/types/generated/activity.ts")]
pub enum SubmissionType {
    File,           // 文件上传
    #[default]
    Text,           // 文本
    MultipleChoice, // 选择题
    Url,            // 链接
    Mixed,          // 混合
}

impl SubmissionType {
    pub const FILE: &'static str = "FILE";
    pub const TEXT: &'static str = "TEXT";
    pub const MULTIPLE_CHOICE: &'static str = "MULTIPLE_CHOICE";
    pub const URL: &'static str = "URL";
    pub const MIXED: &'static str = "MIXED";

    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionType::File => Self::FILE,
            SubmissionType::Text => Self::TEXT,
            SubmissionType::MultipleChoice => Self::MULTIPLE_CHOICE,
            SubmissionType::Url => Self::URL,
            SubmissionType::Mixed => Self::MIXED,
        }
    }
}

impl<'de> Deserialize<'de> for SubmissionType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for SubmissionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SubmissionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            Self::FILE => Ok(SubmissionType::File),
            Self::TEXT => Ok(SubmissionType::Text),
            Self::MULTIPLE_CHOICE => Ok(SubmissionType::MultipleChoice),
            Self::URL => Ok(SubmissionType::Url),
            Self::MIXED => Ok(SubmissionType::Mixed),
            _ => Err(format!("Invalid submission type: {s}")),
        }
    }
}

/// 不限提交次数
pub const UNLIMITED_ATTEMPTS: i32 = -1;

fn default_attempts_allowed() -> i32 {
    UNLIMITED_ATTEMPTS
}

// 缺失或为 null 时不限次数
fn attempts_or_unlimited<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<i32>::deserialize(deserializer)?.unwrap_or(UNLIMITED_ATTEMPTS))
}

/// 课程活动
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/activity.ts")]
pub struct Activity {
    pub id: i64,
    pub course_id: i64,
    #[serde(default)]
    pub teacher_id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    pub activity_type: ActivityType,
    #[serde(default, deserialize_with = "nullable::or_default")]
    #[ts(as = "SubmissionType")]
    pub submission_type: SubmissionType,
    #[serde(default, deserialize_with = "nullable::or_default")]
    #[ts(type = "boolean")]
    pub is_required: bool,
    #[serde(default, deserialize_with = "nullable::or_default")]
    #[ts(type = "boolean")]
    pub is_published: bool,
    #[serde(default, with = "timestamps::option")]
    #[ts(type = "string | null")]
    pub available_from: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamps::option")]
    #[ts(type = "string | null")]
    pub available_until: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamps::option")]
    #[ts(type = "string | null")]
    pub due_date: Option<DateTime<Utc>>,
    // 缺失时不能用默认满分代替，评分和汇总会报数据不完整
    #[serde(default)]
    pub max_score: Option<f64>,
    // -1 表示不限次数
    #[serde(
        default = "default_attempts_allowed",
        deserialize_with = "attempts_or_unlimited"
    )]
    #[ts(type = "number")]
    pub attempts_allowed: i32,
    #[serde(default)]
    pub time_limit_minutes: Option<i32>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub course_name: Option<String>,
    #[serde(default)]
    pub teacher_name: Option<String>,
}

impl Activity {
    /// 提交次数上限，`None` 表示不限
    ///
    /// 除 -1 以外的负数一律视为不允许提交。
    pub fn attempt_limit(&self) -> Option<u32> {
        match self.attempts_allowed {
            UNLIMITED_ATTEMPTS => None,
            n if n < 0 => Some(0),
            n => Some(n as u32),
        }
    }

    /// 满分，缺失时返回数据不完整错误
    pub fn require_max_score(&self) -> crate::errors::Result<f64> {
        self.max_score.ok_or_else(|| {
            crate::errors::PortalError::data_integrity(format!(
                "activity {} has no maxScore",
                self.id
            ))
        })
    }
}

/// 学生视角的活动：附带该学生当前的提交
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/activity.ts")]
pub struct StudentActivity {
    #[serde(flatten)]
    #[ts(flatten)]
    pub activity: Activity,
    #[serde(default)]
    pub submission: Option<Submission>,
}

impl StudentActivity {
    pub fn new(activity: Activity, submission: Option<Submission>) -> Self {
        Self {
            activity,
            submission,
        }
    }

    pub fn has_submission(&self) -> bool {
        self.submission.is_some()
    }
}
