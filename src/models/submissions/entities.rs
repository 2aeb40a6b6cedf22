use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::models::common::{string_list, timestamps};

// 提交状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub enum SubmissionStatus {
    Submitted, // 已提交，待评分
    Graded,    // 已评分
    Returned,  // 已退回
}

impl SubmissionStatus {
    pub const SUBMITTED: &'static str = "SUBMITTED";
    pub const GRADED: &'static str = "GRADED";
    pub const RETURNED: &'static str = "RETURNED";

    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Submitted => Self::SUBMITTED,
            SubmissionStatus::Graded => Self::GRADED,
            SubmissionStatus::Returned => Self::RETURNED,
        }
    }

    /// 状态只能向前流转：SUBMITTED → GRADED / RETURNED，
    /// GRADED 与 RETURNED 之间可以互转，任何状态都不能回到 SUBMITTED。
    pub fn can_transition_to(&self, next: SubmissionStatus) -> bool {
        match next {
            SubmissionStatus::Submitted => false,
            SubmissionStatus::Graded | SubmissionStatus::Returned => true,
        }
    }
}

impl<'de> Deserialize<'de> for SubmissionStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            Self::SUBMITTED => Ok(SubmissionStatus::Submitted),
            // 旧数据中的迟交状态，迟交信息由 is_late 单独记录
            "LATE_SUBMITTED" => Ok(SubmissionStatus::Submitted),
            Self::GRADED => Ok(SubmissionStatus::Graded),
            Self::RETURNED => Ok(SubmissionStatus::Returned),
            _ => Err(format!("Invalid submission status: {s}")),
        }
    }
}

fn default_attempt_number() -> u32 {
    1
}

/// 活动提交记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct Submission {
    // 由服务端分配，本地新建时为空
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub activity_id: i64,
    pub student_id: i64,
    #[serde(default, alias = "content")]
    pub submission_text: Option<String>,
    #[serde(default, with = "string_list")]
    #[ts(type = "string")]
    pub file_urls: Vec<String>,
    #[serde(default)]
    pub attachment_url: Option<String>,
    #[serde(default)]
    pub answers: BTreeMap<String, Value>,
    pub status: SubmissionStatus,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(with = "timestamps")]
    #[ts(type = "string")]
    pub submitted_at: DateTime<Utc>,
    #[serde(default, with = "timestamps::option")]
    #[ts(type = "string | null")]
    pub graded_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub graded_by: Option<i64>,
    #[serde(default = "default_attempt_number")]
    pub attempt_number: u32,
    #[serde(default)]
    pub is_late: bool,
}

impl Submission {
    pub fn is_graded(&self) -> bool {
        self.score.is_some()
    }

    /// 同一学生同一活动下比较新旧的依据：尝试序号优先，其次提交时间
    pub fn recency(&self) -> (u32, DateTime<Utc>) {
        (self.attempt_number, self.submitted_at)
    }

    /// 所有附件地址：fileUrls 在前，attachmentUrl 在后
    pub fn attachments(&self) -> Vec<&str> {
        let mut urls: Vec<&str> = self.file_urls.iter().map(String::as_str).collect();
        if let Some(url) = self.attachment_url.as_deref()
            && !url.trim().is_empty()
        {
            urls.push(url);
        }
        urls
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions_are_monotonic() {
        use SubmissionStatus::*;
        assert!(Submitted.can_transition_to(Graded));
        assert!(Submitted.can_transition_to(Returned));
        assert!(Graded.can_transition_to(Graded));
        assert!(Returned.can_transition_to(Graded));
        for from in [Submitted, Graded, Returned] {
            assert!(!from.can_transition_to(Submitted));
        }
    }

    #[test]
    fn test_legacy_late_status() {
        assert_eq!(
            "LATE_SUBMITTED".parse::<SubmissionStatus>().unwrap(),
            SubmissionStatus::Submitted
        );
    }

    #[test]
    fn test_deserialize_backend_submission() {
        let json = r#"{
            "id": 41,
            "activityId": 7,
            "studentId": 1001,
            "content": "my essay",
            "fileUrls": "[\"/files/a.pdf\"]",
            "attachmentUrl": "/files/extra.zip",
            "status": "GRADED",
            "score": 88.5,
            "feedback": "well done",
            "submittedAt": "2024-01-09 10:00:00",
            "gradedAt": "2024-01-11 09:00:00",
            "attemptNumber": 2,
            "isLate": false
        }"#;
        let submission: Submission = serde_json::from_str(json).unwrap();
        assert_eq!(submission.id, Some(41));
        assert_eq!(submission.submission_text.as_deref(), Some("my essay"));
        assert_eq!(submission.status, SubmissionStatus::Graded);
        assert_eq!(submission.attempt_number, 2);
        assert_eq!(
            submission.attachments(),
            vec!["/files/a.pdf", "/files/extra.zip"]
        );
        assert!(submission.is_graded());
    }

    #[test]
    fn test_new_submission_omits_id() {
        let json = r#"{
            "activityId": 7, "studentId": 1, "status": "SUBMITTED",
            "submittedAt": "2024-01-09T10:00:00Z"
        }"#;
        let submission: Submission = serde_json::from_str(json).unwrap();
        assert_eq!(submission.id, None);
        assert_eq!(submission.attempt_number, 1);
        let out = serde_json::to_value(&submission).unwrap();
        assert!(out.get("id").is_none());
        assert_eq!(out["fileUrls"], "[]");
    }
}
