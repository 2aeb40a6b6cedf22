use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::models::common::string_list;
use crate::models::submissions::entities::Submission;

/// 学生填写的提交内容
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionPayload {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub file_urls: Vec<String>,
    #[serde(default)]
    pub attachment_url: Option<String>,
    #[serde(default)]
    pub answers: BTreeMap<String, Value>,
}

impl SubmissionPayload {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn files<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            file_urls: urls.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn url(url: impl Into<String>) -> Self {
        Self {
            attachment_url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn answers<I, K>(answers: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            ..Default::default()
        }
    }

    /// 去掉首尾空白后的文本，空文本视为未填写
    pub fn trimmed_text(&self) -> Option<&str> {
        self.text.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }

    pub fn non_blank_files(&self) -> impl Iterator<Item = &str> {
        self.file_urls
            .iter()
            .map(|u| u.trim())
            .filter(|u| !u.is_empty())
    }

    pub fn trimmed_attachment(&self) -> Option<&str> {
        self.attachment_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }

    /// 有内容的答案数（null 和空字符串不算）
    pub fn answered_count(&self) -> usize {
        self.answers
            .values()
            .filter(|v| match v {
                Value::Null => false,
                Value::String(s) => !s.trim().is_empty(),
                Value::Array(items) => !items.is_empty(),
                _ => true,
            })
            .count()
    }
}

/// 创建提交请求（POST /submissions）
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct CreateSubmissionRequest {
    pub activity_id: i64,
    pub student_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission_text: Option<String>,
    // 旧接口读取 content 字段
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    // 后端按 JSON 字符串保存
    #[serde(serialize_with = "string_list::serialize")]
    #[ts(type = "string")]
    pub file_urls: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment_url: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub answers: BTreeMap<String, Value>,
}

impl From<&Submission> for CreateSubmissionRequest {
    fn from(submission: &Submission) -> Self {
        Self {
            activity_id: submission.activity_id,
            student_id: submission.student_id,
            submission_text: submission.submission_text.clone(),
            content: submission.submission_text.clone(),
            file_urls: submission.file_urls.clone(),
            attachment_url: submission.attachment_url.clone(),
            answers: submission.answers.clone(),
        }
    }
}

/// 评分请求（PUT /submissions/{id}/grade）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct GradeSubmissionRequest {
    pub score: f64,
    pub feedback: Option<String>,
}

/// 退回请求（PUT /submissions/{id}/return）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct ReturnSubmissionRequest {
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_trimmed_helpers() {
        let payload = SubmissionPayload {
            text: Some("   ".into()),
            file_urls: vec![" ".into(), "/files/a.pdf".into()],
            attachment_url: Some("".into()),
            answers: BTreeMap::new(),
        };
        assert_eq!(payload.trimmed_text(), None);
        assert_eq!(payload.non_blank_files().collect::<Vec<_>>(), vec!["/files/a.pdf"]);
        assert_eq!(payload.trimmed_attachment(), None);
    }

    #[test]
    fn test_answered_count_ignores_empty_answers() {
        let payload = SubmissionPayload::answers([
            ("q1", json!("B")),
            ("q2", json!(null)),
            ("q3", json!("  ")),
            ("q4", json!(["A", "C"])),
            ("q5", json!([])),
        ]);
        assert_eq!(payload.answered_count(), 2);
    }
}
