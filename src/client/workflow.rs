//! 写操作之后重新拉取列表的完整流程
//!
//! 本地校验失败时不会发出任何请求。

use chrono::{DateTime, Utc};
use tracing::info;

use super::ApiClient;
use crate::errors::{PortalError, Result};
use crate::models::{
    Activity, CreateSubmissionRequest, GradeSubmissionRequest, ReturnSubmissionRequest,
    Submission, SubmissionPayload,
};
use crate::services::submissions;

/// 写操作的结果与刷新后的列表
#[derive(Debug, Clone, PartialEq)]
pub struct Refreshed {
    pub updated: Submission,
    pub submissions: Vec<Submission>,
}

/// 学生提交，然后重新获取该学生在该活动下的提交
pub async fn submit_and_refresh(
    client: &ApiClient,
    activity: &Activity,
    student_id: i64,
    existing: &[Submission],
    payload: SubmissionPayload,
    now: DateTime<Utc>,
) -> Result<Refreshed> {
    let draft = submissions::submit(activity, student_id, existing, now, payload)?;
    let created = client
        .create_submission(&CreateSubmissionRequest::from(&draft))
        .await?;
    let submissions = client
        .student_activity_submissions(activity.id, student_id)
        .await?;
    info!(
        "Student {} now has {} submissions for activity {}",
        student_id,
        submissions.len(),
        activity.id
    );
    Ok(Refreshed {
        updated: created,
        submissions,
    })
}

fn server_id(submission: &Submission) -> Result<i64> {
    submission
        .id
        .ok_or_else(|| PortalError::data_integrity("submission has not been saved yet"))
}

/// 教师评分，然后重新获取该活动的全部提交
pub async fn grade_and_refresh(
    client: &ApiClient,
    activity: &Activity,
    submission: &Submission,
    score: f64,
    feedback: Option<String>,
    now: DateTime<Utc>,
) -> Result<Refreshed> {
    let id = server_id(submission)?;
    submissions::grade(activity, submission, score, feedback.clone(), now)?;
    let graded = client
        .grade_submission(id, &GradeSubmissionRequest { score, feedback })
        .await?;
    let submissions = client.activity_submissions(activity.id).await?;
    Ok(Refreshed {
        updated: graded,
        submissions,
    })
}

/// 教师退回，然后重新获取该活动的全部提交
pub async fn return_and_refresh(
    client: &ApiClient,
    submission: &Submission,
    reason: &str,
    now: DateTime<Utc>,
) -> Result<Refreshed> {
    let id = server_id(submission)?;
    let local = submissions::return_submission(submission, reason, now)?;
    let request = ReturnSubmissionRequest {
        reason: local.feedback.unwrap_or_default(),
    };
    let returned = client.return_submission(id, &request).await?;
    let submissions = client.activity_submissions(submission.activity_id).await?;
    Ok(Refreshed {
        updated: returned,
        submissions,
    })
}
